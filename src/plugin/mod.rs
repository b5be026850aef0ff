//! Editor plugins
//!
//! A plugin owns one editor's native config format. Import decodes native
//! bytes into the universal keymap; export produces native bytes plus the
//! before/after entry sets the export pipeline diffs.

mod demo;
mod marker;
mod registry;
mod vscode;

use std::fmt;
use std::path::PathBuf;

use crate::editor::EditorType;
use crate::export::{ConfigEntry, ExportSkipAction};
use crate::keymap::Keymap;
use crate::mappings::ActionMappingTable;

pub use demo::DemoPlugin;
pub use marker::ImportMarker;
pub use registry::Registry;
pub use vscode::{parse_keybindings, VscodeKeybinding, VscodePlugin};

/// Errors reported by plugins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// The plugin does not implement this operation
    NotSupported(String),
    /// Native config could not be decoded
    Decode(String),
    /// Output could not be encoded
    Encode(String),
    ConfigNotFound(String),
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginError::NotSupported(what) => write!(f, "not supported: {}", what),
            PluginError::Decode(e) => write!(f, "failed to decode config: {}", e),
            PluginError::Encode(e) => write!(f, "failed to encode config: {}", e),
            PluginError::ConfigNotFound(e) => write!(f, "configuration file not found: {}", e),
        }
    }
}

impl std::error::Error for PluginError {}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigDetectOptions {
    /// Skip probing the environment for installed editor binaries
    pub sandbox: bool,
}

/// Candidate config locations for an editor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDetection {
    pub paths: Vec<PathBuf>,
    pub installed: bool,
}

/// A native entry that was not imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSkipAction {
    /// Command or action in the editor's vocabulary
    pub editor_action: String,
    pub keybindings: Vec<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSkipReport {
    pub skip_actions: Vec<ImportSkipAction>,
}

impl ImportSkipReport {
    pub fn is_empty(&self) -> bool {
        self.skip_actions.is_empty()
    }
}

/// Result of a plugin export
#[derive(Debug, Clone, Default)]
pub struct PluginExport {
    pub bytes: Vec<u8>,
    /// Entries of the existing config, empty for a fresh export
    pub base: Vec<ConfigEntry>,
    /// Entries written to `bytes`
    pub new: Vec<ConfigEntry>,
    pub skip_actions: Vec<ExportSkipAction>,
}

pub trait PluginImporter {
    /// Decode native bytes; entries that cannot be mapped are skipped and reported
    fn import(
        &self,
        source: &[u8],
        table: &ActionMappingTable,
    ) -> Result<(Keymap, ImportSkipReport), PluginError>;
}

pub trait PluginExporter {
    /// Encode `keymap`, merging into `existing` when given
    fn export(
        &self,
        keymap: &Keymap,
        existing: Option<&[u8]>,
        table: &ActionMappingTable,
    ) -> Result<PluginExport, PluginError>;
}

pub trait Plugin: Send + Sync {
    fn editor_type(&self) -> EditorType;

    fn config_detect(&self, opts: &ConfigDetectOptions) -> Result<ConfigDetection, PluginError>;

    fn importer(&self) -> Result<&dyn PluginImporter, PluginError> {
        Err(PluginError::NotSupported(format!(
            "importing from {}",
            self.editor_type()
        )))
    }

    fn exporter(&self) -> Result<&dyn PluginExporter, PluginError> {
        Err(PluginError::NotSupported(format!(
            "exporting to {}",
            self.editor_type()
        )))
    }
}

/// Whether an executable named `name` is on `PATH`
fn command_on_path(name: &str) -> bool {
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path).any(|dir| {
        let candidate = dir.join(name);
        candidate.is_file() || candidate.with_extension("exe").is_file()
    })
}

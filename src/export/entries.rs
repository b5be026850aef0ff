//! Editor-neutral config entries and the non-destructive merge

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::editor::MappingFamily;
use crate::keymap::Keymap;
use crate::mappings::{ActionMappingTable, Args, ReverseQuery};
use crate::platform::Platform;

use super::marker::ExportMarker;

/// One native keybinding in descriptor shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Args>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            command: command.into(),
            ..Default::default()
        }
    }

    /// Builder method to set the context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.context = (!context.is_empty()).then_some(context);
        self
    }

    pub fn with_args(mut self, args: Option<Args>) -> Self {
        self.args = args;
        self
    }

    pub fn query(&self) -> ReverseQuery<'_> {
        ReverseQuery {
            command: &self.command,
            context: self.context.as_deref(),
            args: self.args.as_ref(),
            mode: self.mode.as_deref(),
        }
    }
}

impl fmt::Display for ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.key, self.command)?;
        if let Some(context) = &self.context {
            write!(f, " when {}", context)?;
        }
        if let Some(mode) = &self.mode {
            write!(f, " in {}", mode)?;
        }
        if let Some(args) = &self.args {
            let args = serde_json::to_string(args).map_err(|_| fmt::Error)?;
            write!(f, " {}", args)?;
        }
        Ok(())
    }
}

/// How an editor spells chords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyFormat {
    pub platform: Platform,
    pub separator: &'static str,
}

impl Default for KeyFormat {
    fn default() -> Self {
        Self {
            platform: Platform::MacOS,
            separator: "+",
        }
    }
}

/// Resolve every (action, binding) pair into native entries
///
/// Pairs that produce entries are marked exported. Pairs whose action has no
/// descriptor are left unmarked unless the table gives a reason.
pub fn generate_entries(
    keymap: &Keymap,
    table: &ActionMappingTable,
    family: MappingFamily,
    format: KeyFormat,
    marker: &mut ExportMarker,
) -> Vec<ConfigEntry> {
    let mut entries = Vec::new();
    for action in &keymap.actions {
        let resolved = table.resolve_for_export(&action.name, family);
        if resolved.is_none() {
            let (_, note) = table.is_supported(&action.name, family);
            if !note.is_empty() {
                marker.mark_action_skipped(&action.name, &note);
            }
        }
        let Some((used, descriptors)) = resolved else {
            continue;
        };
        if used != action.name {
            tracing::debug!("Exporting {} through fallback {}", action.name, used);
        }

        for binding in action.bindings.iter().filter(|b| b.has_chords()) {
            let key = match binding.format(format.platform, format.separator) {
                Ok(key) => key,
                Err(e) => {
                    tracing::warn!(
                        "Skipping keybinding with unformattable key for {}: {}",
                        action.name,
                        e
                    );
                    marker.mark_skipped(&action.name, binding, &format!("unformattable key: {}", e));
                    continue;
                }
            };
            for descriptor in &descriptors {
                entries.push(ConfigEntry {
                    key: key.clone(),
                    command: descriptor.command.clone(),
                    context: descriptor.context.clone(),
                    args: descriptor.args.clone(),
                    mode: descriptor.mode.clone(),
                });
            }
            marker.mark_exported(&action.name, binding);
        }
    }
    entries
}

/// Split existing entries into (managed, unmanaged)
///
/// An entry is managed when the table can currently produce exactly it.
pub fn partition(
    existing: &[ConfigEntry],
    table: &ActionMappingTable,
    family: MappingFamily,
) -> (Vec<ConfigEntry>, Vec<ConfigEntry>) {
    existing
        .iter()
        .cloned()
        .partition(|entry| table.is_managed(family, &entry.query()))
}

/// Generated entries plus unmanaged entries whose key is still free
///
/// A generated chord claims its key regardless of context.
pub fn merge(managed: Vec<ConfigEntry>, unmanaged: Vec<ConfigEntry>) -> Vec<ConfigEntry> {
    let taken: HashSet<String> = managed.iter().map(|e| e.key.clone()).collect();

    let mut result = managed;
    for entry in unmanaged {
        if taken.contains(&entry.key) {
            tracing::debug!(
                "Managed keybinding overrides {} for {}",
                entry.command,
                entry.key
            );
            continue;
        }
        result.push(entry);
    }
    result
}

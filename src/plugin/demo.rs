//! Minimal JSON keymap format
//!
//! `[{"keys": "cmd+k", "action": "actions.edit.copy"}]`. Actions are already
//! universal ids, so no mapping table lookups are involved.

use serde::{Deserialize, Serialize};

use crate::config_paths;
use crate::editor::EditorType;
use crate::export::{ConfigEntry, ExportMarker, KeyFormat};
use crate::keymap::{Action, Binding, Keymap};
use crate::mappings::ActionMappingTable;

use super::{
    ConfigDetectOptions, ConfigDetection, ImportMarker, ImportSkipReport, Plugin, PluginError,
    PluginExport, PluginExporter, PluginImporter,
};

const CONFIG_FILE: &str = "demo.keybindings.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct DemoBinding {
    #[serde(default)]
    keys: String,
    #[serde(default)]
    action: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DemoPlugin;

fn parse(source: &[u8]) -> Result<Vec<DemoBinding>, PluginError> {
    if source.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(source).map_err(|e| PluginError::Decode(e.to_string()))
}

fn to_entry(binding: DemoBinding) -> ConfigEntry {
    ConfigEntry::new(binding.keys, binding.action)
}

impl Plugin for DemoPlugin {
    fn editor_type(&self) -> EditorType {
        EditorType::Demo
    }

    fn config_detect(&self, _opts: &ConfigDetectOptions) -> Result<ConfigDetection, PluginError> {
        let dir = config_paths::config_dir()
            .ok_or_else(|| PluginError::ConfigNotFound("no config directory".to_string()))?;
        Ok(ConfigDetection {
            paths: vec![dir.join(CONFIG_FILE)],
            installed: true,
        })
    }

    fn importer(&self) -> Result<&dyn PluginImporter, PluginError> {
        Ok(self)
    }

    fn exporter(&self) -> Result<&dyn PluginExporter, PluginError> {
        Ok(self)
    }
}

impl PluginImporter for DemoPlugin {
    fn import(
        &self,
        source: &[u8],
        _table: &ActionMappingTable,
    ) -> Result<(Keymap, ImportSkipReport), PluginError> {
        let mut marker = ImportMarker::new();
        let mut keymap = Keymap::default();
        for entry in parse(source)? {
            if entry.keys.is_empty() || entry.action.is_empty() {
                marker.mark_skipped(
                    &entry.action,
                    (!entry.keys.is_empty()).then_some(entry.keys.as_str()),
                    "missing keys or action",
                );
                continue;
            }
            match Binding::parse(&entry.keys) {
                Ok(binding) => {
                    keymap.push(Action::new(entry.action.as_str()).with_binding(binding));
                    marker.mark_imported(&entry.action);
                }
                Err(e) => {
                    tracing::warn!("Skipping unparsable key '{}': {}", entry.keys, e);
                    marker.mark_skipped(
                        &entry.action,
                        Some(&entry.keys),
                        &format!("unparsable key '{}'", entry.keys),
                    );
                }
            }
        }
        Ok((keymap, marker.report()))
    }
}

impl PluginExporter for DemoPlugin {
    fn export(
        &self,
        keymap: &Keymap,
        existing: Option<&[u8]>,
        _table: &ActionMappingTable,
    ) -> Result<PluginExport, PluginError> {
        let base: Vec<ConfigEntry> = match existing {
            Some(bytes) => parse(bytes)?.into_iter().map(to_entry).collect(),
            None => Vec::new(),
        };

        let format = KeyFormat::default();
        let mut marker = ExportMarker::new();
        let mut out = Vec::new();
        for (action, binding) in keymap.bindings().filter(|(_, b)| b.has_chords()) {
            match binding.format(format.platform, format.separator) {
                Ok(keys) => {
                    out.push(DemoBinding {
                        keys,
                        action: action.name.clone(),
                    });
                    marker.mark_exported(&action.name, binding);
                }
                Err(e) => {
                    marker.mark_skipped(&action.name, binding, &format!("unformattable key: {}", e))
                }
            }
        }

        let mut text =
            serde_json::to_string_pretty(&out).map_err(|e| PluginError::Encode(e.to_string()))?;
        text.push('\n');
        Ok(PluginExport {
            bytes: text.into_bytes(),
            base,
            new: out.into_iter().map(to_entry).collect(),
            skip_actions: marker.report(keymap),
        })
    }
}

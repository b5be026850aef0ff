//! VSCode-family `keybindings.json`
//!
//! Shared by VSCode, Windsurf and Cursor. Keys are written in macOS
//! spelling with `+` between keys of a chord and a space between chords.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::editor::{EditorType, MappingFamily};
use crate::export::{generate_entries, merge, partition, ConfigEntry, ExportMarker, KeyFormat};
use crate::keymap::{Action, Binding, Keymap};
use crate::mappings::{ActionMappingTable, Args, ReverseQuery};

use super::{
    command_on_path, ConfigDetectOptions, ConfigDetection, ImportMarker,
    ImportSkipReport, Plugin, PluginError, PluginExport, PluginExporter, PluginImporter,
};

const REMOVAL_SKIPPED: &str = "removal entries are not imported";
const UNKNOWN_MAPPING: &str = "unknown action mapping";

/// One entry of `keybindings.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VscodeKeybinding {
    pub key: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Args>,
}

impl From<VscodeKeybinding> for ConfigEntry {
    fn from(kb: VscodeKeybinding) -> Self {
        ConfigEntry::new(kb.key, kb.command)
            .with_context(kb.when.unwrap_or_default())
            .with_args(kb.args)
    }
}

impl From<ConfigEntry> for VscodeKeybinding {
    fn from(entry: ConfigEntry) -> Self {
        Self {
            key: entry.key,
            command: entry.command,
            when: entry.context,
            args: entry.args,
        }
    }
}

/// Plugin for an editor that reads VSCode's keybinding format
#[derive(Debug, Clone)]
pub struct VscodePlugin {
    editor: EditorType,
}

impl VscodePlugin {
    pub fn vscode() -> Self {
        Self::for_editor(EditorType::VSCode)
    }

    pub fn windsurf() -> Self {
        Self::for_editor(EditorType::Windsurf)
    }

    pub fn windsurf_next() -> Self {
        Self::for_editor(EditorType::WindsurfNext)
    }

    pub fn cursor() -> Self {
        Self::for_editor(EditorType::Cursor)
    }

    fn for_editor(editor: EditorType) -> Self {
        Self { editor }
    }

    /// Directory name under the user config dir
    fn app_dir(&self) -> &'static str {
        match self.editor {
            EditorType::Windsurf => "Windsurf",
            EditorType::WindsurfNext => "Windsurf - Next",
            EditorType::Cursor => "Cursor",
            _ => "Code",
        }
    }

    /// Command-line launcher installed with the editor
    fn launcher(&self) -> &'static str {
        match self.editor {
            EditorType::Windsurf => "windsurf",
            EditorType::WindsurfNext => "windsurf-next",
            EditorType::Cursor => "cursor",
            _ => "code",
        }
    }

    fn family(&self) -> MappingFamily {
        self.editor.mapping_family().unwrap_or(MappingFamily::VSCode)
    }
}

/// Parse `keybindings.json` text; empty input is an empty list
///
/// VSCode writes JSON with comments and tolerates trailing commas, so the
/// file is read as JSON5.
pub fn parse_keybindings(source: &[u8]) -> Result<Vec<VscodeKeybinding>, PluginError> {
    let text = std::str::from_utf8(source).map_err(|e| PluginError::Decode(e.to_string()))?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json5::from_str(text).map_err(|e| PluginError::Decode(e.to_string()))
}

impl Plugin for VscodePlugin {
    fn editor_type(&self) -> EditorType {
        self.editor
    }

    fn config_detect(&self, opts: &ConfigDetectOptions) -> Result<ConfigDetection, PluginError> {
        let dir = dirs::config_dir()
            .ok_or_else(|| PluginError::ConfigNotFound("no user config directory".to_string()))?;
        let path: PathBuf = dir.join(self.app_dir()).join("User").join("keybindings.json");
        let installed = !opts.sandbox && command_on_path(self.launcher());
        Ok(ConfigDetection {
            paths: vec![path],
            installed,
        })
    }

    fn importer(&self) -> Result<&dyn PluginImporter, PluginError> {
        Ok(self)
    }

    fn exporter(&self) -> Result<&dyn PluginExporter, PluginError> {
        Ok(self)
    }
}

impl PluginImporter for VscodePlugin {
    fn import(
        &self,
        source: &[u8],
        table: &ActionMappingTable,
    ) -> Result<(Keymap, ImportSkipReport), PluginError> {
        let family = self.family();
        let mut marker = ImportMarker::new();
        let mut keymap = Keymap::default();

        for kb in parse_keybindings(source)? {
            if kb.command.starts_with('-') {
                marker.mark_skipped(&kb.command, Some(&kb.key), REMOVAL_SKIPPED);
                continue;
            }

            let mut query = ReverseQuery::command(&kb.command).with_args(kb.args.as_ref());
            if let Some(when) = &kb.when {
                query = query.with_context(when);
            }
            let Some(id) = table.reverse_resolve(family, &query) else {
                tracing::debug!("No action mapping for {} command {}", self.editor, kb.command);
                marker.mark_skipped(&kb.command, Some(&kb.key), UNKNOWN_MAPPING);
                continue;
            };

            let binding = match Binding::parse(&kb.key) {
                Ok(binding) => binding,
                Err(e) => {
                    tracing::warn!("Skipping unparsable key '{}' for {}: {}", kb.key, kb.command, e);
                    marker.mark_skipped(
                        &kb.command,
                        Some(&kb.key),
                        &format!("unparsable key '{}'", kb.key),
                    );
                    continue;
                }
            };
            keymap.push(Action::new(id).with_binding(binding));
            marker.mark_imported(&kb.command);
        }

        Ok((keymap, marker.report()))
    }
}

impl PluginExporter for VscodePlugin {
    fn export(
        &self,
        keymap: &Keymap,
        existing: Option<&[u8]>,
        table: &ActionMappingTable,
    ) -> Result<PluginExport, PluginError> {
        let family = self.family();
        let base: Vec<ConfigEntry> = match existing {
            Some(bytes) => parse_keybindings(bytes)?
                .into_iter()
                .map(ConfigEntry::from)
                .collect(),
            None => Vec::new(),
        };

        let mut marker = ExportMarker::new();
        let generated = generate_entries(keymap, table, family, KeyFormat::default(), &mut marker);
        let (_, unmanaged) = partition(&base, table, family);
        let mut new = merge(generated, unmanaged);
        order_like(&mut new, &base);

        let keybindings: Vec<VscodeKeybinding> =
            new.iter().cloned().map(VscodeKeybinding::from).collect();
        let mut text = serde_json::to_string_pretty(&keybindings)
            .map_err(|e| PluginError::Encode(e.to_string()))?;
        text.push('\n');

        Ok(PluginExport {
            bytes: text.into_bytes(),
            skip_actions: marker.report(keymap),
            base,
            new,
        })
    }
}

/// Follow the command order of `base`
///
/// Neighbours swap only when both commands appear in `base`, so entries the
/// base never mentions stay where generation put them. Only a partial
/// order, so no `sort_by`.
fn order_like(entries: &mut [ConfigEntry], base: &[ConfigEntry]) {
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    for entry in base.iter().filter(|e| !e.command.is_empty()) {
        let next = first_seen.len();
        first_seen.entry(entry.command.as_str()).or_insert(next);
    }
    if first_seen.is_empty() {
        return;
    }

    let rank = |entry: &ConfigEntry| first_seen.get(entry.command.as_str()).copied();
    for i in 1..entries.len() {
        let mut j = i;
        while j > 0 {
            let (current, previous) = (rank(&entries[j]), rank(&entries[j - 1]));
            match (current, previous) {
                (Some(a), Some(b)) if a < b => entries.swap(j, j - 1),
                _ => break,
            }
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappings::load_mapping_table_from_str;

    const MAPPINGS: &str = r#"
mappings:
  - id: actions.edit.copy
    vscode:
      - {command: editor.action.clipboardCopyAction}
  - id: actions.edit.paste
    vscode: {command: editor.action.clipboardPasteAction}
  - id: actions.cursor.lineEnd
    vscode:
      - {command: cursorEnd, args: {sticky: false}}
"#;

    fn table() -> ActionMappingTable {
        load_mapping_table_from_str(MAPPINGS).unwrap()
    }

    #[test]
    fn test_import_resolves_and_reports_skips() {
        let source = br#"// user keybindings
[
  { "key": "cmd+c", "command": "editor.action.clipboardCopyAction" },
  { "key": "cmd+end", "command": "cursorEnd", "args": { "sticky": false } },
  { "key": "cmd+v", "command": "-editor.action.clipboardPasteAction" },
  { "key": "cmd+u", "command": "my.extension.command" },
  { "key": "cmd+??", "command": "editor.action.clipboardPasteAction" },
]"#;
        let (keymap, skipped) = VscodePlugin::vscode().import(source, &table()).unwrap();
        let ids: Vec<_> = keymap.actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(ids, vec!["actions.edit.copy", "actions.cursor.lineEnd"]);

        let reasons: Vec<_> = skipped
            .skip_actions
            .iter()
            .map(|s| (s.editor_action.as_str(), s.reason.as_str()))
            .collect();
        assert_eq!(
            reasons,
            vec![
                ("-editor.action.clipboardPasteAction", REMOVAL_SKIPPED),
                ("my.extension.command", UNKNOWN_MAPPING),
                ("editor.action.clipboardPasteAction", "unparsable key 'cmd+??'"),
            ]
        );
    }

    #[test]
    fn test_import_args_mismatch_is_unknown() {
        let source = br#"[{ "key": "cmd+end", "command": "cursorEnd", "args": { "sticky": true } }]"#;
        let (keymap, skipped) = VscodePlugin::vscode().import(source, &table()).unwrap();
        assert!(keymap.is_empty());
        assert_eq!(skipped.skip_actions.len(), 1);
    }

    #[test]
    fn test_order_like_moves_only_known_commands() {
        let base = vec![ConfigEntry::new("cmd+b", "b.cmd"), ConfigEntry::new("cmd+a", "a.cmd")];

        let mut entries = vec![
            ConfigEntry::new("cmd+1", "a.cmd"),
            ConfigEntry::new("cmd+2", "new.cmd"),
            ConfigEntry::new("cmd+3", "b.cmd"),
        ];
        order_like(&mut entries, &base);
        let commands: Vec<_> = entries.iter().map(|e| e.command.as_str()).collect();
        assert_eq!(commands, vec!["a.cmd", "new.cmd", "b.cmd"]);

        let mut entries = vec![
            ConfigEntry::new("cmd+1", "new.cmd"),
            ConfigEntry::new("cmd+2", "a.cmd"),
            ConfigEntry::new("cmd+3", "b.cmd"),
        ];
        order_like(&mut entries, &base);
        let commands: Vec<_> = entries.iter().map(|e| e.command.as_str()).collect();
        assert_eq!(commands, vec!["new.cmd", "b.cmd", "a.cmd"]);
    }

    #[test]
    fn test_import_rejects_unterminated_comment() {
        let result = VscodePlugin::vscode().import(b"[ /* open", &table());
        assert!(matches!(result, Err(PluginError::Decode(_))));
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        let result = VscodePlugin::vscode().import(b"[{", &table());
        assert!(matches!(result, Err(PluginError::Decode(_))));
    }

    #[test]
    fn test_export_keeps_unmanaged_entries_in_place() {
        let existing = br#"[
  { "key": "cmd+u", "command": "my.extension.command" },
  { "key": "cmd+c", "command": "editor.action.clipboardCopyAction" }
]"#;
        let keymap: Keymap = vec![
            Action::new("actions.edit.paste").bind("meta+v").unwrap(),
            Action::new("actions.edit.copy").bind("meta+shift+c").unwrap(),
        ]
        .into_iter()
        .collect();

        let export = VscodePlugin::vscode()
            .export(&keymap, Some(&existing[..]), &table())
            .unwrap();
        let commands: Vec<_> = export.new.iter().map(|e| e.command.as_str()).collect();
        assert_eq!(
            commands,
            vec![
                "editor.action.clipboardPasteAction",
                "my.extension.command",
                "editor.action.clipboardCopyAction",
            ]
        );
        assert_eq!(export.base.len(), 2);
        assert_eq!(export.new[2].key, "cmd+shift+c");

        let written = parse_keybindings(&export.bytes).unwrap();
        assert_eq!(written.len(), 3);
        assert!(export.skip_actions.is_empty());
    }

    #[test]
    fn test_export_without_existing_is_generated_only() {
        let keymap: Keymap = vec![Action::new("actions.cursor.lineEnd").bind("meta+right").unwrap()]
            .into_iter()
            .collect();
        let export = VscodePlugin::cursor().export(&keymap, None, &table()).unwrap();
        let text = String::from_utf8(export.bytes).unwrap();
        assert!(text.contains("\"sticky\": false"));
        assert!(text.ends_with("]\n"));
        assert!(export.base.is_empty());
    }

    #[test]
    fn test_config_detect_sandboxed() {
        let detection = VscodePlugin::windsurf()
            .config_detect(&ConfigDetectOptions { sandbox: true })
            .unwrap();
        assert!(!detection.installed);
        assert!(detection.paths[0].ends_with("Windsurf/User/keybindings.json"));
    }
}

//! Plugin tests: registry, VSCode-family formats and the demo format

mod common;

use common::{bindings_of, bundled_table, keymap, test_table};
use keybridge::editor::EditorType;
use keybridge::import::{ImportOptions, ImportService};
use keybridge::plugin::{
    parse_keybindings, ConfigDetectOptions, ConfigDetection, Plugin, PluginError,
    VscodePlugin,
};
use keybridge::Registry;

struct DetectOnly;

impl Plugin for DetectOnly {
    fn editor_type(&self) -> EditorType {
        EditorType::Helix
    }

    fn config_detect(&self, _opts: &ConfigDetectOptions) -> Result<ConfigDetection, PluginError> {
        Ok(ConfigDetection::default())
    }
}

// ========================================================================
// Registry
// ========================================================================

#[test]
fn test_custom_plugin_without_importer() {
    let mut registry = Registry::with_builtin();
    registry.register(Box::new(DetectOnly));

    let plugin = registry.get(EditorType::Helix).unwrap();
    assert_eq!(
        plugin.importer().err(),
        Some(PluginError::NotSupported("importing from helix".to_string()))
    );

    let table = test_table();
    let err = ImportService::new(&registry, &table)
        .import(&ImportOptions {
            editor: EditorType::Helix,
            source: Vec::new(),
            baseline: None,
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "not supported: importing from helix");
}

#[test]
fn test_every_builtin_plugin_reports_its_editor() {
    let registry = Registry::with_builtin();
    for editor in registry.names() {
        assert_eq!(registry.get(editor).unwrap().editor_type(), editor);
    }
    assert_eq!(registry.plugins().count(), registry.names().len());
}

// ========================================================================
// VSCode family
// ========================================================================

#[test]
fn test_jsonc_with_comments_and_trailing_commas() {
    let source = r#"// Place your key bindings in this file
[
  // copy
  {"key": "cmd+c", "command": "a//b", "when": "x /* y */",},
  /* block
     comment */
  {"key": "cmd+v", "command": "paste", "args": {"text": "]",},},
]"#;
    let parsed = parse_keybindings(source.as_bytes()).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].command, "a//b");
    assert_eq!(parsed[0].when.as_deref(), Some("x /* y */"));
    assert_eq!(
        parsed[1].args.as_ref().unwrap()["text"],
        serde_json::Value::String("]".to_string())
    );
}

#[test]
fn test_empty_keybindings_file() {
    assert!(parse_keybindings(b"").unwrap().is_empty());
    assert!(parse_keybindings(b"  \n").unwrap().is_empty());
    assert!(parse_keybindings(b"// nothing yet\n[]\n").unwrap().is_empty());
}

#[test]
fn test_cursor_reads_vscode_mappings() {
    let registry = Registry::with_builtin();
    let table = bundled_table();
    let source = br#"[{"key": "cmd+c", "command": "editor.action.clipboardCopyAction"}]"#;
    let result = ImportService::new(&registry, &table)
        .import(&ImportOptions {
            editor: EditorType::Cursor,
            source: source.to_vec(),
            baseline: None,
        })
        .unwrap();
    assert_eq!(
        bindings_of(&result.keymap),
        vec![("actions.edit.copy".to_string(), "cmd+c".to_string())]
    );
    assert_eq!(result.report.source_editor, "cursor");
}

#[test]
fn test_unparsable_key_is_skipped_with_reason() {
    let table = test_table();
    let source = br#"[
        {"key": "ctrl+c+v", "command": "editor.action.clipboardCopyAction"},
        {"key": "cmd+v", "command": "editor.action.clipboardPasteAction"}
    ]"#;
    let importer = VscodePlugin::vscode();
    let (keymap, skipped) = keybridge::plugin::PluginImporter::import(&importer, source, &table)
        .unwrap();
    assert_eq!(keymap.len(), 1);
    assert_eq!(skipped.skip_actions[0].reason, "unparsable key 'ctrl+c+v'");
}

#[test]
fn test_sandboxed_detection_never_reports_installed() {
    let opts = ConfigDetectOptions { sandbox: true };
    for plugin in [
        VscodePlugin::vscode(),
        VscodePlugin::windsurf(),
        VscodePlugin::windsurf_next(),
        VscodePlugin::cursor(),
    ] {
        let Ok(detection) = plugin.config_detect(&opts) else {
            continue;
        };
        assert!(!detection.installed);
        assert!(detection.paths[0].ends_with("User/keybindings.json"));
    }
}

// ========================================================================
// Demo
// ========================================================================

#[test]
fn test_demo_round_trip_through_services() {
    let registry = Registry::with_builtin();
    let table = test_table();
    let original = keymap(&[
        ("actions.editor.copy", "meta+c"),
        ("actions.editor.paste", "meta+v"),
    ]);

    let exported = keybridge::export::ExportService::new(&registry, &table)
        .export(&keybridge::export::ExportOptions {
            editor: EditorType::Demo,
            keymap: original,
            existing: None,
            file_path: "demo.keybindings.json".into(),
            diff_style: keybridge::export::DiffStyle::Structured,
        })
        .unwrap();
    assert_eq!(
        exported.report.diff,
        "+cmd+c => actions.editor.copy\n+cmd+v => actions.editor.paste\n"
    );

    let imported = ImportService::new(&registry, &table)
        .import(&ImportOptions {
            editor: EditorType::Demo,
            source: exported.bytes,
            baseline: None,
        })
        .unwrap();
    assert_eq!(imported.changes.add.len(), 2);
    assert!(imported.report.is_clean());
    assert!(imported.skip_report.is_empty());
}

#[test]
fn test_demo_config_lives_in_app_config_dir() {
    let registry = Registry::with_builtin();
    let detection = registry
        .get(EditorType::Demo)
        .unwrap()
        .config_detect(&ConfigDetectOptions::default())
        .unwrap();
    assert!(detection.installed);
    assert_eq!(
        detection.paths,
        vec![keybridge::config_paths::config_dir()
            .unwrap()
            .join("demo.keybindings.json")]
    );
}

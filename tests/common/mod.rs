//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use keybridge::keymap::{Action, Keymap, PairKey};
use keybridge::mappings::{load_mapping_table, load_mapping_table_from_str, ActionMappingTable};

/// Small mapping table covering the scenarios the integration tests use
pub const TEST_MAPPINGS: &str = r#"
mappings:
  - id: actions.editor.copy
    name: Copy
    description: Copy the selection
    category: Edit
    vscode:
      - command: editor.action.clipboardCopyAction
      - command: workbench.action.terminal.copySelection
        when: terminalFocus
        disableImport: true
    zed: {action: "editor::Copy", context: Editor}
  - id: actions.editor.paste
    name: Paste
    category: Edit
    vscode: {command: editor.action.clipboardPasteAction}
    zed: {action: "editor::Paste", context: Editor}
  - id: actions.editor.save
    name: Save
    category: File
    vscode: {command: workbench.action.files.save}
    helix: {notSupported: true, notSupportedReason: "use :write"}
  - id: actions.cursor.lineEnd
    name: Cursor to Line End
    vscode:
      - {command: cursorEnd, when: textInputFocus, args: {sticky: false}, forImport: true}
      - {command: cursorEnd, when: editorTextFocus, disableImport: true}
  - id: actions.cursor.lineEndSelect
    name: Select to Line End
    fallbacks: [actions.cursor.lineEnd]
    zed: {action: "editor::SelectToEndOfLine", context: Editor}
  - id: actions.view.toggleSidebar
    name: Toggle Sidebar
    vscode: {command: workbench.action.toggleSidebarVisibility}
"#;

/// Table built from [`TEST_MAPPINGS`]
pub fn test_table() -> ActionMappingTable {
    load_mapping_table_from_str(TEST_MAPPINGS).expect("test mappings should build")
}

/// Table built from the bundled mapping source
pub fn bundled_table() -> ActionMappingTable {
    load_mapping_table(&[]).expect("bundled mappings should build")
}

/// Keymap with one action per (id, keys) pair, in the given order
pub fn keymap(entries: &[(&str, &str)]) -> Keymap {
    entries
        .iter()
        .map(|(id, keys)| Action::new(*id).bind(keys).expect("valid test chord"))
        .collect()
}

/// Every pair key of a keymap, in order
pub fn pair_keys(keymap: &Keymap) -> Vec<PairKey> {
    keymap
        .actions
        .iter()
        .flat_map(|action| action.pair_keys())
        .collect()
}

/// (id, canonical chord) of each binding, in order
pub fn bindings_of(keymap: &Keymap) -> Vec<(String, String)> {
    keymap
        .bindings()
        .map(|(action, binding)| (action.name.clone(), binding.canonical()))
        .collect()
}

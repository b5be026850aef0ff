//! Change classification tests

mod common;

use std::collections::BTreeSet;

use common::{keymap, pair_keys, test_table};
use keybridge::keymap::{Keymap, PairKey};
use keybridge::{classify, KeymapChanges};

fn names(actions: &[keybridge::Action]) -> Vec<&str> {
    actions.iter().map(|a| a.name.as_str()).collect()
}

/// Every pair key reported by a classification, counted once per occurrence
fn reported_keys(changes: &KeymapChanges) -> Vec<PairKey> {
    let mut keys = Vec::new();
    for action in changes.add.iter().chain(&changes.remove) {
        keys.extend(action.pair_keys());
    }
    for update in &changes.update {
        keys.extend(update.before.pair_keys());
        keys.extend(update.after.pair_keys());
    }
    keys
}

fn symmetric_difference(base: &Keymap, merged: &Keymap) -> BTreeSet<PairKey> {
    let base: BTreeSet<PairKey> = pair_keys(base).into_iter().collect();
    let merged: BTreeSet<PairKey> = pair_keys(merged).into_iter().collect();
    base.symmetric_difference(&merged).cloned().collect()
}

#[test]
fn test_no_baseline_reports_every_binding_as_added() {
    let merged = keymap(&[
        ("actions.editor.copy", "ctrl+c"),
        ("actions.editor.paste", "cmd+v"),
    ]);
    let changes = classify(&Keymap::default(), &merged, None);
    assert_eq!(changes.add.len(), 2);
    assert!(changes.remove.is_empty());
    assert!(changes.update.is_empty());
}

#[test]
fn test_add_and_remove_between_different_ids() {
    let base = keymap(&[
        ("actions.editor.copy", "ctrl+c"),
        ("actions.editor.paste", "ctrl+v"),
    ]);
    let merged = keymap(&[
        ("actions.editor.paste", "ctrl+v"),
        ("actions.editor.save", "ctrl+s"),
    ]);
    let changes = classify(&base, &merged, None);
    assert_eq!(names(&changes.add), vec!["actions.editor.save"]);
    assert_eq!(names(&changes.remove), vec!["actions.editor.copy"]);
    assert!(changes.update.is_empty());
}

#[test]
fn test_single_binding_change_is_an_update() {
    let base = keymap(&[("actions.editor.copy", "ctrl+c")]);
    let merged = keymap(&[("actions.editor.copy", "cmd+c")]);
    let changes = classify(&base, &merged, Some(&test_table()));

    assert!(changes.add.is_empty());
    assert!(changes.remove.is_empty());
    assert_eq!(changes.update.len(), 1);

    let update = &changes.update[0];
    assert_eq!(update.before.bindings[0].readable, "ctrl+c");
    assert_eq!(update.after.bindings[0].readable, "cmd+c");
    assert_eq!(update.after.display_name, "Copy");
}

#[test]
fn test_two_bindings_to_one_is_never_an_update() {
    let base = keymap(&[
        ("actions.editor.copy", "ctrl+c"),
        ("actions.editor.copy", "ctrl+insert"),
    ]);
    let merged = keymap(&[("actions.editor.copy", "cmd+c")]);
    let changes = classify(&base, &merged, None);
    assert_eq!(changes.add.len(), 1);
    assert_eq!(changes.remove.len(), 2);
    assert!(changes.update.is_empty());
}

#[test]
fn test_one_binding_to_two_is_never_an_update() {
    let base = keymap(&[("actions.editor.copy", "ctrl+c")]);
    let merged = keymap(&[
        ("actions.editor.copy", "cmd+c"),
        ("actions.editor.copy", "ctrl+insert"),
    ]);
    let changes = classify(&base, &merged, None);
    assert_eq!(changes.add.len(), 2);
    assert_eq!(changes.remove.len(), 1);
    assert!(changes.update.is_empty());
}

#[test]
fn test_identical_keymaps_have_no_changes() {
    let base = keymap(&[("actions.editor.copy", "ctrl+c")]);
    let changes = classify(&base, &base.clone(), None);
    assert!(changes.is_empty());
    assert_eq!(changes.len(), 0);
}

#[test]
fn test_every_changed_pair_is_reported_exactly_once() {
    let base = keymap(&[
        ("actions.editor.copy", "ctrl+c"),
        ("actions.editor.paste", "ctrl+v"),
        ("actions.editor.paste", "shift+insert"),
        ("actions.editor.save", "ctrl+s"),
        ("actions.view.toggleSidebar", "ctrl+b"),
    ]);
    let merged = keymap(&[
        ("actions.editor.copy", "cmd+c"),
        ("actions.editor.paste", "cmd+v"),
        ("actions.editor.save", "ctrl+s"),
        ("actions.cursor.lineEnd", "ctrl+e"),
    ]);
    let changes = classify(&base, &merged, None);

    let reported = reported_keys(&changes);
    let unique: BTreeSet<PairKey> = reported.iter().cloned().collect();
    assert_eq!(reported.len(), unique.len(), "a pair key was reported twice");
    assert_eq!(unique, symmetric_difference(&base, &merged));
}

#[test]
fn test_outputs_are_sorted_by_id() {
    let merged = keymap(&[
        ("actions.view.toggleSidebar", "ctrl+b"),
        ("actions.editor.copy", "ctrl+c"),
        ("actions.cursor.lineEnd", "ctrl+e"),
    ]);
    let changes = classify(&Keymap::default(), &merged, None);
    assert_eq!(
        names(&changes.add),
        vec![
            "actions.cursor.lineEnd",
            "actions.editor.copy",
            "actions.view.toggleSidebar"
        ]
    );
}

#[test]
fn test_bindings_without_chords_are_ignored() {
    let mut merged = keymap(&[("actions.editor.copy", "ctrl+c")]);
    merged.push(keybridge::Action::new("actions.editor.paste").with_binding(Default::default()));
    let changes = classify(&Keymap::default(), &merged, None);
    assert_eq!(names(&changes.add), vec!["actions.editor.copy"]);
}

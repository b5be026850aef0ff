//! Collapse repeated actions and bindings

use std::collections::{HashMap, HashSet};

use crate::keymap::{Action, Keymap, PairKey};

/// One action per id, one binding per pair key, first occurrence wins
///
/// Actions keep the position of their first occurrence. Later entries for the
/// same id only fill metadata that is still empty; an id is never dropped,
/// even when all of its bindings are.
pub fn dedupe(actions: Vec<Action>) -> Vec<Action> {
    let mut out: Vec<Action> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut seen: HashSet<PairKey> = HashSet::new();

    for action in actions {
        let slot = match index.get(&action.name) {
            Some(&i) => {
                fill_missing(&mut out[i], &action);
                i
            }
            None => {
                index.insert(action.name.clone(), out.len());
                out.push(Action {
                    bindings: Vec::new(),
                    ..action.clone()
                });
                out.len() - 1
            }
        };
        for binding in action.bindings {
            if seen.insert(PairKey::new(&action.name, &binding)) {
                out[slot].bindings.push(binding);
            }
        }
    }
    out
}

pub fn dedupe_keymap(keymap: Keymap) -> Keymap {
    Keymap::new(dedupe(keymap.actions))
}

fn fill_missing(target: &mut Action, other: &Action) {
    for (field, value) in [
        (&mut target.display_name, &other.display_name),
        (&mut target.description, &other.description),
        (&mut target.category, &other.category),
    ] {
        if field.is_empty() && !value.is_empty() {
            field.clone_from(value);
        }
    }
    if target.comment.is_none() {
        target.comment.clone_from(&other.comment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{Binding, KeyChordSequence};

    fn names(actions: &[Action]) -> Vec<(&str, Vec<String>)> {
        actions
            .iter()
            .map(|a| {
                (
                    a.name.as_str(),
                    a.bindings.iter().map(|b| b.canonical()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_duplicate_binding_keeps_first() {
        let first = Action::new("actions.copy")
            .with_binding(Binding::parse("k").unwrap().with_comment("first"));
        let second = Action::new("actions.copy")
            .with_binding(Binding::parse("k").unwrap().with_comment("second"));
        let out = dedupe(vec![first, second]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].bindings.len(), 1);
        assert_eq!(out[0].bindings[0].comment.as_deref(), Some("first"));
    }

    #[test]
    fn test_preserves_first_seen_order() {
        let out = dedupe(vec![
            Action::new("b").bind("ctrl+b").unwrap(),
            Action::new("a").bind("ctrl+a").unwrap(),
            Action::new("b").bind("ctrl+c").unwrap(),
            Action::new("b").bind("ctrl+b").unwrap(),
        ]);
        assert_eq!(
            names(&out),
            vec![
                ("b", vec!["ctrl+b".to_string(), "ctrl+c".to_string()]),
                ("a", vec!["ctrl+a".to_string()]),
            ]
        );
    }

    #[test]
    fn test_empty_chords_collapse_but_id_survives() {
        let out = dedupe(vec![
            Action::new("a").with_binding(Binding::default()),
            Action::new("a").with_binding(Binding::new(KeyChordSequence::new(Vec::new()))),
            Action::new("b"),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].bindings.len(), 1);
        assert!(out[1].bindings.is_empty());
    }

    #[test]
    fn test_later_entries_fill_metadata() {
        let mut later = Action::new("a").bind("ctrl+a").unwrap();
        later.description = "from later".to_string();
        later.category = "Edit".to_string();
        let mut first = Action::new("a");
        first.category = "First".to_string();

        let out = dedupe(vec![first, later]);
        assert_eq!(out[0].description, "from later");
        assert_eq!(out[0].category, "First");
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            Action::new("x").bind("ctrl+x").unwrap(),
            Action::new("y").bind("ctrl+y").unwrap().bind("ctrl+y").unwrap(),
            Action::new("x").bind("ctrl+z").unwrap(),
        ];
        let once = dedupe(input);
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);
    }
}

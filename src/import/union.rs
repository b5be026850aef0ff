//! Merge a fresh import into a baseline keymap

use std::collections::{HashMap, HashSet};

use crate::keymap::{Action, Keymap, PairKey};

/// Baseline bindings first, then every imported binding not already present
///
/// Ids only present in the import are appended as new actions in import order.
/// Nothing from the baseline is removed.
pub fn union(baseline: &Keymap, imported: &Keymap) -> Keymap {
    let mut out: Vec<Action> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut seen: HashSet<PairKey> = HashSet::new();

    for action in baseline.actions.iter().chain(&imported.actions) {
        let slot = *index.entry(action.name.as_str()).or_insert_with(|| {
            out.push(Action {
                bindings: Vec::new(),
                ..action.clone()
            });
            out.len() - 1
        });
        for binding in &action.bindings {
            if seen.insert(PairKey::new(&action.name, binding)) {
                out[slot].bindings.push(binding.clone());
            }
        }
    }

    Keymap::new(out)
}

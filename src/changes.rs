//! Change classification between two keymaps
//!
//! Bindings are compared by [`PairKey`]. An action that had exactly one binding
//! before and exactly one after, with different chords, is reported as an
//! update instead of an add plus a remove.

use std::collections::{BTreeMap, HashMap};

use crate::import::decorate_action;
use crate::keymap::{Action, Binding, Keymap, PairKey};
use crate::mappings::ActionMappingTable;

/// A binding that changed chords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingUpdate {
    pub before: Action,
    pub after: Action,
}

/// Every entry carries exactly one binding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeymapChanges {
    pub add: Vec<Action>,
    pub remove: Vec<Action>,
    pub update: Vec<BindingUpdate>,
}

impl KeymapChanges {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty() && self.update.is_empty()
    }

    pub fn len(&self) -> usize {
        self.add.len() + self.remove.len() + self.update.len()
    }
}

type PairIndex<'a> = BTreeMap<PairKey, (&'a Action, &'a Binding)>;

/// Bindings without chords carry no identity and are left out
fn index_pairs(keymap: &Keymap) -> PairIndex<'_> {
    let mut index = BTreeMap::new();
    for (action, binding) in keymap.bindings() {
        if binding.has_chords() {
            index
                .entry(PairKey::new(&action.name, binding))
                .or_insert((action, binding));
        }
    }
    index
}

fn count_by_action<'a>(index: &PairIndex<'a>) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for (action, _) in index.values() {
        *counts.entry(action.name.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Compute add/remove/update sets going from `base` to `merged`
///
/// Entries are decorated from `table` when given. Adds and removes are sorted
/// by action id, updates likewise.
pub fn classify(
    base: &Keymap,
    merged: &Keymap,
    table: Option<&ActionMappingTable>,
) -> KeymapChanges {
    let base_pairs = index_pairs(base);
    let merged_pairs = index_pairs(merged);

    let mut adds: BTreeMap<&PairKey, (&Action, &Binding)> = merged_pairs
        .iter()
        .filter(|(key, _)| !base_pairs.contains_key(*key))
        .map(|(key, pair)| (key, *pair))
        .collect();
    let mut removes: BTreeMap<&PairKey, (&Action, &Binding)> = base_pairs
        .iter()
        .filter(|(key, _)| !merged_pairs.contains_key(*key))
        .map(|(key, pair)| (key, *pair))
        .collect();

    let base_counts = count_by_action(&base_pairs);
    let merged_counts = count_by_action(&merged_pairs);

    let mut update = Vec::new();
    let single_removes: Vec<(&PairKey, &str)> = removes
        .iter()
        .filter(|(_, (action, _))| base_counts.get(action.name.as_str()) == Some(&1))
        .map(|(key, (action, _))| (*key, action.name.as_str()))
        .collect();
    for (removed_key, name) in single_removes {
        if merged_counts.get(name) != Some(&1) {
            continue;
        }
        let Some(added_key) = adds
            .iter()
            .find(|(_, (action, _))| action.name == name)
            .map(|(key, _)| *key)
        else {
            continue;
        };
        let (Some(before), Some(after)) = (removes.remove(removed_key), adds.remove(added_key))
        else {
            continue;
        };
        update.push(BindingUpdate {
            before: entry(before, table),
            after: entry(after, table),
        });
    }

    let mut add: Vec<Action> = adds.into_values().map(|pair| entry(pair, table)).collect();
    let mut remove: Vec<Action> = removes.into_values().map(|pair| entry(pair, table)).collect();
    add.sort_by(|a, b| a.name.cmp(&b.name));
    remove.sort_by(|a, b| a.name.cmp(&b.name));
    update.sort_by(|a, b| a.after.name.cmp(&b.after.name));

    KeymapChanges {
        add,
        remove,
        update,
    }
}

fn entry((action, binding): (&Action, &Binding), table: Option<&ActionMappingTable>) -> Action {
    let mut single = action.with_only(binding.clone());
    match table {
        Some(table) => decorate_action(&mut single, table),
        None => single.bindings.iter_mut().for_each(Binding::refresh_readable),
    }
    single
}

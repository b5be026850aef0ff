//! Which (action, binding) pairs made it into an export

use std::collections::{HashMap, HashSet};

use crate::keymap::{Binding, Keymap};

/// Reason reported for bindings nobody accounted for
pub const ACTION_NOT_SUPPORTED: &str = "action not supported";

/// A binding that was not exported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSkipAction {
    pub action: String,
    pub keybinding: String,
    pub reason: String,
}

/// Exporters mark every binding they write; everything else is reported skipped
#[derive(Debug, Default)]
pub struct ExportMarker {
    exported: HashMap<String, HashSet<String>>,
    skipped_keys: HashMap<String, HashMap<String, String>>,
    skipped_actions: HashMap<String, String>,
}

impl ExportMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_exported(&mut self, action: &str, binding: &Binding) {
        self.exported
            .entry(action.to_string())
            .or_default()
            .insert(binding.canonical());
    }

    /// Skip reason for one binding; the first reason wins
    pub fn mark_skipped(&mut self, action: &str, binding: &Binding, reason: &str) {
        self.skipped_keys
            .entry(action.to_string())
            .or_default()
            .entry(binding.canonical())
            .or_insert_with(|| reason.to_string());
    }

    /// Skip reason for every unexported binding of an action
    pub fn mark_action_skipped(&mut self, action: &str, reason: &str) {
        self.skipped_actions
            .entry(action.to_string())
            .or_insert_with(|| reason.to_string());
    }

    /// Unexported bindings of `keymap`, ordered by action id
    pub fn report(&self, keymap: &Keymap) -> Vec<ExportSkipAction> {
        let mut actions: Vec<_> = keymap.actions.iter().collect();
        actions.sort_by(|a, b| a.name.cmp(&b.name));

        let mut result = Vec::new();
        for action in actions {
            for binding in action.bindings.iter().filter(|b| b.has_chords()) {
                let key = binding.canonical();
                if self
                    .exported
                    .get(&action.name)
                    .is_some_and(|keys| keys.contains(&key))
                {
                    continue;
                }
                let reason = self
                    .skipped_keys
                    .get(&action.name)
                    .and_then(|keys| keys.get(&key))
                    .or_else(|| self.skipped_actions.get(&action.name))
                    .map(String::as_str)
                    .unwrap_or(ACTION_NOT_SUPPORTED);
                result.push(ExportSkipAction {
                    action: action.name.clone(),
                    keybinding: key,
                    reason: reason.to_string(),
                });
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::Action;

    #[test]
    fn test_unmarked_bindings_default_to_not_supported() {
        let keymap: Keymap = vec![
            Action::new("b").bind("ctrl+b").unwrap(),
            Action::new("a")
                .bind("ctrl+a")
                .unwrap()
                .bind("ctrl+shift+a")
                .unwrap(),
            Action::new("c").bind("ctrl+c").unwrap(),
        ]
        .into_iter()
        .collect();
        let mut marker = ExportMarker::new();
        marker.mark_exported("a", &keymap.actions[1].bindings[0]);
        marker.mark_skipped("a", &keymap.actions[1].bindings[1], "editor allows one binding");
        marker.mark_action_skipped("c", "no sidebar");

        let report = marker.report(&keymap);
        let view: Vec<_> = report
            .iter()
            .map(|s| (s.action.as_str(), s.keybinding.as_str(), s.reason.as_str()))
            .collect();
        assert_eq!(
            view,
            vec![
                ("a", "ctrl+shift+a", "editor allows one binding"),
                ("b", "ctrl+b", ACTION_NOT_SUPPORTED),
                ("c", "ctrl+c", "no sidebar"),
            ]
        );
    }
}

//! Bookkeeping of imported and skipped native entries

use std::collections::{HashMap, HashSet};

use super::{ImportSkipAction, ImportSkipReport};

/// Tracks which native commands were imported and why others were skipped
///
/// A command imported at least once is never reported as skipped, even when
/// another of its entries failed.
#[derive(Debug, Default)]
pub struct ImportMarker {
    imported: HashSet<String>,
    skipped: HashMap<String, (String, Vec<String>)>,
    order: Vec<String>,
}

impl ImportMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_imported(&mut self, editor_action: &str) {
        if editor_action.is_empty() {
            return;
        }
        self.imported.insert(editor_action.to_string());
    }

    /// Record a skipped entry; the first reason given for a command is kept
    pub fn mark_skipped(&mut self, editor_action: &str, keybinding: Option<&str>, reason: &str) {
        if editor_action.is_empty() {
            return;
        }
        let entry = self
            .skipped
            .entry(editor_action.to_string())
            .or_insert_with(|| {
                self.order.push(editor_action.to_string());
                (reason.to_string(), Vec::new())
            });
        if let Some(keys) = keybinding {
            entry.1.push(keys.to_string());
        }
    }

    pub fn report(&self) -> ImportSkipReport {
        let skip_actions = self
            .order
            .iter()
            .filter(|action| !self.imported.contains(*action))
            .filter_map(|action| {
                self.skipped
                    .get(action)
                    .map(|(reason, keybindings)| ImportSkipAction {
                        editor_action: action.clone(),
                        keybindings: keybindings.clone(),
                        reason: reason.clone(),
                    })
            })
            .collect();
        ImportSkipReport { skip_actions }
    }
}

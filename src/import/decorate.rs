//! Attach display metadata and refresh readable chord text

use crate::keymap::{Action, Keymap};
use crate::mappings::ActionMappingTable;

/// Fill metadata for one action from the table and recompute its readable text
pub fn decorate_action(action: &mut Action, table: &ActionMappingTable) {
    if let Some(mapping) = table.get(&action.name) {
        if !mapping.name.is_empty() {
            action.display_name = mapping.name.clone();
        }
        if !mapping.description.is_empty() {
            action.description = mapping.description.clone();
        }
        if !mapping.category.is_empty() {
            action.category = mapping.category.clone();
        }
    }
    for binding in &mut action.bindings {
        binding.refresh_readable();
    }
}

pub fn decorate(keymap: &mut Keymap, table: &ActionMappingTable) {
    for action in &mut keymap.actions {
        decorate_action(action, table);
    }
}

//! Built-in validation rules

use std::collections::{BTreeMap, HashSet};

use anyhow::{Context, Result};

use crate::editor::EditorType;
use crate::keymap::{grammar, DEFAULT_SEPARATOR, REFERENCE_PLATFORM};
use crate::mappings::ActionMappingTable;
use crate::platform::Platform;

use super::report::{ConflictAction, Issue};
use super::shadowing::shadowed_shortcut;
use super::{ValidationContext, ValidationRule};

const DANGLING_SUGGESTION: &str =
    "Check if the action ID is correct or if it needs to be added to action mappings";

const DUPLICATE_MESSAGE: &str =
    "This keymap is defined multiple times in the source configuration.";

fn require_table<'a>(
    ctx: &ValidationContext<'a>,
    rule: &str,
) -> Result<&'a ActionMappingTable> {
    ctx.table
        .with_context(|| format!("{} rule requires an action mapping table", rule))
}

/// Chords bound to more than one distinct action
#[derive(Debug, Default)]
pub struct KeybindConflictRule;

impl ValidationRule for KeybindConflictRule {
    fn name(&self) -> &'static str {
        "keybind-conflict"
    }

    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        let mut by_chord: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for (action, binding) in ctx.keymap.bindings() {
            if !binding.has_chords() {
                continue;
            }
            let Ok(keys) = binding.format(REFERENCE_PLATFORM, DEFAULT_SEPARATOR) else {
                continue;
            };
            let actions = by_chord.entry(keys).or_default();
            if !actions.contains(&action.name.as_str()) {
                actions.push(&action.name);
            }
        }

        let family = ctx.source_editor.and_then(EditorType::mapping_family);
        for (keybinding, actions) in by_chord {
            if actions.len() < 2 {
                continue;
            }
            let actions = actions
                .into_iter()
                .map(|action| ConflictAction {
                    action: action.to_string(),
                    editor_command: match (ctx.table, family) {
                        (Some(table), Some(family)) => table
                            .resolve(action, family)
                            .first()
                            .map(|d| d.command.clone())
                            .unwrap_or_default(),
                        _ => String::new(),
                    },
                })
                .collect();
            ctx.report.add_issue(Issue::KeybindConflict {
                keybinding,
                actions,
            });
        }
        Ok(())
    }
}

/// Action ids unknown to the mapping table
#[derive(Debug, Default)]
pub struct DanglingActionRule;

impl ValidationRule for DanglingActionRule {
    fn name(&self) -> &'static str {
        "dangling-action"
    }

    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        let table = require_table(ctx, self.name())?;
        let mut seen = HashSet::new();
        for action in &ctx.keymap.actions {
            if table.contains(&action.name) || !seen.insert(action.name.as_str()) {
                continue;
            }
            ctx.report.add_issue(Issue::DanglingAction {
                action: action.name.clone(),
                suggestion: DANGLING_SUGGESTION.to_string(),
            });
        }
        Ok(())
    }
}

/// Repeated (action, chord) pairs that survived dedupe
#[derive(Debug, Default)]
pub struct DuplicateMappingRule;

impl ValidationRule for DuplicateMappingRule {
    fn name(&self) -> &'static str {
        "duplicate-mapping"
    }

    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        let mut seen = HashSet::new();
        for (action, binding) in ctx.keymap.bindings() {
            if !binding.has_chords() {
                continue;
            }
            let keybinding = binding.canonical();
            if !seen.insert((action.name.as_str(), keybinding.clone())) {
                ctx.report.add_warning(Issue::DuplicateMapping {
                    action: action.name.clone(),
                    keybinding,
                    message: DUPLICATE_MESSAGE.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Actions with no usable descriptor for the export target
#[derive(Debug)]
pub struct UnsupportedActionRule {
    target: EditorType,
}

impl UnsupportedActionRule {
    pub fn new(target: EditorType) -> Self {
        Self { target }
    }
}

impl ValidationRule for UnsupportedActionRule {
    fn name(&self) -> &'static str {
        "unsupported-action"
    }

    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        let table = require_table(ctx, self.name())?;
        // Editors without a mapping column export universal ids directly
        let Some(family) = self.target.mapping_family() else {
            return Ok(());
        };

        for action in &ctx.keymap.actions {
            // Unknown ids are reported by the dangling action rule
            if !table.contains(&action.name)
                || table.resolve_for_export(&action.name, family).is_some()
            {
                continue;
            }
            let (_, note) = table.is_supported(&action.name, family);
            for binding in action.bindings.iter().filter(|b| b.has_chords()) {
                ctx.report.add_issue(Issue::UnsupportedAction {
                    action: action.name.clone(),
                    keybinding: binding.canonical(),
                    target_editor: self.target.to_string(),
                    note: note.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Chords that collide with reserved platform shortcuts
#[derive(Debug)]
pub struct PotentialShadowingRule {
    target: EditorType,
    platform: Platform,
}

impl PotentialShadowingRule {
    pub fn new(target: EditorType, platform: Platform) -> Self {
        Self { target, platform }
    }
}

impl ValidationRule for PotentialShadowingRule {
    fn name(&self) -> &'static str {
        "potential-shadowing"
    }

    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        for (action, binding) in ctx.keymap.bindings() {
            if binding.chords.len() != 1 {
                continue;
            }
            let Ok(keys) = grammar::format(&binding.chords, self.platform, DEFAULT_SEPARATOR)
            else {
                continue;
            };
            if let Some(description) = shadowed_shortcut(self.platform, &keys) {
                ctx.report.add_warning(Issue::PotentialShadowing {
                    action: action.name.clone(),
                    keybinding: keys,
                    target_editor: self.target.to_string(),
                    message: format!(
                        "This key chord is the default for {} on {}.",
                        description, self.platform
                    ),
                });
            }
        }
        Ok(())
    }
}

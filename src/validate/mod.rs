//! Validation rule chain
//!
//! Rules run in a fixed order against one shared [`ValidationReport`]. A rule
//! records what it finds as issues or warnings; returning `Err` means the rule
//! could not run at all and aborts the chain.

mod report;
mod rules;
mod shadowing;

use anyhow::Result;

use crate::editor::EditorType;
use crate::keymap::Keymap;
use crate::mappings::ActionMappingTable;
use crate::platform::Platform;

pub use report::{ConflictAction, Issue, Summary, ValidationReport};
pub use rules::{
    DanglingActionRule, DuplicateMappingRule, KeybindConflictRule, PotentialShadowingRule,
    UnsupportedActionRule,
};
pub use shadowing::{reserved_shortcuts, shadowed_shortcut};

/// Everything a rule may inspect, plus the report it appends to
pub struct ValidationContext<'a> {
    pub keymap: &'a Keymap,
    pub table: Option<&'a ActionMappingTable>,
    /// Editor the keymap was imported from, if known
    pub source_editor: Option<EditorType>,
    pub report: &'a mut ValidationReport,
}

pub trait ValidationRule {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()>;
}

/// Ordered chain of rules
pub struct Validator<'a> {
    table: Option<&'a ActionMappingTable>,
    rules: Vec<Box<dyn ValidationRule>>,
}

impl<'a> Validator<'a> {
    /// Chain without a mapping table; rules that need one fail
    pub fn new(rules: Vec<Box<dyn ValidationRule>>) -> Self {
        Self { table: None, rules }
    }

    /// Builder method to attach the mapping table
    pub fn with_table(mut self, table: &'a ActionMappingTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Append a rule at the end of the chain
    pub fn push(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Rules run after importing: conflicts, dangling ids, duplicates
    pub fn for_import(table: &'a ActionMappingTable) -> Self {
        Self::new(vec![
            Box::new(KeybindConflictRule),
            Box::new(DanglingActionRule),
            Box::new(DuplicateMappingRule),
        ])
        .with_table(table)
    }

    /// Import rules plus the export target checks
    pub fn for_export(table: &'a ActionMappingTable, target: EditorType, platform: Platform) -> Self {
        let mut validator = Self::for_import(table);
        validator.push(Box::new(UnsupportedActionRule::new(target)));
        validator.push(Box::new(PotentialShadowingRule::new(target, platform)));
        validator
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every rule in order and return the finished report
    pub fn validate(
        &self,
        keymap: &Keymap,
        source_editor: Option<EditorType>,
    ) -> Result<ValidationReport> {
        let mut report = ValidationReport::new(
            source_editor.map(|e| e.to_string()).unwrap_or_default(),
            keymap.len(),
        );
        let mut ctx = ValidationContext {
            keymap,
            table: self.table,
            source_editor,
            report: &mut report,
        };
        for rule in &self.rules {
            rule.validate(&mut ctx)?;
            tracing::debug!(
                "Validation rule {} done: {} issues, {} warnings",
                rule.name(),
                ctx.report.issues.len(),
                ctx.report.warnings.len()
            );
        }
        report.finish();
        Ok(report)
    }
}

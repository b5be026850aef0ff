//! Import pipeline
//!
//! ```text
//! plugin bytes → Keymap → decorate → dedupe → sort → validate
//!                                    → union with baseline → classify
//! ```

mod decorate;
mod dedupe;
mod union;

use anyhow::{Context, Result};

use crate::changes::{classify, KeymapChanges};
use crate::editor::EditorType;
use crate::keymap::Keymap;
use crate::mappings::ActionMappingTable;
use crate::plugin::{ImportSkipReport, Registry};
use crate::validate::{ValidationReport, Validator};

pub use decorate::{decorate, decorate_action};
pub use dedupe::{dedupe, dedupe_keymap};
pub use union::union;

/// Output of [`run_pipeline`]
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    /// Merged keymap, sorted by id with one action per id
    pub keymap: Keymap,
    pub changes: KeymapChanges,
    pub report: ValidationReport,
}

fn normalize(mut keymap: Keymap, table: &ActionMappingTable) -> Keymap {
    decorate(&mut keymap, table);
    let mut keymap = dedupe_keymap(keymap);
    keymap.sort_by_name();
    keymap
}

/// Normalize and validate a freshly decoded keymap, then merge it into `baseline`
///
/// Without a baseline (or with an empty one) every binding is an addition.
/// An error means a validation rule could not run.
pub fn run_pipeline(
    imported: Keymap,
    baseline: Option<&Keymap>,
    table: &ActionMappingTable,
    source_editor: Option<EditorType>,
) -> Result<PipelineOutput> {
    let deduped = normalize(imported, table);
    let report = Validator::for_import(table)
        .validate(&deduped, source_editor)
        .context("Validation failed")?;

    let (keymap, changes) = match baseline.filter(|b| !b.is_empty()) {
        Some(baseline) => {
            let merged = normalize(union(baseline, &deduped), table);
            let changes = classify(baseline, &merged, Some(table));
            (merged, changes)
        }
        None => {
            let changes = classify(&Keymap::default(), &deduped, Some(table));
            (deduped, changes)
        }
    };

    tracing::debug!(
        "Import pipeline: {} actions, {} added, {} removed, {} updated",
        keymap.len(),
        changes.add.len(),
        changes.remove.len(),
        changes.update.len()
    );

    Ok(PipelineOutput {
        keymap,
        changes,
        report,
    })
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub editor: EditorType,
    /// Native config bytes
    pub source: Vec<u8>,
    pub baseline: Option<Keymap>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub keymap: Keymap,
    pub changes: KeymapChanges,
    pub report: ValidationReport,
    pub skip_report: ImportSkipReport,
}

/// Import through a registered plugin
pub struct ImportService<'a> {
    registry: &'a Registry,
    table: &'a ActionMappingTable,
}

impl<'a> ImportService<'a> {
    pub fn new(registry: &'a Registry, table: &'a ActionMappingTable) -> Self {
        Self { registry, table }
    }

    pub fn import(&self, opts: &ImportOptions) -> Result<ImportResult> {
        let plugin = self
            .registry
            .get(opts.editor)
            .with_context(|| format!("No plugin registered for {}", opts.editor))?;
        let importer = plugin.importer()?;
        let (keymap, skip_report) = importer
            .import(&opts.source, self.table)
            .with_context(|| format!("Failed to import {} keymap", opts.editor))?;

        tracing::info!(
            "Decoded {} bindings from {} ({} entries skipped)",
            keymap.binding_count(),
            opts.editor,
            skip_report.skip_actions.len()
        );

        let output = run_pipeline(keymap, opts.baseline.as_ref(), self.table, Some(opts.editor))?;
        Ok(ImportResult {
            keymap: output.keymap,
            changes: output.changes,
            report: output.report,
            skip_report,
        })
    }
}

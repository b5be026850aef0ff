//! Export through a registered plugin

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::editor::EditorType;
use crate::keymap::Keymap;
use crate::mappings::ActionMappingTable;
use crate::plugin::Registry;

use super::diff::{structured_diff, unified_diff, DiffStyle};
use super::entries::ConfigEntry;
use super::marker::ExportSkipAction;

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub editor: EditorType,
    pub keymap: Keymap,
    /// Current native config, merged non-destructively when present
    pub existing: Option<Vec<u8>>,
    /// Path shown in the unified diff header
    pub file_path: PathBuf,
    pub diff_style: DiffStyle,
}

#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub diff: String,
    pub base: Vec<ConfigEntry>,
    pub new: Vec<ConfigEntry>,
    pub skip_actions: Vec<ExportSkipAction>,
}

#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub bytes: Vec<u8>,
    pub report: ExportReport,
}

pub struct ExportService<'a> {
    registry: &'a Registry,
    table: &'a ActionMappingTable,
}

impl<'a> ExportService<'a> {
    pub fn new(registry: &'a Registry, table: &'a ActionMappingTable) -> Self {
        Self { registry, table }
    }

    pub fn export(&self, opts: &ExportOptions) -> Result<ExportOutput> {
        let plugin = self
            .registry
            .get(opts.editor)
            .with_context(|| format!("No plugin registered for {}", opts.editor))?;
        let exporter = plugin.exporter()?;
        let export = exporter
            .export(&opts.keymap, opts.existing.as_deref(), self.table)
            .with_context(|| format!("Failed to export keymap for {}", opts.editor))?;

        let diff = match opts.diff_style {
            DiffStyle::Structured => structured_diff(&export.base, &export.new),
            DiffStyle::Unified => {
                let before = opts
                    .existing
                    .as_deref()
                    .map(String::from_utf8_lossy)
                    .unwrap_or_default();
                let after = String::from_utf8_lossy(&export.bytes);
                unified_diff(&opts.file_path.display().to_string(), &before, &after)
            }
        };

        tracing::info!(
            "Exported {} entries for {} ({} skipped)",
            export.new.len(),
            opts.editor,
            export.skip_actions.len()
        );

        Ok(ExportOutput {
            bytes: export.bytes,
            report: ExportReport {
                diff,
                base: export.base,
                new: export.new,
                skip_actions: export.skip_actions,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::Action;
    use crate::mappings::load_mapping_table_from_str;

    const MAPPINGS: &str = r#"
mappings:
  - id: actions.edit.copy
    vscode: {command: editor.action.clipboardCopyAction}
"#;

    fn options(diff_style: DiffStyle, existing: Option<&str>) -> ExportOptions {
        ExportOptions {
            editor: EditorType::VSCode,
            keymap: vec![Action::new("actions.edit.copy").bind("meta+c").unwrap()]
                .into_iter()
                .collect(),
            existing: existing.map(|s| s.as_bytes().to_vec()),
            file_path: PathBuf::from("keybindings.json"),
            diff_style,
        }
    }

    #[test]
    fn test_export_unified_diff() {
        let table = load_mapping_table_from_str(MAPPINGS).unwrap();
        let registry = Registry::with_builtin();
        let service = ExportService::new(&registry, &table);

        let output = service.export(&options(DiffStyle::Unified, Some("[]\n"))).unwrap();
        assert!(output.report.diff.starts_with("diff --git a/keybindings.json b/keybindings.json\n"));
        assert!(output.report.diff.contains("-[]\n"));
        assert!(output.report.diff.contains("+    \"key\": \"cmd+c\",\n"));

        // exporting again over its own output changes nothing
        let text = String::from_utf8(output.bytes).unwrap();
        let again = service.export(&options(DiffStyle::Unified, Some(&text))).unwrap();
        assert_eq!(again.report.diff, "");
    }

    #[test]
    fn test_export_structured_diff() {
        let table = load_mapping_table_from_str(MAPPINGS).unwrap();
        let registry = Registry::with_builtin();
        let service = ExportService::new(&registry, &table);

        let existing = r#"[{"key": "cmd+c", "command": "my.copy"}]"#;
        let output = service
            .export(&options(DiffStyle::Structured, Some(existing)))
            .unwrap();
        assert_eq!(
            output.report.diff,
            "-cmd+c => my.copy\n+cmd+c => editor.action.clipboardCopyAction\n"
        );
    }

    #[test]
    fn test_export_unknown_editor_fails() {
        let table = ActionMappingTable::default();
        let registry = Registry::new();
        let service = ExportService::new(&registry, &table);
        assert!(service.export(&options(DiffStyle::Unified, None)).is_err());
    }
}

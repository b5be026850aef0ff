use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use keybridge::cli::{CliArgs, Request};
use keybridge::config::AppConfig;
use keybridge::editor::EditorType;
use keybridge::export::{ExportOptions, ExportService};
use keybridge::import::{ImportOptions, ImportService};
use keybridge::keymap::{self, Keymap, SaveOptions};
use keybridge::mappings::{load_mapping_table, ActionMappingTable};
use keybridge::platform::Platform;
use keybridge::plugin::{ConfigDetectOptions, Registry};
use keybridge::validate::Validator;
use keybridge::KeymapChanges;

struct App {
    config: AppConfig,
    registry: Registry,
    table: ActionMappingTable,
    detect: ConfigDetectOptions,
}

impl App {
    fn new(sandbox: bool) -> Result<Self> {
        let config = AppConfig::load();
        let table = load_mapping_table(&config.mapping_files())
            .context("Failed to load action mappings")?;
        Ok(Self {
            config,
            registry: Registry::with_builtin(),
            table,
            detect: ConfigDetectOptions { sandbox },
        })
    }

    fn keymap_path(&self, input: Option<PathBuf>) -> Result<PathBuf> {
        input
            .or_else(|| self.config.keymap_file())
            .context("No universal keymap path available")
    }

    /// Existing universal keymap, empty when the file does not exist yet
    fn load_keymap(&self, path: &Path) -> Result<Keymap> {
        if !path.exists() {
            tracing::debug!("No keymap at {}, starting empty", path.display());
            return Ok(Keymap::default());
        }
        keymap::load_keymap_file(path)
            .with_context(|| format!("Failed to load keymap from {}", path.display()))
    }

    /// First detected config path of an editor
    fn editor_config_path(&self, editor: EditorType) -> Result<PathBuf> {
        let plugin = self
            .registry
            .get(editor)
            .with_context(|| format!("No plugin registered for {}", editor))?;
        let detection = plugin.config_detect(&self.detect)?;
        detection
            .paths
            .into_iter()
            .next()
            .with_context(|| format!("No config location known for {}", editor))
    }

    fn import(
        &self,
        editor: EditorType,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        dry_run: bool,
    ) -> Result<()> {
        let source_path = match input {
            Some(path) => path,
            None => self.editor_config_path(editor)?,
        };
        let source = std::fs::read(&source_path)
            .with_context(|| format!("Failed to read {}", source_path.display()))?;
        let keymap_path = self.keymap_path(output)?;
        let baseline = self.load_keymap(&keymap_path)?;

        let result = ImportService::new(&self.registry, &self.table).import(&ImportOptions {
            editor,
            source,
            baseline: Some(baseline),
        })?;

        print_changes(&result.changes);
        for skipped in &result.skip_report.skip_actions {
            println!(
                "skipped {} [{}]: {}",
                skipped.editor_action,
                skipped.keybindings.join(", "),
                skipped.reason
            );
        }
        println!("{}", result.report);

        if dry_run {
            return Ok(());
        }
        keymap::save_keymap_file(&keymap_path, &result.keymap, SaveOptions::default())
            .with_context(|| format!("Failed to write {}", keymap_path.display()))?;
        println!("Wrote {}", keymap_path.display());
        Ok(())
    }

    fn export(
        &self,
        editor: EditorType,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        diff: Option<keybridge::export::DiffStyle>,
        dry_run: bool,
    ) -> Result<()> {
        let keymap_path = self.keymap_path(input)?;
        if !keymap_path.exists() {
            bail!("No universal keymap at {}", keymap_path.display());
        }
        let keymap = self.load_keymap(&keymap_path)?;
        let target = match output {
            Some(path) => path,
            None => self.editor_config_path(editor)?,
        };
        let existing = if target.exists() {
            Some(
                std::fs::read(&target)
                    .with_context(|| format!("Failed to read {}", target.display()))?,
            )
        } else {
            None
        };

        let output = ExportService::new(&self.registry, &self.table).export(&ExportOptions {
            editor,
            keymap,
            existing,
            file_path: target.clone(),
            diff_style: diff.unwrap_or(self.config.diff_style),
        })?;

        if output.report.diff.is_empty() {
            println!("No changes");
        } else {
            print!("{}", output.report.diff);
        }
        for skipped in &output.report.skip_actions {
            println!(
                "skipped {} ({}): {}",
                skipped.action, skipped.keybinding, skipped.reason
            );
        }

        if dry_run {
            return Ok(());
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&target, &output.bytes)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        println!("Wrote {}", target.display());
        Ok(())
    }

    fn validate(
        &self,
        input: Option<PathBuf>,
        target: Option<EditorType>,
        platform: Option<Platform>,
    ) -> Result<bool> {
        let keymap_path = self.keymap_path(input)?;
        let keymap = self.load_keymap(&keymap_path)?;
        let validator = match target {
            Some(target) => Validator::for_export(
                &self.table,
                target,
                platform.unwrap_or_else(|| self.config.platform()),
            ),
            None => Validator::for_import(&self.table),
        };
        let report = validator.validate(&keymap, None)?;
        println!("{}", report);
        Ok(report.issues.is_empty())
    }

    fn editors(&self) {
        for editor in EditorType::ALL {
            let Some(plugin) = self.registry.get(editor) else {
                println!("{:<20} (no plugin)", editor);
                continue;
            };
            match plugin.config_detect(&self.detect) {
                Ok(detection) => {
                    let paths: Vec<String> = detection
                        .paths
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect();
                    let installed = if detection.installed { "installed" } else { "-" };
                    println!("{:<20} {:<10} {}", editor, installed, paths.join(", "));
                }
                Err(e) => println!("{:<20} {}", editor, e),
            }
        }
    }
}

fn print_changes(changes: &KeymapChanges) {
    if changes.is_empty() {
        println!("No changes");
        return;
    }
    for action in &changes.add {
        for binding in &action.bindings {
            println!("+ {} {}", action.name, binding.readable);
        }
    }
    for action in &changes.remove {
        for binding in &action.bindings {
            println!("- {} {}", action.name, binding.readable);
        }
    }
    for update in &changes.update {
        let before: Vec<&str> = update.before.bindings.iter().map(|b| b.readable.as_str()).collect();
        let after: Vec<&str> = update.after.bindings.iter().map(|b| b.readable.as_str()).collect();
        println!(
            "~ {} {} -> {}",
            update.after.name,
            before.join(", "),
            after.join(", ")
        );
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    keybridge::tracing::init();

    let sandbox = args.sandbox;
    let request = match args.into_request() {
        Ok(request) => request,
        Err(e) => bail!(e),
    };
    let app = App::new(sandbox)?;

    match request {
        Request::Import {
            editor,
            input,
            output,
            dry_run,
        } => app.import(editor, input, output, dry_run)?,
        Request::Export {
            editor,
            input,
            output,
            diff,
            dry_run,
        } => app.export(editor, input, output, diff, dry_run)?,
        Request::Validate {
            input,
            target,
            platform,
        } => {
            if !app.validate(input, target, platform)? {
                std::process::exit(1);
            }
        }
        Request::Editors => app.editors(),
    }
    Ok(())
}

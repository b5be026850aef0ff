//! Command-line argument parsing
//!
//! Supports:
//! - Importing an editor's keybindings into the universal keymap
//! - Exporting the universal keymap into an editor's config
//! - Validating the universal keymap against a target editor
//! - Listing supported editors and their config locations

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::editor::EditorType;
use crate::export::DiffStyle;
use crate::platform::Platform;

/// Move keybindings between editors
#[derive(Parser, Debug)]
#[command(name = "keybridge", version, about = "Move keybindings between editors")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Do not probe the environment for installed editors
    #[arg(long, global = true)]
    pub sandbox: bool,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Import an editor config into the universal keymap
    Import {
        /// Editor to import from (e.g. vscode, cursor)
        #[arg(long, value_name = "EDITOR")]
        from: String,
        /// Editor config to read instead of the detected one
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,
        /// Where to write the universal keymap
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Print the result without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Export the universal keymap into an editor config
    Export {
        /// Editor to export to
        #[arg(long, value_name = "EDITOR")]
        to: String,
        /// Universal keymap to read instead of the configured one
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,
        /// Editor config to merge into and write
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Diff style: unified or structured
        #[arg(long, value_name = "STYLE")]
        diff: Option<String>,
        /// Print the diff without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Check the universal keymap for problems
    Validate {
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,
        /// Also check support and OS shortcut shadowing for this editor
        #[arg(long, value_name = "EDITOR")]
        target: Option<String>,
        /// Platform for shadowing checks (macos, windows, linux)
        #[arg(long, value_name = "PLATFORM")]
        platform: Option<String>,
    },
    /// List supported editors and their config locations
    Editors,
}

/// A validated command ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Import {
        editor: EditorType,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        dry_run: bool,
    },
    Export {
        editor: EditorType,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        diff: Option<DiffStyle>,
        dry_run: bool,
    },
    Validate {
        input: Option<PathBuf>,
        target: Option<EditorType>,
        platform: Option<Platform>,
    },
    Editors,
}

impl CliArgs {
    /// Convert parsed CLI args into a request, rejecting unknown names
    pub fn into_request(self) -> Result<Request, String> {
        let request = match self.command {
            CliCommand::Import {
                from,
                input,
                output,
                dry_run,
            } => Request::Import {
                editor: from.parse()?,
                input,
                output,
                dry_run,
            },
            CliCommand::Export {
                to,
                input,
                output,
                diff,
                dry_run,
            } => Request::Export {
                editor: to.parse()?,
                input,
                output,
                diff: diff.map(|d| d.parse()).transpose()?,
                dry_run,
            },
            CliCommand::Validate {
                input,
                target,
                platform,
            } => Request::Validate {
                input,
                target: target.map(|t| t.parse()).transpose()?,
                platform: platform.map(|p| p.parse()).transpose()?,
            },
            CliCommand::Editors => Request::Editors,
        };
        Ok(request)
    }
}

//! Command-line interface for filextract.
//!
//! Without a subcommand the binary serves the tools over stdio. The
//! `extract`, `list` and `organize` subcommands run one operation directly
//! and print either a coloured summary or the tool's JSON payload.

use crate::category::OrganizeBy;
use crate::config::Settings;
use crate::conflict::ConflictPolicy;
use crate::extract::{ExtractOptions, Extractor};
use crate::listing::Lister;
use crate::logging;
use crate::organize::Organizer;
use crate::output::OutputFormatter;
use crate::server::Server;
use crate::tools::{ExtractPayload, ListPayload, OrganizePayload, ToolBox};
use crate::transfer::TransferMode;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "filextract", version, about = "Bulk file extraction, listing and organization")]
pub struct Cli {
    /// Configuration file to use instead of the default search path.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter (e.g. `debug`, `filextract=trace`); overrides RUST_LOG.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the tools as JSON-RPC over stdin/stdout (default).
    Serve,

    /// Copy or move matching files from SOURCE into TARGET.
    Extract(ExtractCommand),

    /// List the entries of DIR.
    List(ListCommand),

    /// Copy the files of SOURCE into category subdirectories.
    Organize {
        source: PathBuf,
        /// Defaults to SOURCE.
        target: Option<PathBuf>,
        /// extension, date or size.
        #[arg(long)]
        by: Option<OrganizeBy>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    pub source: PathBuf,
    pub target: PathBuf,
    /// Glob on file names, e.g. `*.jpg`.
    #[arg(short, long)]
    pub pattern: Option<String>,
    /// Descend into subdirectories of SOURCE.
    #[arg(long, overrides_with = "no_recursive")]
    pub recursive: bool,
    /// Only look at the top level of SOURCE.
    #[arg(long, overrides_with = "recursive")]
    pub no_recursive: bool,
    /// Move files instead of copying them.
    #[arg(long = "move")]
    pub move_files: bool,
    /// skip, overwrite or rename.
    #[arg(long)]
    pub conflict: Option<ConflictPolicy>,
    /// Write every file directly into TARGET.
    #[arg(long, overrides_with = "no_flatten")]
    pub flatten: bool,
    /// Keep the relative directory structure under TARGET.
    #[arg(long, overrides_with = "flatten")]
    pub no_flatten: bool,
    #[arg(long)]
    pub json: bool,
}

impl ExtractCommand {
    /// Command-line flags win; anything not given comes from `settings`.
    pub fn options(&self, settings: &Settings) -> ExtractOptions {
        ExtractOptions {
            pattern: self.pattern.clone(),
            recursive: toggle(self.recursive, self.no_recursive)
                .unwrap_or(settings.extract.recursive),
            mode: if self.move_files {
                TransferMode::Move
            } else {
                TransferMode::Copy
            },
            conflict: self
                .conflict
                .unwrap_or(settings.extract.conflict_resolution),
            flatten: toggle(self.flatten, self.no_flatten).unwrap_or(settings.extract.flatten),
        }
    }
}

#[derive(Debug, Args)]
pub struct ListCommand {
    pub dir: PathBuf,
    #[arg(short, long)]
    pub pattern: Option<String>,
    #[arg(short, long, overrides_with = "no_recursive")]
    pub recursive: bool,
    #[arg(long, overrides_with = "recursive")]
    pub no_recursive: bool,
    #[arg(long)]
    pub json: bool,
}

impl ListCommand {
    pub fn recursive(&self, settings: &Settings) -> bool {
        toggle(self.recursive, self.no_recursive).unwrap_or(settings.list.recursive)
    }
}

/// Collapses an `--x` / `--no-x` flag pair; `None` when neither was given.
fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Runs the parsed command line.
///
/// Returns an error message when configuration cannot be loaded, the server
/// fails on its streams, or a one-shot operation fails outright.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use filextract::cli::{Cli, run};
///
/// let cli = Cli::parse_from(["filextract", "list", "/tmp"]);
/// if let Err(e) = run(cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run(cli: Cli) -> Result<(), String> {
    let settings = Settings::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    logging::init(&settings.logging.level, cli.log_level.as_deref());

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => Server::new(ToolBox::new(settings))
            .run_stdio()
            .map_err(|e| format!("Server error: {}", e)),
        Command::Extract(command) => {
            let report = Extractor::new(command.options(&settings), &settings)
                .run(&command.source, &command.target)
                .map_err(|e| e.to_string())?;
            if command.json {
                print_json(&ExtractPayload::new(&report, settings.report.max_failures))
            } else {
                OutputFormatter::extract_summary(&report);
                Ok(())
            }
        }
        Command::List(command) => {
            let report = Lister::new(command.pattern.clone(), command.recursive(&settings))
                .run(&command.dir)
                .map_err(|e| e.to_string())?;
            if command.json {
                print_json(&ListPayload::new(&report, settings.report.max_failures))
            } else {
                OutputFormatter::list_summary(&report);
                Ok(())
            }
        }
        Command::Organize {
            source,
            target,
            by,
            json,
        } => {
            let by = by.unwrap_or(settings.organize.organize_by);
            let report = Organizer::new(by)
                .run(&source, target.as_deref())
                .map_err(|e| e.to_string())?;
            if json {
                print_json(&OrganizePayload::new(&report, settings.report.max_failures))
            } else {
                OutputFormatter::organize_summary(&report);
                Ok(())
            }
        }
    }
}

fn print_json<T: Serialize>(payload: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(payload).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

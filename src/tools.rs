//! The three callable tools and their result payloads.
//!
//! Each tool takes a JSON argument record, runs one operation and returns a
//! [`ToolOutput`]. Success payloads are pretty-printed JSON; failures are a
//! single `Error: ...` line with `is_error` set. No error escapes a call.

use crate::category::OrganizeBy;
use crate::config::Settings;
use crate::conflict::ConflictPolicy;
use crate::error::OperationResult;
use crate::extract::{ExtractOptions, ExtractReport, Extractor};
use crate::listing::{FileRecord, ListReport, Lister};
use crate::organize::{OrganizeReport, Organizer};
use crate::summary::{self, Failure};
use crate::transfer::TransferMode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::Path;
use tracing::{debug, error};

/// Content block returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

/// The result envelope of one tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
    pub content: Vec<Content>,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(text: String) -> Self {
        Self {
            content: vec![Content::Text { text }],
            is_error: false,
        }
    }

    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            content: vec![Content::Text {
                text: format!("Error: {}", message),
            }],
            is_error: true,
        }
    }

    /// The text of the first content block.
    pub fn text(&self) -> &str {
        match self.content.first() {
            Some(Content::Text { text }) => text,
            None => "",
        }
    }
}

/// Tool description published to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// A callable tool.
pub trait Tool {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema of the argument record.
    fn input_schema(&self) -> Value;

    fn call(&self, arguments: Value, settings: &Settings) -> ToolOutput;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }
}

/// The tools served by this crate, looked up by name.
pub struct ToolBox {
    tools: Vec<Box<dyn Tool>>,
    settings: Settings,
}

impl ToolBox {
    pub fn new(settings: Settings) -> Self {
        Self {
            tools: vec![
                Box::new(ExtractFilesTool),
                Box::new(ListFilesTool),
                Box::new(OrganizeFilesTool),
            ],
            settings,
        }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    /// Calls the tool named `name`; an unknown name is an error result.
    pub fn call(&self, name: &str, arguments: Value) -> ToolOutput {
        debug!("Calling tool {}", name);
        match self.tools.iter().find(|tool| tool.name() == name) {
            Some(tool) => tool.call(arguments, &self.settings),
            None => ToolOutput::error(format!("Unknown tool: {}", name)),
        }
    }
}

impl Default for ToolBox {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolOutput> {
    // A call without arguments is treated as an empty record.
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments).map_err(|e| ToolOutput::error(format!("Invalid arguments: {}", e)))
}

fn render<T: Serialize>(payload: &T) -> ToolOutput {
    match serde_json::to_string_pretty(payload) {
        Ok(text) => ToolOutput::success(text),
        Err(e) => {
            error!("Failed to serialize tool result: {}", e);
            ToolOutput::error(e)
        }
    }
}

fn respond<R>(result: OperationResult<R>, on_success: impl FnOnce(R) -> ToolOutput) -> ToolOutput {
    match result {
        Ok(report) => on_success(report),
        Err(e) => {
            error!("{}", e);
            ToolOutput::error(e)
        }
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

// ---------------------------------------------------------------------------
// extract_files
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractArgs {
    pub source_dir: String,
    pub target_dir: String,
    pub pattern: Option<String>,
    pub recursive: Option<bool>,
    #[serde(rename = "move", default)]
    pub move_files: bool,
    pub conflict_resolution: Option<ConflictPolicy>,
    pub flatten: Option<bool>,
}

impl ExtractArgs {
    pub fn options(&self, settings: &Settings) -> ExtractOptions {
        ExtractOptions {
            pattern: self.pattern.clone(),
            recursive: self.recursive.unwrap_or(settings.extract.recursive),
            mode: if self.move_files {
                TransferMode::Move
            } else {
                TransferMode::Copy
            },
            conflict: self
                .conflict_resolution
                .unwrap_or(settings.extract.conflict_resolution),
            flatten: self.flatten.unwrap_or(settings.extract.flatten),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractPayload<'a> {
    pub success: bool,
    pub message: String,
    pub summary: ExtractSummaryPayload<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractSummaryPayload<'a> {
    pub total_processed: usize,
    pub conflicts_resolved: usize,
    pub errors: usize,
    pub operation: &'static str,
    pub source_directory: String,
    pub target_directory: String,
    #[serde(skip_serializing_if = "no_failures")]
    pub failures: &'a [Failure],
}

impl<'a> ExtractPayload<'a> {
    pub fn new(report: &'a ExtractReport, max_failures: usize) -> Self {
        let verb = match report.mode {
            TransferMode::Copy => "copying",
            TransferMode::Move => "moving",
        };
        Self {
            success: true,
            message: format!("Operation completed {} files", verb),
            summary: ExtractSummaryPayload {
                total_processed: report.summary.processed,
                conflicts_resolved: report.summary.conflicts,
                errors: report.summary.errors,
                operation: report.mode.as_str(),
                source_directory: display(&report.source),
                target_directory: display(&report.target),
                failures: summary::bounded(&report.summary.failures, max_failures),
            },
        }
    }
}

pub struct ExtractFilesTool;

impl Tool for ExtractFilesTool {
    fn name(&self) -> &'static str {
        "extract_files"
    }

    fn description(&self) -> &'static str {
        "Copy or move files matching a pattern from a source directory tree into a target directory"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "sourceDir": { "type": "string", "description": "Source directory path" },
                "targetDir": { "type": "string", "description": "Target directory path" },
                "pattern": { "type": "string", "description": "File name pattern to extract (e.g. *.jpg, *.txt)" },
                "recursive": { "type": "boolean", "default": true, "description": "Search subdirectories recursively" },
                "move": { "type": "boolean", "default": false, "description": "Move files instead of copying them" },
                "conflictResolution": {
                    "type": "string",
                    "enum": ["skip", "overwrite", "rename"],
                    "default": "rename",
                    "description": "How to handle name conflicts in the target"
                },
                "flatten": { "type": "boolean", "default": false, "description": "Write every file directly into the target directory" }
            },
            "required": ["sourceDir", "targetDir"]
        })
    }

    fn call(&self, arguments: Value, settings: &Settings) -> ToolOutput {
        let args: ExtractArgs = match parse_arguments(arguments) {
            Ok(args) => args,
            Err(output) => return output,
        };
        let result = Extractor::new(args.options(settings), settings)
            .run(Path::new(&args.source_dir), Path::new(&args.target_dir));
        respond(result, |report| {
            render(&ExtractPayload::new(&report, settings.report.max_failures))
        })
    }
}

// ---------------------------------------------------------------------------
// list_files
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListArgs {
    pub directory: String,
    pub pattern: Option<String>,
    pub recursive: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPayload<'a> {
    pub directory: String,
    pub total_files: usize,
    pub files: &'a [FileRecord],
    #[serde(skip_serializing_if = "is_zero")]
    pub errors: usize,
    #[serde(skip_serializing_if = "no_failures")]
    pub failures: &'a [Failure],
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

fn no_failures(failures: &&[Failure]) -> bool {
    failures.is_empty()
}

impl<'a> ListPayload<'a> {
    pub fn new(report: &'a ListReport, max_failures: usize) -> Self {
        Self {
            directory: display(&report.directory),
            total_files: report.inventory.records.len(),
            files: &report.inventory.records,
            errors: report.inventory.errors,
            failures: summary::bounded(&report.inventory.failures, max_failures),
        }
    }
}

pub struct ListFilesTool;

impl Tool for ListFilesTool {
    fn name(&self) -> &'static str {
        "list_files"
    }

    fn description(&self) -> &'static str {
        "List the entries of a directory with size, type and modification time"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "directory": { "type": "string", "description": "Directory to list" },
                "pattern": { "type": "string", "description": "Name pattern to list (e.g. *.jpg, *.txt)" },
                "recursive": { "type": "boolean", "default": false, "description": "List recursively" }
            },
            "required": ["directory"]
        })
    }

    fn call(&self, arguments: Value, settings: &Settings) -> ToolOutput {
        let args: ListArgs = match parse_arguments(arguments) {
            Ok(args) => args,
            Err(output) => return output,
        };
        let recursive = args.recursive.unwrap_or(settings.list.recursive);
        let result = Lister::new(args.pattern, recursive).run(Path::new(&args.directory));
        respond(result, |report| {
            render(&ListPayload::new(&report, settings.report.max_failures))
        })
    }
}

// ---------------------------------------------------------------------------
// organize_files
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizeArgs {
    pub source_dir: String,
    pub target_dir: Option<String>,
    pub organize_by: Option<OrganizeBy>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizePayload<'a> {
    pub success: bool,
    pub message: String,
    pub summary: OrganizeSummaryPayload<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizeSummaryPayload<'a> {
    pub total_files: usize,
    pub organized: usize,
    pub errors: usize,
    pub source_directory: String,
    pub target_directory: String,
    pub organization_criteria: OrganizeBy,
    #[serde(skip_serializing_if = "no_failures")]
    pub failures: &'a [Failure],
}

impl<'a> OrganizePayload<'a> {
    pub fn new(report: &'a OrganizeReport, max_failures: usize) -> Self {
        Self {
            success: true,
            message: format!("Files organized by {}", report.criteria),
            summary: OrganizeSummaryPayload {
                total_files: report.summary.total_files,
                organized: report.summary.organized,
                errors: report.summary.errors,
                source_directory: display(&report.source),
                target_directory: display(&report.target),
                organization_criteria: report.criteria,
                failures: summary::bounded(&report.summary.failures, max_failures),
            },
        }
    }
}

pub struct OrganizeFilesTool;

impl Tool for OrganizeFilesTool {
    fn name(&self) -> &'static str {
        "organize_files"
    }

    fn description(&self) -> &'static str {
        "Copy the files of a directory into subdirectories named by extension, modification month or size"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "sourceDir": { "type": "string", "description": "Source directory path" },
                "targetDir": { "type": "string", "description": "Target directory path (defaults to the source directory)" },
                "organizeBy": {
                    "type": "string",
                    "enum": ["extension", "date", "size"],
                    "default": "extension",
                    "description": "Organization criteria"
                }
            },
            "required": ["sourceDir"]
        })
    }

    fn call(&self, arguments: Value, settings: &Settings) -> ToolOutput {
        let args: OrganizeArgs = match parse_arguments(arguments) {
            Ok(args) => args,
            Err(output) => return output,
        };
        let by = args.organize_by.unwrap_or(settings.organize.organize_by);
        let result = Organizer::new(by).run(
            Path::new(&args.source_dir),
            args.target_dir.as_deref().map(Path::new),
        );
        respond(result, |report| {
            render(&OrganizePayload::new(&report, settings.report.max_failures))
        })
    }
}

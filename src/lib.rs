//! filextract - bulk file extraction, listing and organization
//!
//! This library walks directory trees to copy or move files matching a glob
//! into a target directory, lists directory contents with metadata, and sorts
//! files into category subdirectories. The operations are exposed as tools
//! over a line-delimited JSON-RPC server on stdio and as CLI subcommands.

pub mod category;
pub mod cli;
pub mod config;
pub mod conflict;
pub mod error;
pub mod extract;
pub mod listing;
pub mod logging;
pub mod organize;
pub mod output;
pub mod paths;
pub mod pattern;
pub mod server;
pub mod summary;
pub mod tools;
pub mod transfer;
pub mod walker;

pub use category::OrganizeBy;
pub use config::{ConfigError, Settings};
pub use conflict::{ConflictPolicy, ConflictResolver, Resolution};
pub use error::{OperationError, OperationResult};
pub use extract::{ExtractOptions, ExtractReport, Extractor};
pub use listing::{FileRecord, ListReport, Lister};
pub use organize::{OrganizeReport, Organizer};
pub use server::Server;
pub use tools::{ToolBox, ToolOutput};
pub use transfer::TransferMode;

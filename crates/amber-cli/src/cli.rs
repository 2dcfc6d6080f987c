//! Command-line arguments

use amber_client::{Config, ExportType, FilesOptions, SortKey, SortOrder, DEFAULT_BASE_PATH};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "amber")]
#[command(about = "Command-line client for the Amber storage API")]
#[command(version)]
pub struct Args {
    /// Server origin
    #[arg(long, default_value = "http://localhost:5173", env = "AMBER_ENDPOINT")]
    pub endpoint: String,

    /// Path prefix of the storage API
    #[arg(long, default_value = DEFAULT_BASE_PATH, env = "AMBER_BASE_PATH")]
    pub base_path: String,

    /// Give up on a request after this many seconds (no limit by default)
    #[arg(long, env = "AMBER_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, env = "AMBER_DEBUG")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Client configuration described by the global flags
    pub fn client_config(&self) -> Config {
        let config = Config::new(&self.endpoint).with_base_path(&self.base_path);
        match self.timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show quota and usage breakdown
    Info,
    /// Stored files
    Files {
        #[command(subcommand)]
        command: FilesCommand,
    },
    /// Trashed files
    Trash {
        #[command(subcommand)]
        command: TrashCommand,
    },
    /// Export jobs
    Export {
        #[command(subcommand)]
        command: ExportCommand,
    },
    /// Storage add-ons
    Addons {
        #[command(subcommand)]
        command: AddonsCommand,
    },
    /// Print the download URL of a stored object
    DownloadUrl {
        /// Storage key of the object
        key: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum FilesCommand {
    /// List files
    List(ListArgs),
    /// Show one file
    Get { id: String },
    /// Move a file to the trash
    Delete { id: String },
    /// Restore a file from the trash
    Restore { id: String },
}

#[derive(ClapArgs, Debug, Default)]
pub struct ListArgs {
    #[arg(long)]
    pub product: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,
    /// created_at, size_bytes or filename
    #[arg(long)]
    pub sort: Option<SortKey>,
    /// asc or desc
    #[arg(long)]
    pub order: Option<SortOrder>,
    #[arg(long)]
    pub limit: Option<u64>,
    #[arg(long)]
    pub offset: Option<u64>,
}

impl From<ListArgs> for FilesOptions {
    fn from(args: ListArgs) -> Self {
        Self {
            product: args.product,
            category: args.category,
            search: args.search,
            sort: args.sort,
            order: args.order,
            limit: args.limit,
            offset: args.offset,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum TrashCommand {
    /// List trashed files
    List,
    /// Permanently delete everything in the trash
    Empty,
    /// Permanently delete one trashed file
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ExportCommand {
    /// Queue a new export
    Create {
        /// full, blog, ivy or category
        #[arg(long = "type")]
        export_type: ExportType,
        /// Filter entry as KEY=VALUE, repeatable
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },
    /// Show the status of an export
    Status { id: String },
    /// Show the download link of a finished export
    Download { id: String },
}

#[derive(Subcommand, Debug)]
pub enum AddonsCommand {
    /// List available and purchased add-ons
    List,
    /// Start checkout for an add-on
    Purchase { addon_type: String },
    /// Cancel a purchased add-on
    Cancel { id: String },
}

/// Parse a `KEY=VALUE` pair
pub fn parse_filter(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid filter '{}', expected KEY=VALUE", s)),
    }
}

//! Command-line interface definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use linktoggle_core::LinkStyle;
use std::path::PathBuf;

/// Links Toggler
///
/// Converts links between [[wikilinks]] and [markdown](links) across a vault.
/// Bulk runs follow the persisted safe mode: with safe mode on (the default)
/// they only report what would change.
#[derive(Parser, Debug)]
#[command(name = "linktoggle", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the vault directory
    #[arg(short, long, env = "LINKTOGGLE_VAULT", default_value = ".", global = true)]
    pub vault: PathBuf,

    /// Settings file (JSON, or YAML for .yaml/.yml). Defaults to <vault>/.linktoggle.json
    #[arg(short, long, env = "LINKTOGGLE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `linktoggle_batch=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Human, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert [[wikilinks]] to [markdown](links)
    WikiToMd(WikiToMdArgs),

    /// Convert [markdown](links) to [[wikilinks]]
    MdToWiki(ConvertArgs),

    /// Toggle safe mode and persist it
    SafeMode,

    /// Manage folders skipped by bulk conversion
    #[command(subcommand)]
    Ignore(IgnoreCommands),
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Convert a single document (vault-relative or absolute path)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Write changes even if safe mode is on
    #[arg(long, conflicts_with = "dry_run")]
    pub apply: bool,

    /// Only report what would change
    #[arg(long)]
    pub dry_run: bool,

    /// Print the bulk report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct WikiToMdArgs {
    #[command(flatten)]
    pub convert: ConvertArgs,

    /// Path style for generated links (absolute or relative); overrides the settings
    #[arg(long)]
    pub style: Option<LinkStyle>,
}

#[derive(Subcommand, Debug)]
pub enum IgnoreCommands {
    /// Skip a folder in bulk conversion
    Add {
        /// Folder path relative to the vault root, e.g. Templates or Archive/Old
        folder: String,
    },

    /// Stop skipping a folder
    Remove { folder: String },

    /// List ignored folders
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact human-readable lines
    Human,
    /// One JSON object per line
    Json,
}

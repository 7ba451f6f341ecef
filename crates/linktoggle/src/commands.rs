//! Command handlers.
//!
//! Each handler returns the line to print so the binary stays a thin shell
//! around [`run`].

use anyhow::{Context, Result};
use linktoggle_batch::{CancellationToken, Orchestrator};
use linktoggle_core::{ConversionSettings, Direction};
use linktoggle_vault::VaultStore;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, Commands, ConvertArgs, IgnoreCommands};

/// Settings file looked up in the vault root when `--config` is not given
pub const DEFAULT_SETTINGS_FILE: &str = ".linktoggle.json";

/// Where settings are read from and saved to
pub fn settings_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(|| cli.vault.join(DEFAULT_SETTINGS_FILE))
}

/// Execute the parsed command
pub async fn run(cli: &Cli, cancel: &CancellationToken) -> Result<String> {
    let path = settings_path(cli);
    let mut settings = ConversionSettings::load(&path).await;

    match &cli.command {
        Commands::WikiToMd(args) => {
            if let Some(style) = args.style {
                settings.link_style = style;
            }
            convert(&cli.vault, &args.convert, Direction::WikiToMarkdown, settings, cancel).await
        }
        Commands::MdToWiki(args) => {
            convert(&cli.vault, args, Direction::MarkdownToWiki, settings, cancel).await
        }
        Commands::SafeMode => {
            let enabled = settings.toggle_safe_mode();
            save(&settings, &path).await?;
            Ok(format!(
                "Safe mode {}",
                if enabled { "enabled" } else { "disabled" }
            ))
        }
        Commands::Ignore(command) => ignore(command, settings, &path).await,
    }
}

async fn save(settings: &ConversionSettings, path: &Path) -> Result<()> {
    settings
        .save(path)
        .await
        .with_context(|| format!("Failed to save settings to {}", path.display()))
}

async fn convert(
    vault: &Path,
    args: &ConvertArgs,
    direction: Direction,
    mut settings: ConversionSettings,
    cancel: &CancellationToken,
) -> Result<String> {
    let store = VaultStore::new(vault)
        .with_context(|| format!("Failed to open vault at {}", vault.display()))?;
    let orchestrator = Orchestrator::new(&store);

    if let Some(file) = &args.file {
        let id = store.document_id(file)?;
        let conversion = if args.dry_run {
            orchestrator.convert_document(&id, direction, &settings).await?
        } else {
            orchestrator.apply_document(&id, direction, &settings).await?
        };

        return Ok(match (conversion.is_changed(), args.dry_run) {
            (false, _) => format!("No links to convert in {id}"),
            (true, true) => format!("{} link(s) would be converted in {id}", conversion.rewritten),
            (true, false) => format!("Converted {} link(s) in {id}", conversion.rewritten),
        });
    }

    if args.apply {
        settings.safe_mode = false;
    } else if args.dry_run {
        settings.safe_mode = true;
    }

    let report = orchestrator.convert_all(direction, &settings, cancel).await?;
    for (path, error) in report.failures() {
        log::error!("{}: {}", path, error);
    }

    if args.json {
        return serde_json::to_string_pretty(&report).context("Failed to serialize report");
    }
    Ok(report.summary())
}

async fn ignore(
    command: &IgnoreCommands,
    mut settings: ConversionSettings,
    path: &Path,
) -> Result<String> {
    match command {
        IgnoreCommands::Add { folder } => {
            if !settings.add_ignored_folder(folder) {
                return Ok(format!("Not added: '{folder}' is empty or already ignored"));
            }
            save(&settings, path).await?;
            Ok(format!("Ignoring {folder}"))
        }
        IgnoreCommands::Remove { folder } => {
            if !settings.remove_ignored_folder(folder) {
                return Ok(format!("'{folder}' is not ignored"));
            }
            save(&settings, path).await?;
            Ok(format!("No longer ignoring {folder}"))
        }
        IgnoreCommands::List if settings.ignored_folders.is_empty() => {
            Ok("No ignored folders".to_string())
        }
        IgnoreCommands::List => Ok(settings.ignored_folders.join("\n")),
    }
}

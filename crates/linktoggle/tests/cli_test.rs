//! Command handlers run against a temporary vault

use clap::Parser;
use linktoggle::{Cli, run};
use linktoggle_batch::CancellationToken;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    std::fs::create_dir_all(full.parent().unwrap()).unwrap();
    std::fs::write(full, content).unwrap();
}

fn read(root: &Path, path: &str) -> String {
    std::fs::read_to_string(root.join(path)).unwrap()
}

fn vault() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "Notes/Alpha.md", "See [[Beta]].");
    write(temp.path(), "Beta.md", "Back to [[Alpha|the first note]].");
    write(temp.path(), "Templates/Daily.md", "Today: [[Beta]]");
    temp
}

async fn exec(vault: &Path, args: &[&str]) -> String {
    let mut argv = vec!["linktoggle", "--vault", vault.to_str().unwrap()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    run(&cli, &CancellationToken::new()).await.unwrap()
}

#[tokio::test]
async fn test_bulk_defaults_to_safe_mode() {
    let temp = vault();

    let message = exec(temp.path(), &["wiki-to-md"]).await;

    assert_eq!(
        message,
        "Safe mode: 3 file(s) would be modified. Disable safe mode to apply changes."
    );
    assert_eq!(read(temp.path(), "Notes/Alpha.md"), "See [[Beta]].");
}

#[tokio::test]
async fn test_apply_writes_and_respects_ignored_folders() {
    let temp = vault();
    exec(temp.path(), &["ignore", "add", "Templates"]).await;

    let message = exec(temp.path(), &["wiki-to-md", "--apply"]).await;

    assert_eq!(message, "Converted links in 2 file(s)");
    assert_eq!(read(temp.path(), "Notes/Alpha.md"), "See [Beta](/Beta.md).");
    assert_eq!(
        read(temp.path(), "Beta.md"),
        "Back to [the first note](/Notes/Alpha.md)."
    );
    assert_eq!(read(temp.path(), "Templates/Daily.md"), "Today: [[Beta]]");
}

#[tokio::test]
async fn test_single_file_relative_style() {
    let temp = vault();

    let message = exec(
        temp.path(),
        &["wiki-to-md", "--file", "Notes/Alpha.md", "--style", "relative"],
    )
    .await;

    assert_eq!(message, "Converted 1 link(s) in Notes/Alpha.md");
    assert_eq!(read(temp.path(), "Notes/Alpha.md"), "See [Beta](../Beta.md).");
}

#[tokio::test]
async fn test_single_file_dry_run_leaves_file() {
    let temp = vault();

    let message = exec(temp.path(), &["wiki-to-md", "--file", "Beta.md", "--dry-run"]).await;

    assert_eq!(message, "1 link(s) would be converted in Beta.md");
    assert_eq!(read(temp.path(), "Beta.md"), "Back to [[Alpha|the first note]].");
}

#[tokio::test]
async fn test_round_trip_through_commands() {
    let temp = vault();
    exec(temp.path(), &["wiki-to-md", "--apply"]).await;

    exec(temp.path(), &["md-to-wiki", "--apply"]).await;

    assert_eq!(read(temp.path(), "Notes/Alpha.md"), "See [[Beta]].");
    assert_eq!(read(temp.path(), "Beta.md"), "Back to [[Alpha|the first note]].");
}

#[tokio::test]
async fn test_safe_mode_toggle_persists() {
    let temp = vault();

    assert_eq!(exec(temp.path(), &["safe-mode"]).await, "Safe mode disabled");
    let saved = read(temp.path(), ".linktoggle.json");
    assert!(saved.contains("\"safeMode\": false"));

    assert_eq!(exec(temp.path(), &["safe-mode"]).await, "Safe mode enabled");
}

#[tokio::test]
async fn test_ignore_add_list_remove() {
    let temp = vault();

    assert_eq!(exec(temp.path(), &["ignore", "list"]).await, "No ignored folders");
    exec(temp.path(), &["ignore", "add", "/Archive/Old/"]).await;
    exec(temp.path(), &["ignore", "add", "Templates"]).await;
    assert_eq!(
        exec(temp.path(), &["ignore", "list"]).await,
        "Archive/Old\nTemplates"
    );

    assert_eq!(
        exec(temp.path(), &["ignore", "remove", "Archive/Old"]).await,
        "No longer ignoring Archive/Old"
    );
    assert_eq!(exec(temp.path(), &["ignore", "list"]).await, "Templates");
    assert_eq!(
        exec(temp.path(), &["ignore", "remove", "Missing"]).await,
        "'Missing' is not ignored"
    );
}

#[tokio::test]
async fn test_custom_yaml_config() {
    let temp = vault();
    let config = temp.path().join("settings/linktoggle.yaml");
    let config_arg = config.to_str().unwrap();

    exec(temp.path(), &["--config", config_arg, "ignore", "add", "Notes"]).await;

    let saved = std::fs::read_to_string(&config).unwrap();
    assert!(saved.contains("Notes"));
    assert!(!temp.path().join(".linktoggle.json").exists());
}

#[tokio::test]
async fn test_json_report() {
    let temp = vault();

    let output = exec(temp.path(), &["md-to-wiki", "--json"]).await;

    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(report["direction"], "md-to-wiki");
    assert_eq!(report["dry_run"], true);
    assert_eq!(report["affected"], 0);
}

#[tokio::test]
async fn test_missing_vault_is_an_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope");
    let vault = missing.to_str().unwrap();
    let cli = Cli::try_parse_from(["linktoggle", "--vault", vault, "wiki-to-md"]).unwrap();

    assert!(run(&cli, &CancellationToken::new()).await.is_err());
}

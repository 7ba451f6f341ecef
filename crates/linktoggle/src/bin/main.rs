use anyhow::Result;
use clap::Parser;
use linktoggle::{Cli, commands, logging};
use linktoggle_batch::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref(), cli.log_format)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, stopping after the current document");
            on_interrupt.cancel();
        }
    });

    let message = commands::run(&cli, &cancel).await?;
    println!("{message}");
    Ok(())
}

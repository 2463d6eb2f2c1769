pub mod config;
pub mod extract;
pub mod mindpal;
pub mod models;
pub mod obsidian;
pub mod pipeline;
pub mod watcher;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use tokio_util::sync::CancellationToken;

use config::Config;
use mindpal::MindpalClient;
use obsidian::NoteWriter;
use pipeline::{ApprovalPipeline, PersistenceController};
use watcher::WatchLoop;

/// Wire the components together and run the bridge until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    let data_dir = config.ensure_data_dir()?;
    let vault_dir = config.vault_dir();

    let writer = NoteWriter::new(vault_dir.clone())?;
    let client = MindpalClient::new(&config.mindpal)?;
    let pipeline = Arc::new(ApprovalPipeline::new(
        writer,
        config.features.auto_approve,
    ));

    info!("ScreenPipe data: {}", data_dir.display());
    info!("Obsidian vault: {}", vault_dir.display());
    if let Some(chatbot_url) = &config.mindpal.chatbot_url {
        info!("MindPal chatbot: {chatbot_url}");
    }
    info!(
        "Auto-approve: {}",
        if config.features.auto_approve { "on" } else { "off" }
    );

    let cancel_token = CancellationToken::new();

    let mut persistence = PersistenceController::new();
    persistence.start(Arc::clone(&pipeline))?;

    let watch = WatchLoop::new(
        data_dir,
        Duration::from_secs(config.screenpipe.poll_interval),
        client,
        Arc::clone(&pipeline),
    );
    let watch_handle = tokio::spawn(watch.run(cancel_token.clone()));

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Bridge stopped by user");

    cancel_token.cancel();
    watch_handle
        .await
        .context("watch loop task failed to join")?;
    persistence.stop().await?;

    Ok(())
}

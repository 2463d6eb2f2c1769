use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::worker::persistence_loop;
use super::ApprovalPipeline;

/// Owns the background persistence worker: started once at process startup,
/// cancelled and joined on shutdown.
pub struct PersistenceController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl PersistenceController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn start(&mut self, pipeline: Arc<ApprovalPipeline>) -> Result<()> {
        if self.handle.is_some() {
            bail!("persistence worker already active");
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(persistence_loop(pipeline, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        info!("Persistence worker started");
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("persistence worker task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

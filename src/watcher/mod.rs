//! Capture directory polling loop.
//!
//! Lists the ScreenPipe data directory on a fixed interval, diffs against
//! the seen-set, and drives every newly observed file through classify →
//! extract → analyze → submit. A path is marked seen whatever the outcome,
//! so each file is processed at most once per run; a failed analysis is
//! therefore lost until the process restarts.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info};
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::extract::extract;
use crate::mindpal::MindpalClient;
use crate::models::{CaptureFile, FileCategory};
use crate::pipeline::{ApprovalPipeline, SubmitOutcome};

pub struct WatchLoop {
    data_dir: PathBuf,
    poll_interval: Duration,
    seen_files: HashSet<PathBuf>,
    client: MindpalClient,
    pipeline: Arc<ApprovalPipeline>,
}

impl WatchLoop {
    pub fn new(
        data_dir: PathBuf,
        poll_interval: Duration,
        client: MindpalClient,
        pipeline: Arc<ApprovalPipeline>,
    ) -> Self {
        Self {
            data_dir,
            poll_interval,
            seen_files: HashSet::new(),
            client,
            pipeline,
        }
    }

    pub async fn run(mut self, cancel_token: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = self.poll_once().await {
                        error!("Error scanning {}: {err:#}", self.data_dir.display());
                    }
                }
                _ = cancel_token.cancelled() => {
                    info!("Watch loop shutting down");
                    break;
                }
            }
        }
    }

    /// One poll cycle: list the directory (non-recursive, regular files
    /// only), process paths not yet seen, and mark them seen. Returns how
    /// many new paths were observed this cycle.
    pub async fn poll_once(&mut self) -> Result<usize> {
        let mut entries = tokio::fs::read_dir(&self.data_dir).await.with_context(|| {
            format!("failed to read data directory {}", self.data_dir.display())
        })?;

        let mut new_files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Ok(file_type) = entry.file_type().await else {
                continue;
            };
            if !file_type.is_file() {
                continue;
            }
            let path = entry.path();
            if !self.seen_files.contains(&path) {
                new_files.push(path);
            }
        }

        let discovered = new_files.len();
        for path in new_files {
            info!("New file detected: {}", path.display());
            self.process_file(&path).await;
            self.seen_files.insert(path);
        }

        Ok(discovered)
    }

    async fn process_file(&self, path: &Path) {
        let capture = CaptureFile::discover(path.to_path_buf()).await;
        if capture.category == FileCategory::Unknown {
            info!("Skipping unsupported file type: {}", path.display());
            return;
        }

        let record = extract(&capture).await;

        info!("Sending to MindPal for analysis: {}", path.display());
        let result = match self.client.analyze(&record).await {
            Ok(result) => result,
            Err(err) => {
                error!("Failed to process {}: {err}", path.display());
                return;
            }
        };

        match self.pipeline.submit(result).await {
            Ok(SubmitOutcome::Written(note_path)) => {
                info!("Auto-approved and written: {}", note_path.display());
            }
            Ok(SubmitOutcome::Held) => {}
            Err(err) => {
                error!("Failed to write note for {}: {err:#}", path.display());
            }
        }
    }
}

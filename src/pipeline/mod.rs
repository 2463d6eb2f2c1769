//! The ingestion approval pipeline.
//!
//! Analysis results either go straight to the vault (auto-approve) or wait
//! in the pending queue for a human decision; approved results are drained
//! to disk by the background persistence worker.

use std::collections::VecDeque;
use std::path::PathBuf;

use anyhow::Result;
use log::info;
use tokio::sync::Mutex;

use crate::models::ProcessedResult;
use crate::obsidian::NoteWriter;

pub mod controller;
mod worker;

pub use controller::PersistenceController;

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Auto-approve wrote the note synchronously.
    Written(PathBuf),
    /// The result is parked in the pending queue awaiting review.
    Held,
}

pub struct ApprovalPipeline {
    auto_approve: bool,
    writer: NoteWriter,
    pending: Mutex<VecDeque<ProcessedResult>>,
    approved: Mutex<VecDeque<ProcessedResult>>,
}

impl ApprovalPipeline {
    pub fn new(writer: NoteWriter, auto_approve: bool) -> Self {
        Self {
            auto_approve,
            writer,
            pending: Mutex::new(VecDeque::new()),
            approved: Mutex::new(VecDeque::new()),
        }
    }

    /// Hand a fresh analysis result to the pipeline. With auto-approve the
    /// note is written before returning; otherwise the result is held for
    /// review and the write happens after `approve` + a worker cycle.
    pub async fn submit(&self, result: ProcessedResult) -> Result<SubmitOutcome> {
        if self.auto_approve {
            let path = self.writer.write(&result).await?;
            return Ok(SubmitOutcome::Written(path));
        }

        info!(
            "Added to approval queue: {}",
            result.record.source_path.display()
        );
        self.pending.lock().await.push_back(result);
        Ok(SubmitOutcome::Held)
    }

    /// Drain the pending queue into a snapshot for review. Listing is
    /// destructive: the caller must decide approve/reject for everything it
    /// receives, there is no peek-without-consume.
    pub async fn list_pending(&self) -> Vec<ProcessedResult> {
        self.pending.lock().await.drain(..).collect()
    }

    /// Queue a reviewed result for the persistence worker.
    pub async fn approve(&self, result: ProcessedResult) {
        info!(
            "Note approved for writing: {}",
            result.record.source_path.display()
        );
        self.approved.lock().await.push_back(result);
    }

    /// Discard a reviewed result. Log only; the vault is untouched.
    pub async fn reject(&self, result: ProcessedResult) {
        info!(
            "Note rejected and discarded: {}",
            result.record.source_path.display()
        );
    }

    /// Pop one approved result and persist it. `Ok(None)` when the queue is
    /// empty. A failed write surfaces the error and the item is not
    /// re-queued.
    pub async fn write_next_approved(&self) -> Result<Option<PathBuf>> {
        let next = self.approved.lock().await.pop_front();
        match next {
            Some(result) => self.writer.write(&result).await.map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentRecord, FileCategory};
    use chrono::Utc;

    fn vault_notes(vault: &std::path::Path) -> Vec<PathBuf> {
        let mut notes: Vec<PathBuf> = std::fs::read_dir(vault)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        notes.sort();
        notes
    }

    fn result_for(path: &str) -> ProcessedResult {
        ProcessedResult::success(
            ContentRecord {
                source_path: path.into(),
                category: FileCategory::Text,
                captured_at: Utc::now(),
                file_size: 5,
                text: Some("hello".to_string()),
                description: None,
            },
            "Summary: notes.".to_string(),
        )
    }

    fn pipeline_in(vault: &std::path::Path, auto_approve: bool) -> ApprovalPipeline {
        let writer = NoteWriter::new(vault.to_path_buf()).unwrap();
        ApprovalPipeline::new(writer, auto_approve)
    }

    #[tokio::test]
    async fn auto_approve_writes_synchronously_and_holds_nothing() {
        let vault = tempfile::tempdir().unwrap();
        let pipeline = pipeline_in(vault.path(), true);

        let outcome = pipeline.submit(result_for("/captures/notes.txt")).await.unwrap();
        let SubmitOutcome::Written(path) = outcome else {
            panic!("expected synchronous write");
        };
        assert!(path.exists());
        assert!(pipeline.list_pending().await.is_empty());
        assert_eq!(vault_notes(vault.path()).len(), 1);
    }

    #[tokio::test]
    async fn manual_mode_holds_until_approved() {
        let vault = tempfile::tempdir().unwrap();
        let pipeline = pipeline_in(vault.path(), false);

        let outcome = pipeline.submit(result_for("/captures/notes.txt")).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Held));
        assert!(vault_notes(vault.path()).is_empty());

        // Listing drains: one snapshot, then empty.
        let pending = pipeline.list_pending().await;
        assert_eq!(pending.len(), 1);
        assert!(pipeline.list_pending().await.is_empty());

        // Nothing approved yet, so the worker has nothing to do.
        assert!(pipeline.write_next_approved().await.unwrap().is_none());

        for result in pending {
            pipeline.approve(result).await;
        }
        let written = pipeline.write_next_approved().await.unwrap().unwrap();
        assert!(written.exists());
        assert!(pipeline.write_next_approved().await.unwrap().is_none());
        assert_eq!(vault_notes(vault.path()).len(), 1);
    }

    #[tokio::test]
    async fn reject_leaves_the_vault_untouched() {
        let vault = tempfile::tempdir().unwrap();
        let pipeline = pipeline_in(vault.path(), false);

        pipeline.submit(result_for("/captures/notes.txt")).await.unwrap();
        let mut pending = pipeline.list_pending().await;
        pipeline.reject(pending.remove(0)).await;

        assert!(pipeline.write_next_approved().await.unwrap().is_none());
        assert!(vault_notes(vault.path()).is_empty());
    }

    #[tokio::test]
    async fn approved_results_drain_in_fifo_order() {
        let vault = tempfile::tempdir().unwrap();
        let pipeline = pipeline_in(vault.path(), false);

        pipeline.approve(result_for("/captures/first.txt")).await;
        pipeline.approve(result_for("/captures/second.txt")).await;

        let first = pipeline.write_next_approved().await.unwrap().unwrap();
        let contents = std::fs::read_to_string(first).unwrap();
        assert!(contents.contains("original_file: \"/captures/first.txt\""));

        let second = pipeline.write_next_approved().await.unwrap().unwrap();
        let contents = std::fs::read_to_string(second).unwrap();
        assert!(contents.contains("original_file: \"/captures/second.txt\""));
    }
}

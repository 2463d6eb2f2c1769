use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::capture::ContentRecord;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Success,
    Failed,
}

/// A capture record paired with the analysis MindPal generated for it.
/// Only built on a successful analysis; a failed analysis produces no
/// result at all. Owned by exactly one queue at a time: it moves between
/// pending and approved, never copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedResult {
    pub record: ContentRecord,
    pub analysis: String,
    pub processed_at: DateTime<Utc>,
    pub status: ProcessStatus,
}

impl ProcessedResult {
    pub fn success(record: ContentRecord, analysis: String) -> Self {
        Self {
            record,
            analysis,
            processed_at: Utc::now(),
            status: ProcessStatus::Success,
        }
    }
}

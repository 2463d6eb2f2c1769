//! Content extraction for capture files.
//!
//! Text files are read in full; media files are only described, never read,
//! since the actual media analysis happens on the MindPal side. Extraction
//! never fails: an unreadable text file degrades to a placeholder payload
//! and processing continues.

use log::warn;
use tokio::fs;

use crate::models::{CaptureFile, ContentRecord, FileCategory};

/// Build the normalized record for a capture file. Callers filter `Unknown`
/// before extraction.
pub async fn extract(capture: &CaptureFile) -> ContentRecord {
    let mut record = ContentRecord {
        source_path: capture.path.clone(),
        category: capture.category,
        captured_at: capture.discovered_at,
        file_size: capture.size_bytes,
        text: None,
        description: None,
    };

    let timestamp = capture.discovered_at.to_rfc3339();
    match capture.category {
        FileCategory::Text => {
            record.text = Some(match fs::read_to_string(&capture.path).await {
                Ok(contents) => contents,
                Err(err) => {
                    warn!(
                        "Could not read text file {}: {err}",
                        capture.path.display()
                    );
                    format!("Error reading file: {err}")
                }
            });
        }
        FileCategory::Image => {
            record.description = Some(format!("Screenshot captured at {timestamp}"));
        }
        FileCategory::Audio => {
            record.description = Some(format!("Audio recording captured at {timestamp}"));
        }
        FileCategory::Video => {
            record.description = Some(format!("Video recording captured at {timestamp}"));
        }
        FileCategory::Unknown => {}
    }

    record
}

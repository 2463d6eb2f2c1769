//! Obsidian vault note writer.
//!
//! Notes are append-only artifacts: a fresh timestamped filename per write,
//! frontmatter followed by the analysis body. Two writes in the same second
//! for the same sanitized stem and category land on the same filename and
//! the second overwrites the first.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;

use crate::models::ProcessedResult;

pub struct NoteWriter {
    vault_dir: PathBuf,
}

impl NoteWriter {
    /// Creates the vault directory if it does not exist yet.
    pub fn new(vault_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&vault_dir).with_context(|| {
            format!("failed to create vault directory {}", vault_dir.display())
        })?;
        Ok(Self { vault_dir })
    }

    /// Render and write one note, returning its path. I/O failures surface
    /// to the caller; the note is lost but nothing is retried here.
    pub async fn write(&self, result: &ProcessedResult) -> Result<PathBuf> {
        let raw_stem = result
            .record
            .source_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("capture");
        let stem = sanitize_stem(raw_stem);
        let now = Utc::now();

        let note_path = self.vault_dir.join(note_filename(
            &stem,
            result.record.category.as_str(),
            now,
        ));

        let mut contents = render_frontmatter(result, &stem, now);
        contents.push_str(&result.analysis);

        tokio::fs::write(&note_path, contents)
            .await
            .with_context(|| format!("failed to write note {}", note_path.display()))?;

        info!("Note written: {}", note_path.display());
        Ok(note_path)
    }
}

fn note_filename(stem: &str, category: &str, now: DateTime<Utc>) -> String {
    format!("{}-{stem}-{category}.md", now.format("%Y-%m-%d-%H-%M-%S"))
}

/// Keep alphanumerics, spaces and hyphens; drop everything else and trim
/// trailing whitespace.
fn sanitize_stem(stem: &str) -> String {
    stem.chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-')
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn render_frontmatter(result: &ProcessedResult, stem: &str, created: DateTime<Utc>) -> String {
    let category = result.record.category.as_str();
    format!(
        "---\n\
         title: \"{stem} (MindPal Analysis)\"\n\
         created: {created}\n\
         source: \"ScreenPipe Bridge + MindPal\"\n\
         original_file: \"{original_file}\"\n\
         file_type: \"{category}\"\n\
         processed_at: \"{processed_at}\"\n\
         tags: [screenpipe, mindpal, auto-generated, {category}]\n\
         ---\n\
         \n",
        created = created.to_rfc3339(),
        original_file = result.record.source_path.display(),
        processed_at = result.processed_at.to_rfc3339(),
    )
}

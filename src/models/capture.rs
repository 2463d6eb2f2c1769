use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Video,
    Audio,
    Image,
    Text,
    Unknown,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Video => "video",
            FileCategory::Audio => "audio",
            FileCategory::Image => "image",
            FileCategory::Text => "text",
            FileCategory::Unknown => "unknown",
        }
    }
}

/// Determine a capture file's category from its extension, case-insensitively.
/// Files with no extension or an unrecognized one are `Unknown`.
pub fn classify(path: &Path) -> FileCategory {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return FileCategory::Unknown;
    };

    match ext.to_ascii_lowercase().as_str() {
        "mp4" | "avi" | "mov" | "mkv" => FileCategory::Video,
        "wav" | "mp3" | "m4a" | "flac" => FileCategory::Audio,
        "png" | "jpg" | "jpeg" | "gif" | "bmp" => FileCategory::Image,
        "txt" | "log" | "json" => FileCategory::Text,
        _ => FileCategory::Unknown,
    }
}

/// A file observed in the ScreenPipe data directory. Identity is the path;
/// the watch loop keeps every observed path in its seen-set for the rest of
/// the run.
#[derive(Debug, Clone)]
pub struct CaptureFile {
    pub path: PathBuf,
    pub category: FileCategory,
    pub size_bytes: u64,
    pub discovered_at: DateTime<Utc>,
}

impl CaptureFile {
    pub async fn discover(path: PathBuf) -> Self {
        let category = classify(&path);
        let size_bytes = tokio::fs::metadata(&path)
            .await
            .map(|meta| meta.len())
            .unwrap_or(0);
        Self {
            path,
            category,
            size_bytes,
            discovered_at: Utc::now(),
        }
    }
}

/// Normalized payload for a capture file, ready for analysis. Text files
/// carry their contents in `text`; media files carry a generated
/// `description` instead. Never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub source_path: PathBuf,
    pub category: FileCategory,
    pub captured_at: DateTime<Utc>,
    pub file_size: u64,
    pub text: Option<String>,
    pub description: Option<String>,
}

impl ContentRecord {
    /// The payload handed to the analysis prompt: extracted text for text
    /// files, the generated description for media.
    pub fn payload(&self) -> &str {
        self.text
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or("No text content available")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(classify(Path::new("A.PNG")), FileCategory::Image);
        assert_eq!(classify(Path::new("a.png")), FileCategory::Image);
        assert_eq!(classify(Path::new("clip.Mp4")), FileCategory::Video);
    }

    #[test]
    fn classify_covers_known_extensions() {
        assert_eq!(classify(Path::new("rec.mkv")), FileCategory::Video);
        assert_eq!(classify(Path::new("mic.m4a")), FileCategory::Audio);
        assert_eq!(classify(Path::new("shot.jpeg")), FileCategory::Image);
        assert_eq!(classify(Path::new("transcript.log")), FileCategory::Text);
        assert_eq!(classify(Path::new("ocr.json")), FileCategory::Text);
    }

    #[test]
    fn classify_falls_back_to_unknown() {
        assert_eq!(classify(Path::new("archive.tar.gz")), FileCategory::Unknown);
        assert_eq!(classify(Path::new("no_extension")), FileCategory::Unknown);
        assert_eq!(classify(Path::new(".hidden")), FileCategory::Unknown);
    }

    #[test]
    fn payload_prefers_text_over_description() {
        let mut record = ContentRecord {
            source_path: PathBuf::from("/tmp/notes.txt"),
            category: FileCategory::Text,
            captured_at: Utc::now(),
            file_size: 5,
            text: Some("hello".to_string()),
            description: None,
        };
        assert_eq!(record.payload(), "hello");

        record.text = None;
        record.description = Some("Screenshot captured at ...".to_string());
        assert_eq!(record.payload(), "Screenshot captured at ...");

        record.description = None;
        assert_eq!(record.payload(), "No text content available");
    }
}

//! MindPal chat-completions client.
//!
//! One bounded request per capture file, no retries: a failed analysis is
//! surfaced to the watch loop, which logs it and drops the file for the
//! rest of the run.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MindpalConfig;
use crate::models::{ContentRecord, ProcessedResult};

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("request to MindPal failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("MindPal API error: {status} - {body}")]
    Api { status: StatusCode, body: String },
    #[error("MindPal response missing generated text")]
    MalformedResponse,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    agent_id: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

pub struct MindpalClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    agent_id: String,
}

impl MindpalClient {
    pub fn new(config: &MindpalConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build MindPal HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            agent_id: config.agent_id.clone(),
        })
    }

    /// Send a content record for analysis and wrap the generated text into a
    /// `ProcessedResult`. Network errors, non-2xx statuses and responses
    /// without `choices[0].message.content` all come back as `AnalysisError`.
    pub async fn analyze(
        &self,
        record: &ContentRecord,
    ) -> Result<ProcessedResult, AnalysisError> {
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(record),
            }],
            agent_id: self.agent_id.clone(),
            stream: false,
        };

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        let analysis = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or(AnalysisError::MalformedResponse)?;

        Ok(ProcessedResult::success(record.clone(), analysis))
    }
}

fn build_prompt(record: &ContentRecord) -> String {
    format!(
        "ScreenPipe Capture Analysis Request:\n\
         \n\
         File Information:\n\
         - Type: {category}\n\
         - Path: {path}\n\
         - Timestamp: {timestamp}\n\
         - Size: {size} bytes\n\
         \n\
         Content:\n\
         {payload}\n\
         \n\
         Please analyze this ScreenPipe capture and create a structured Obsidian note with:\n\
         1. Context and summary\n\
         2. Key observations\n\
         3. Actionable insights\n\
         4. Relevant tags\n\
         5. Any follow-up tasks\n\
         \n\
         Format as markdown suitable for Obsidian.",
        category = record.category.as_str(),
        path = record.source_path.display(),
        timestamp = record.captured_at.to_rfc3339(),
        size = record.file_size,
        payload = record.payload(),
    )
}

//! # datacleanse-report
//!
//! One-shot narrative-report generation from processing statistics.
//!
//! The client sends a single prompt built from a run's [`ProcessingStats`]
//! to a Gemini-style `generateContent` endpoint and returns the plain-text
//! narrative. It owns its own timeout; callers treat failures as a
//! degraded report, never as a failed run.

use datacleanse_types::ProcessingStats;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that can occur while generating a narrative report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("Report service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The service answered 200 but the body had no usable text.
    #[error("Malformed report response: {0}")]
    MalformedResponse(String),
}

/// Options for the report client.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// API key passed in the `x-goog-api-key` header.
    pub api_key: String,
    /// Model name spliced into the request path.
    pub model: String,
    /// Service base URL.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ReportOptions {
    /// Options for the given API key with default model and endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        ReportOptions {
            api_key: api_key.into(),
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 30,
        }
    }

    /// Override the model name
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the service base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Client for the narrative-report service.
pub struct ReportClient {
    client: Client,
    options: ReportOptions,
}

impl ReportClient {
    /// Construct a client with the per-request timeout from the options.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Http` if building the underlying HTTP client
    /// fails.
    pub fn new(options: ReportOptions) -> ReportResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()
            .map_err(|e| ReportError::Http(e.to_string()))?;
        Ok(ReportClient { client, options })
    }

    /// Generate a narrative report for one run's statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the service answers with a
    /// non-success status, or the response carries no text. Callers are
    /// expected to degrade gracefully: the cleaned file and stats stay
    /// valid without the narrative.
    pub async fn generate_report(&self, stats: &ProcessingStats) -> ReportResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.options.base_url.trim_end_matches('/'),
            self.options.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": build_prompt(stats) }] }]
        });

        debug!(model = %self.options.model, "requesting narrative report");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.options.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ReportError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ReportError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ReportError::MalformedResponse(e.to_string()))?;

        let text: String = parsed
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ReportError::MalformedResponse(
                "response contained no text".to_string(),
            ));
        }
        Ok(text)
    }
}

/// Prompt sent to the text-generation service. The stats record is the
/// sole input; the returned narrative is passed through uninterpreted.
#[must_use]
pub fn build_prompt(stats: &ProcessingStats) -> String {
    format!(
        "You are a data quality analyst. Write a short narrative report \
         (3-5 sentences) about today's phone-number cleaning run. Mention \
         the duplicate rates and anything unusual, in plain language.\n\
         \n\
         File: {file}\n\
         Total rows scanned: {rows}\n\
         Phone numbers found: {total}\n\
         Removed as same-sheet duplicates: {intra}\n\
         Removed for exceeding the historical frequency limit: {historical}\n\
         Valid numbers kept: {valid} ({yield_pct:.1}% yield)\n\
         Processing time: {elapsed} ms\n",
        file = stats.processed_file_name,
        rows = stats.total_rows,
        total = stats.total_numbers,
        intra = stats.intra_sheet_duplicates,
        historical = stats.historical_duplicates,
        valid = stats.valid_numbers,
        yield_pct = stats.yield_percent(),
        elapsed = stats.processing_time_ms,
    )
}

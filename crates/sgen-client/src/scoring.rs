//! LLM segment-scoring client.
//!
//! Sends the transcript to an OpenAI-compatible chat-completions API and
//! parses the model's JSON reply into segment candidates. Transport
//! failures are errors (job-fatal upstream); a reply the model botched is
//! an empty candidate list, which is a valid "nothing usable was found"
//! outcome.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sgen_models::SegmentCandidate;

use crate::error::{ClientError, ClientResult};

/// Configuration for the scoring client.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Base URL of the chat-completions API
    pub base_url: String,
    /// Bearer token for the API
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries for transient network failures
    pub max_retries: u32,
}

impl ScoringConfig {
    /// Create config from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        let api_key = std::env::var("SCORING_API_KEY")
            .map_err(|_| ClientError::MissingConfig("SCORING_API_KEY"))?;

        Ok(Self {
            base_url: std::env::var("SCORING_API_URL")
                .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string()),
            api_key,
            model: std::env::var("SCORING_MODEL")
                .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string()),
            timeout: Duration::from_secs(
                std::env::var("SCORING_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            max_retries: std::env::var("SCORING_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client for the remote segment-scoring LLM API.
pub struct ScoringClient {
    http: Client,
    config: ScoringConfig,
}

impl ScoringClient {
    /// Create a new scoring client.
    pub fn new(config: ScoringConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ScoringConfig::from_env()?)
    }

    /// Score a transcript into a list of candidate segments.
    ///
    /// An empty list is a valid outcome; transport and API failures are
    /// errors.
    pub async fn score(&self, transcript: &str) -> ClientResult<Vec<SegmentCandidate>> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(transcript),
            }],
        };

        debug!(model = %self.config.model, "Requesting segment scoring");

        let response = self
            .with_retry(|| async {
                self.http
                    .post(&url)
                    .bearer_auth(&self.config.api_key)
                    .json(&request)
                    .send()
                    .await
                    .map_err(ClientError::Network)
            })
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::request_failed(format!(
                "Scoring API returned {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = response.json().await.map_err(ClientError::Network)?;
        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| ClientError::invalid_response("no choices in scoring response"))?;

        Ok(parse_candidates(content))
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> ClientResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = ClientResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Scoring request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| ClientError::request_failed("Unknown error")))
    }
}

/// Build the scoring prompt, embedding the candidate JSON schema.
fn build_prompt(transcript: &str) -> String {
    let schema = schemars::schema_for!(Vec<SegmentCandidate>);
    let schema_json = serde_json::to_string(&schema).unwrap_or_default();

    format!(
        "Analyze this transcript and return the 10-20 most viral segments with \
         start time (seconds), end time (seconds), and viral_score (1-100).\n\
         Respond with ONLY a JSON array matching this schema:\n{}\n\n\
         Transcript: {}",
        schema_json, transcript
    )
}

/// Parse model output into candidates.
///
/// The model occasionally wraps JSON in markdown fences or returns prose;
/// anything that does not parse as a candidate array yields an empty list.
fn parse_candidates(content: &str) -> Vec<SegmentCandidate> {
    let stripped = strip_code_fences(content);

    match serde_json::from_str::<Vec<SegmentCandidate>>(stripped) {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!("Unparseable scoring response, treating as no candidates: {}", e);
            Vec::new()
        }
    }
}

/// Strip a surrounding ```/```json markdown fence, if present.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

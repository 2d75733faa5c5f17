//! Speech-to-text client.
//!
//! Posts extracted audio to a remote whisper-style inference endpoint.
//! The contract here is deliberately lossy: any remote failure (bad
//! status, unparseable body, network error after retries) is reported as
//! `None`, meaning "no transcript". Downstream scoring treats a missing
//! transcript as an empty candidate list, so transcription problems are
//! never job-fatal.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Configuration for the transcription client.
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    /// Inference endpoint URL
    pub base_url: String,
    /// Bearer token for the API
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries for transient network failures
    pub max_retries: u32,
}

impl TranscriptionConfig {
    /// Create config from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        let api_key = std::env::var("TRANSCRIPTION_API_KEY")
            .map_err(|_| ClientError::MissingConfig("TRANSCRIPTION_API_KEY"))?;

        Ok(Self {
            base_url: std::env::var("TRANSCRIPTION_API_URL").unwrap_or_else(|_| {
                "https://api-inference.huggingface.co/models/openai/whisper-base".to_string()
            }),
            api_key,
            timeout: Duration::from_secs(
                std::env::var("TRANSCRIPTION_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            max_retries: std::env::var("TRANSCRIPTION_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Client for the remote speech-to-text API.
pub struct TranscriptionClient {
    http: Client,
    config: TranscriptionConfig,
}

impl TranscriptionClient {
    /// Create a new transcription client.
    pub fn new(config: TranscriptionConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(TranscriptionConfig::from_env()?)
    }

    /// Transcribe an audio file.
    ///
    /// Returns `Ok(None)` when the remote call fails or returns content
    /// that is not a transcript. Only local faults (unreadable audio
    /// file) are errors.
    pub async fn transcribe(&self, audio: &Path) -> ClientResult<Option<String>> {
        let bytes = tokio::fs::read(audio).await?;

        debug!(
            audio = %audio.display(),
            size_bytes = bytes.len(),
            "Sending audio for transcription"
        );

        let mut last_error: Option<reqwest::Error> = None;
        for attempt in 0..=self.config.max_retries {
            match self
                .http
                .post(&self.config.base_url)
                .bearer_auth(&self.config.api_key)
                .body(bytes.clone())
                .send()
                .await
            {
                Ok(response) => return Ok(self.parse_response(response).await),
                Err(e) if attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Transcription request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => {
                    last_error = Some(e);
                }
            }
        }

        warn!(
            error = %last_error.map(|e| e.to_string()).unwrap_or_default(),
            "Transcription unavailable after retries"
        );
        Ok(None)
    }

    async fn parse_response(&self, response: reqwest::Response) -> Option<String> {
        if !response.status().is_success() {
            warn!(
                status = %response.status(),
                "Transcription API returned non-success status"
            );
            return None;
        }

        match response.json::<TranscriptionResponse>().await {
            Ok(parsed) => Some(parsed.text),
            Err(e) => {
                warn!("Unparseable transcription response: {}", e);
                None
            }
        }
    }
}

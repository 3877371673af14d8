//! Gemini provider: single-shot text generation via `generateContent`.

use super::{ChatError, body_preview, require_prompt};
use crate::config::GeminiConfig;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROVIDER: &str = "Gemini";
const CREDENTIAL_VAR: &str = "GEMINI_API_KEY";
const GEMINI_TIMEOUT: Duration = Duration::from_secs(60);

/// Returned when the response has no candidate text.
pub const FALLBACK_TEXT: &str = "Sem resposta.";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            timeout: GEMINI_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the API URL for the configured model. The key travels as a query
    /// parameter, so this string must never be logged.
    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    pub async fn generate(&self, prompt: Option<&str>) -> Result<String, ChatError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .filter(|k| !k.expose_secret().is_empty())
            .ok_or(ChatError::MissingCredential(CREDENTIAL_VAR))?;
        let prompt = require_prompt(prompt)?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url())
            .query(&[("key", api_key.expose_secret())])
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::from_transport(PROVIDER, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::from_transport(PROVIDER, e))?;

        if !status.is_success() {
            tracing::warn!(status = %status, "Gemini API rejected request");
            return Err(ChatError::UpstreamHttpError {
                status: status.as_u16(),
                body,
            });
        }

        let raw: serde_json::Value =
            serde_json::from_str(&body).map_err(|_| ChatError::UpstreamInvalidJson {
                body: body_preview(&body),
            })?;

        Ok(extract_text(&raw).unwrap_or_else(|| FALLBACK_TEXT.to_string()))
    }
}

/// `candidates[0].content.parts[0].text`, if present and non-empty. Any other
/// shape counts as "no answer" rather than a protocol error.
fn extract_text(raw: &serde_json::Value) -> Option<String> {
    let parsed: GenerateContentResponse = serde_json::from_value(raw.clone()).ok()?;
    parsed
        .candidates?
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text
        .filter(|t| !t.is_empty())
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

//! Chat client for the OpenAI chat-completions API.
//!
//! Builds the fixed two-message payload (system instruction + user prompt),
//! performs one POST and reshapes the reply into a [`ChatResponse`].

use super::{ChatError, body_preview, require_prompt};
use crate::config::OpenAiConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROVIDER: &str = "OpenAI";
const CREDENTIAL_VAR: &str = "OPENAI_API_KEY";

pub const SYSTEM_INSTRUCTION: &str =
    "Você é um assistente. Responda de forma clara e objetiva em português do Brasil.";
pub const TEMPERATURE: f32 = 0.7;
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(60);

/// Generated text as returned to the HTTP caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub text: String,
    pub used_context: bool,
    pub doc_ids: Vec<String>,
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    config: OpenAiConfig,
    timeout: Duration,
}

impl ChatClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            timeout: CHAT_TIMEOUT,
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.config.chat_model
    }

    pub fn has_credential(&self) -> bool {
        self.config.has_key()
    }

    /// The configured API key, or `MissingCredential`.
    pub fn credential(&self) -> Result<&Secret<String>, ChatError> {
        self.config
            .api_key
            .as_ref()
            .filter(|k| !k.expose_secret().is_empty())
            .ok_or(ChatError::MissingCredential(CREDENTIAL_VAR))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Run one chat completion for `prompt`.
    ///
    /// The credential is checked before the prompt, and both before any
    /// network traffic.
    pub async fn complete(&self, prompt: Option<&str>) -> Result<ChatResponse, ChatError> {
        let api_key = self.credential()?;
        let prompt = require_prompt(prompt)?;

        let request = ChatCompletionRequest {
            model: &self.config.chat_model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
        };

        tracing::debug!(
            model = %self.config.chat_model,
            prompt_len = prompt.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key.expose_secret())
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
            tracing::warn!(status = %status, "Chat completion rejected upstream");
            return Err(ChatError::UpstreamHttpError {
                status: status.as_u16(),
                body,
            });
        }

        let raw: serde_json::Value =
            serde_json::from_str(&body).map_err(|_| ChatError::UpstreamInvalidJson {
                body: body_preview(&body),
            })?;

        match extract_content(&raw) {
            Some(text) => {
                tracing::info!(
                    model = %self.config.chat_model,
                    text_len = text.len(),
                    "Chat completion succeeded"
                );
                Ok(ChatResponse {
                    text,
                    used_context: false,
                    doc_ids: Vec::new(),
                })
            }
            None => Err(ChatError::UpstreamEmptyResponse { raw }),
        }
    }
}

/// `choices[0].message.content`, if present and non-empty.
fn extract_content(raw: &serde_json::Value) -> Option<String> {
    let parsed: ChatCompletionResponse = serde_json::from_value(raw.clone()).ok()?;
    parsed
        .choices?
        .into_iter()
        .next()?
        .message?
        .content
        .filter(|text| !text.is_empty())
}

// ============================================================================
// Chat Completions API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

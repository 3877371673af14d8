//! Outbound clients for the hosted chat-completion APIs.
//!
//! Each client makes exactly one HTTPS call per request, with a fixed
//! timeout and no retry. Failures are reported as [`ChatError`] so handlers
//! can map them onto HTTP statuses without inspecting transport details.

pub mod gemini;
pub mod openai;

pub use gemini::GeminiClient;
pub use openai::{ChatClient, ChatResponse};

use thiserror::Error;

/// Upper bound on the upstream body echoed back when it is not JSON.
pub const ERROR_BODY_PREVIEW_CHARS: usize = 800;

#[derive(Error, Debug)]
pub enum ChatError {
    /// The named credential variable is not configured.
    #[error("{0} ausente")]
    MissingCredential(&'static str),

    #[error("Prompt is required")]
    MissingPrompt,

    #[error("{provider} request timed out")]
    UpstreamTimeout { provider: &'static str },

    #[error("upstream returned HTTP {status}")]
    UpstreamHttpError { status: u16, body: String },

    #[error("upstream returned a body that is not JSON")]
    UpstreamInvalidJson { body: String },

    #[error("upstream response carried no generated text")]
    UpstreamEmptyResponse { raw: serde_json::Value },

    #[error("{0}")]
    Transport(#[source] reqwest::Error),
}

impl ChatError {
    /// The request URL is dropped from the error: Gemini carries its key in
    /// the query string, and this text reaches both the logs and the caller.
    pub(crate) fn from_transport(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::UpstreamTimeout { provider }
        } else {
            ChatError::Transport(err.without_url())
        }
    }
}

/// First [`ERROR_BODY_PREVIEW_CHARS`] characters of an upstream body.
pub fn body_preview(body: &str) -> String {
    body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect()
}

/// Reject a missing or empty prompt.
pub fn require_prompt(prompt: Option<&str>) -> Result<&str, ChatError> {
    match prompt {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(ChatError::MissingPrompt),
    }
}

//! Retrieval client: text embeddings and nearest-neighbour lookup.
//!
//! Not wired into the chat route. The chat endpoint accepts `use_context`
//! for compatibility but always answers without retrieved context.

use crate::services::vector_store::VectorStore;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use service_core::clients::body_preview;
use service_core::config::OpenAiConfig;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const EMBEDDING_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("OPENAI_API_KEY ausente")]
    MissingCredential,

    #[error("embeddings API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("embeddings request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("embeddings response had no vector")]
    EmptyResponse,
}

#[derive(Clone)]
pub struct RetrievalClient {
    client: Client,
    config: OpenAiConfig,
    store: Option<Arc<dyn VectorStore>>,
    top_k: usize,
    timeout: Duration,
}

impl RetrievalClient {
    pub fn new(config: OpenAiConfig, store: Option<Arc<dyn VectorStore>>, top_k: usize) -> Self {
        Self {
            client: Client::new(),
            config,
            store,
            top_k,
            timeout: EMBEDDING_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.config.base_url.trim_end_matches('/'))
    }

    /// Embed `text` with the configured embedding model.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .filter(|k| !k.expose_secret().is_empty())
            .ok_or(EmbeddingError::MissingCredential)?;

        let request = EmbeddingRequest {
            model: &self.config.embed_model,
            input: text,
        };

        tracing::debug!(
            model = %self.config.embed_model,
            text_len = text.len(),
            "Requesting embedding"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key.expose_secret())
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(EmbeddingError::Http {
                status: status.as_u16(),
                body: body_preview(&body),
            });
        }

        let parsed: EmbeddingResponse = response.json().await?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(EmbeddingError::EmptyResponse)
    }

    /// Look up the `k` stored documents closest to `query`.
    ///
    /// The store ranks raw query text with its own embedding function, so the
    /// vectors stay comparable with what it already holds. A missing store or
    /// a failed query yields empty results; the failure is only logged.
    pub async fn retrieve(&self, query: &str, k: usize) -> (Vec<String>, Vec<String>) {
        let Some(store) = &self.store else {
            return (Vec::new(), Vec::new());
        };

        match store.query(query, k).await {
            Ok(result) => (result.documents, result.ids),
            Err(e) => {
                tracing::warn!(error = %e, "Vector store query failed");
                (Vec::new(), Vec::new())
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

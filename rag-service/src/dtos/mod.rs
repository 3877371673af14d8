//! Request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub openai_key: bool,
    pub model: String,
    pub vectorstore_loaded: bool,
    pub vectorstore_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreStatusResponse {
    pub loaded: bool,
    pub count: usize,
    pub collection: String,
    pub dir: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    pub ingested: usize,
    pub total_after: usize,
    pub ids: Vec<String>,
}

/// Query string for `GET /api/vectorstore/docs`. Kept as raw text so a bad
/// value maps to our own error body instead of the extractor's rejection.
#[derive(Debug, Default, Deserialize)]
pub struct DocsParams {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocSample {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocsResponse {
    pub count: usize,
    pub sample: Vec<DocSample>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextResponse {
    pub text: String,
}

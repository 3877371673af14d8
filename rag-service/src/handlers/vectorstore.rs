use crate::dtos::{DocSample, DocsParams, DocsResponse, IngestResponse};
use crate::services::ingestion::{normalize_request, truncate_chars, NormalizedBatch};
use crate::services::VectorStore;
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use service_core::error::ApiError;
use service_core::utils::parse_json_body_lenient;
use std::sync::Arc;

pub const DEFAULT_SAMPLE_LIMIT: usize = 5;
pub const SAMPLE_TEXT_CHARS: usize = 500;

fn require_store(state: &AppState) -> Result<&Arc<dyn VectorStore>, ApiError> {
    state.store.as_ref().ok_or(ApiError::StoreUnavailable)
}

/// POST /api/vectorstore/ingest
pub async fn ingest(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<IngestResponse>, ApiError> {
    let store = require_store(&state)?;

    let body = parse_json_body_lenient(&body);
    let NormalizedBatch {
        documents,
        ids,
        metadatas,
    } = normalize_request(&body)?;

    let ingested = documents.len();
    store.add(documents, ids.clone(), metadatas).await?;
    // The batch is stored by now, so a failed count degrades to 0.
    let total_after = state.store_count().await;

    tracing::info!(ingested, total_after, "Documents ingested");

    Ok(Json(IngestResponse {
        ingested,
        total_after,
        ids,
    }))
}

/// GET /api/vectorstore/docs?limit=N
pub async fn list_docs(
    State(state): State<AppState>,
    Query(params): Query<DocsParams>,
) -> Result<Json<DocsResponse>, ApiError> {
    let store = require_store(&state)?;
    let limit = parse_limit(params.limit.as_deref())?;

    let all = store.get().await?;
    let sample = all
        .ids
        .into_iter()
        .zip(all.documents)
        .take(limit)
        .map(|(id, document)| DocSample {
            id,
            text: truncate_chars(&document, SAMPLE_TEXT_CHARS).to_string(),
        })
        .collect();

    Ok(Json(DocsResponse {
        count: store.count().await?,
        sample,
    }))
}

/// A blank or absent limit means the default; anything that is not a
/// non-negative integer is rejected.
fn parse_limit(raw: Option<&str>) -> Result<usize, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(DEFAULT_SAMPLE_LIMIT),
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::InvalidParameter("limit")),
    }
}

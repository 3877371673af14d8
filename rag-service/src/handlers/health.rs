use crate::dtos::{HealthResponse, StoreStatusResponse};
use crate::startup::AppState;
use axum::{extract::State, Json};

/// GET /api/health
///
/// Always 200. A store that failed to open reports `vectorstore_loaded:
/// false`; a failing count reports 0.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        openai_key: state.chat.has_credential(),
        model: state.chat.model().to_string(),
        vectorstore_loaded: state.store.is_some(),
        vectorstore_count: state.store_count().await,
    })
}

/// GET /api/vectorstore/status
pub async fn store_status(State(state): State<AppState>) -> Json<StoreStatusResponse> {
    Json(StoreStatusResponse {
        loaded: state.store.is_some(),
        count: state.store_count().await,
        collection: state.config.vectorstore.collection.clone(),
        dir: state.config.vectorstore.dir.clone(),
    })
}

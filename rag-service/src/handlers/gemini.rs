use crate::dtos::TextResponse;
use crate::startup::AppState;
use axum::{body::Bytes, extract::State, Json};
use service_core::error::ApiError;
use service_core::utils::{parse_json_body_lenient, prompt_field};

/// POST /api/gemini
pub async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TextResponse>, ApiError> {
    let body = parse_json_body_lenient(&body);
    let text = state.gemini.generate(prompt_field(&body)).await?;
    Ok(Json(TextResponse { text }))
}

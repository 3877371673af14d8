use crate::startup::AppState;
use axum::{body::Bytes, extract::State, Json};
use service_core::clients::ChatResponse;
use service_core::error::ApiError;
use service_core::utils::{parse_json_body_lenient, prompt_field};

/// POST /api/chatgpt
///
/// A malformed body reads as `{}` and so ends in `MissingPrompt`.
/// `use_context` is accepted but retrieval is not consulted.
pub async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError> {
    let body = parse_json_body_lenient(&body);
    let response = state.chat.complete(prompt_field(&body)).await?;
    Ok(Json(response))
}

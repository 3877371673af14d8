use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use service_core::clients::ChatResponse;
use service_core::error::ApiError;
use service_core::utils::{parse_json_body, prompt_field};

/// POST /api/chatgpt
///
/// The credential is checked before the body is even parsed, so a
/// misconfigured deployment answers 500 to every request.
pub async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError> {
    state.chat.credential()?;

    let body = parse_json_body(&body)?;
    let response = state.chat.complete(prompt_field(&body)).await?;

    Ok(Json(response))
}

/// OPTIONS /api/chatgpt
pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                "Content-Type, Authorization",
            ),
        ],
    )
}

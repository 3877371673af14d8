use crate::clients::ChatError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Every failure a handler can surface to its HTTP caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// The inbound body was not valid JSON.
    #[error("InvalidJSON")]
    InvalidJson,

    #[error("Vectorstore indisponível")]
    StoreUnavailable,

    #[error("{0}")]
    NoValidDocuments(&'static str),

    #[error("Parâmetro '{0}' inválido")]
    InvalidParameter(&'static str),

    #[error("{0}")]
    StoreError(String),

    #[error("ServerError: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::InternalError(anyhow::Error::new(err))
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
            raw: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Chat(err) => match err {
                ChatError::MissingCredential(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ChatError::MissingPrompt => StatusCode::BAD_REQUEST,
                ChatError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                ChatError::UpstreamHttpError { .. }
                | ChatError::UpstreamInvalidJson { .. }
                | ChatError::UpstreamEmptyResponse { .. } => StatusCode::BAD_GATEWAY,
                ChatError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::InvalidJson
            | ApiError::NoValidDocuments(_)
            | ApiError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::StoreUnavailable
            | ApiError::StoreError(_)
            | ApiError::InternalError(_)
            | ApiError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(self) -> ErrorResponse {
        match self {
            ApiError::Chat(err) => match err {
                ChatError::UpstreamTimeout { provider } => {
                    ErrorResponse::new("Timeout").with_detail(format!("{provider} request timed out"))
                }
                ChatError::UpstreamHttpError { body, .. } => {
                    ErrorResponse::new("HTTPError").with_detail(body)
                }
                ChatError::UpstreamInvalidJson { body } => {
                    ErrorResponse::new("InvalidJSON").with_detail(body)
                }
                ChatError::UpstreamEmptyResponse { raw } => ErrorResponse {
                    raw: Some(raw),
                    ..ErrorResponse::new("EmptyResponse")
                },
                ChatError::Transport(err) => ErrorResponse::new(format!("ServerError: {err}")),
                err @ (ChatError::MissingCredential(_) | ChatError::MissingPrompt) => {
                    ErrorResponse::new(err.to_string())
                }
            },
            other => ErrorResponse::new(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

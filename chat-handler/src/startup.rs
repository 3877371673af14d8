//! Application startup and lifecycle management.

use crate::config::HandlerConfig;
use crate::handlers::chat::{chat, preflight};
use axum::{middleware::from_fn, routing::post, Router};
use service_core::clients::ChatClient;
use service_core::error::ApiError;
use service_core::lifecycle::shutdown_signal;
use service_core::middleware::tracing::request_id_middleware;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub chat: ChatClient,
}

impl AppState {
    pub fn new(config: &HandlerConfig) -> Self {
        Self {
            chat: ChatClient::new(config.openai.clone()),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chatgpt", post(chat).options(preflight))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Bind the listener (port 0 = random port for testing).
    pub async fn build(config: HandlerConfig) -> Result<Self, ApiError> {
        let state = AppState::new(&config);
        if !state.chat.has_credential() {
            tracing::warn!("OPENAI_API_KEY not configured - every chat request will fail");
        }

        let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            ApiError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            model = %state.chat.model(),
            "Chat handler listening"
        );

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, build_router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

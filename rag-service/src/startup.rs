//! Application startup and lifecycle management.

use crate::config::{ServiceConfig, VectorStoreConfig};
use crate::handlers::{chat, gemini, health, vectorstore};
use crate::services::{LocalVectorStore, RetrievalClient, VectorStore};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::clients::{ChatClient, GeminiClient};
use service_core::error::ApiError;
use service_core::lifecycle::shutdown_signal;
use service_core::middleware::tracing::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub chat: ChatClient,
    pub gemini: GeminiClient,
    /// Kept for the retrieval-augmented chat path, which is currently off.
    pub retrieval: RetrievalClient,
    /// `None` when the collection could not be opened.
    pub store: Option<Arc<dyn VectorStore>>,
}

impl AppState {
    pub fn new(config: ServiceConfig, store: Option<Arc<dyn VectorStore>>) -> Self {
        Self {
            chat: ChatClient::new(config.openai.clone()),
            gemini: GeminiClient::new(config.gemini.clone()),
            retrieval: RetrievalClient::new(
                config.openai.clone(),
                store.clone(),
                config.vectorstore.top_k,
            ),
            store,
            config: Arc::new(config),
        }
    }

    /// Record count, or 0 when there is no store or counting fails.
    pub async fn store_count(&self) -> usize {
        let Some(store) = &self.store else {
            return 0;
        };
        match store.count().await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(error = %e, "Failed to count vector store records");
                0
            }
        }
    }
}

/// Open the configured collection. Failure is logged and yields `None`; the
/// service then runs without a store.
pub async fn open_store(config: &VectorStoreConfig) -> Option<Arc<dyn VectorStore>> {
    match LocalVectorStore::open(&config.dir, &config.collection).await {
        Ok(store) => {
            let count = store.count().await.unwrap_or_default();
            tracing::info!(
                collection = %store.name(),
                dir = %config.dir.display(),
                count,
                "Vector store loaded"
            );
            Some(Arc::new(store))
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                collection = %config.collection,
                dir = %config.dir.display(),
                "Failed to open vector store"
            );
            None
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chatgpt", post(chat::chat))
        .route("/api/gemini", post(gemini::generate))
        .route("/api/health", get(health::health_check))
        .route("/api/vectorstore/status", get(health::store_status))
        .route("/api/vectorstore/ingest", post(vectorstore::ingest))
        .route("/api/vectorstore/docs", get(vectorstore::list_docs))
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
    /// Open the store and bind the listener (port 0 = random port for testing).
    pub async fn build(config: ServiceConfig) -> Result<Self, ApiError> {
        let store = open_store(&config.vectorstore).await;
        let port = config.server.port;
        let state = AppState::new(config, store);

        if !state.chat.has_credential() {
            tracing::warn!("OPENAI_API_KEY not configured - chat requests will fail");
        }

        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            ApiError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            model = %state.chat.model(),
            vectorstore_loaded = state.store.is_some(),
            "RAG service listening"
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

//! service-core: Shared infrastructure for the chat proxy services.
pub mod clients;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod middleware;
pub mod observability;
pub mod utils;

pub use axum;
pub use secrecy;
pub use serde_json;
pub use tokio;
pub use tower_http;
pub use tracing;

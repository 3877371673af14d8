//! Shared helpers for the rag-service integration tests.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use rag_service::config::ServiceConfig;
use rag_service::services::{LocalVectorStore, VectorStore};
use rag_service::{build_router, AppState};
use serde_json::Value;
use service_core::config::Settings;
use std::path::Path;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Service configuration from explicit key/value pairs; nothing is read
/// from the process environment.
pub fn config(pairs: &[(&str, &str)]) -> ServiceConfig {
    let mut builder = config::Config::builder();
    for (key, value) in pairs {
        builder = builder.set_override(*key, *value).unwrap();
    }
    ServiceConfig::from_settings(&Settings::from_config(builder.build().unwrap())).unwrap()
}

pub async fn local_store(dir: &Path) -> Arc<dyn VectorStore> {
    Arc::new(LocalVectorStore::open(dir, "default").await.unwrap())
}

pub fn app(config: ServiceConfig, store: Option<Arc<dyn VectorStore>>) -> Router {
    build_router(AppState::new(config, store))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

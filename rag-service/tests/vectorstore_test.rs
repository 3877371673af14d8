mod common;

use axum::http::StatusCode;
use async_trait::async_trait;
use common::{app, config, get, local_store, post, send};
use rag_service::services::vector_store::{
    GetResult, Metadata, QueryResult, StoreError, VectorStore,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

const INGEST: &str = "/api/vectorstore/ingest";

#[tokio::test]
async fn test_ingest_returns_ids_and_total() {
    let dir = TempDir::new().unwrap();
    let router = app(config(&[]), Some(local_store(dir.path()).await));

    let (status, body) = send(
        router.clone(),
        post(
            INGEST,
            r#"{"documents": ["  Recife  ", "", 123, "Olinda"], "ids": ["r", "x", "y", "o"]}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ingested": 2, "total_after": 2, "ids": ["r", "o"]}));

    let (status, body) = send(router, post(INGEST, r#"{"docs": ["Caruaru"]}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ingested"], 1);
    assert_eq!(body["total_after"], 3);
    assert_eq!(body["ids"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_ingest_without_documents_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let router = app(config(&[]), Some(local_store(dir.path()).await));

    for body in ["{}", r#"{"documents": "texto"}"#, "{broken"] {
        let (status, payload) = send(router.clone(), post(INGEST, body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            payload,
            json!({"error": "Campo 'documents' (lista) é obrigatório"})
        );
    }

    let (status, payload) =
        send(router, post(INGEST, r#"{"documents": ["  ", "", 123]}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload, json!({"error": "Nenhum documento válido"}));
}

#[tokio::test]
async fn test_ingest_without_store_is_unavailable() {
    let (status, payload) = send(
        app(config(&[]), None),
        post(INGEST, r#"{"documents": ["ok"]}"#),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(payload, json!({"error": "Vectorstore indisponível"}));
}

#[tokio::test]
async fn test_duplicate_id_is_store_error() {
    let dir = TempDir::new().unwrap();
    let router = app(config(&[]), Some(local_store(dir.path()).await));
    let body = r#"{"documents": ["um"], "ids": ["a"]}"#;

    let (status, _) = send(router.clone(), post(INGEST, body)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, payload) = send(router.clone(), post(INGEST, body)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(payload["error"].as_str().unwrap().contains("'a'"));

    let (_, status_body) = send(router, get("/api/vectorstore/status")).await;
    assert_eq!(status_body["count"], 1);
}

#[tokio::test]
async fn test_ingested_documents_survive_restart() {
    let dir = TempDir::new().unwrap();
    let (status, _) = send(
        app(config(&[]), Some(local_store(dir.path()).await)),
        post(INGEST, r#"{"documents": ["persistido"], "metadatas": [{"fonte": "teste"}]}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        app(config(&[]), Some(local_store(dir.path()).await)),
        get("/api/vectorstore/docs"),
    )
    .await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["sample"][0]["text"], "persistido");
}

#[tokio::test]
async fn test_docs_sample_is_limited_and_truncated() {
    let dir = TempDir::new().unwrap();
    let router = app(config(&[]), Some(local_store(dir.path()).await));
    let documents: Vec<String> = (0..7).map(|i| format!("{i}{}", "x".repeat(600))).collect();

    send(
        router.clone(),
        post(INGEST, &json!({ "documents": documents }).to_string()),
    )
    .await;

    let (status, body) = send(router.clone(), get("/api/vectorstore/docs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 7);
    let sample = body["sample"].as_array().unwrap();
    assert_eq!(sample.len(), 5);
    assert_eq!(sample[0]["text"].as_str().unwrap().chars().count(), 500);
    assert!(sample[0]["text"].as_str().unwrap().starts_with('0'));

    let (_, body) = send(router.clone(), get("/api/vectorstore/docs?limit=2")).await;
    assert_eq!(body["sample"].as_array().unwrap().len(), 2);
    assert_eq!(body["count"], 7);

    let (status, body) = send(router, get("/api/vectorstore/docs?limit=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Parâmetro 'limit' inválido"}));
}

#[tokio::test]
async fn test_docs_without_store_is_unavailable() {
    let (status, payload) = send(app(config(&[]), None), get("/api/vectorstore/docs")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(payload["error"], "Vectorstore indisponível");
}

#[tokio::test]
async fn test_long_document_is_stored_truncated() {
    let dir = TempDir::new().unwrap();
    let store = local_store(dir.path()).await;
    let router = app(config(&[]), Some(store.clone()));

    let (status, body) = send(
        router,
        post(INGEST, &json!({"documents": ["a".repeat(9000)], "ids": ["longo"]}).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ids"], json!(["longo"]));

    let stored = store.get().await.unwrap();
    assert_eq!(stored.ids, vec!["longo".to_string()]);
    assert_eq!(stored.documents[0].chars().count(), 8000);
}

/// Accepts every batch but cannot count.
struct UncountableStore;

#[async_trait]
impl VectorStore for UncountableStore {
    async fn add(
        &self,
        _documents: Vec<String>,
        _ids: Vec<String>,
        _metadatas: Option<Vec<Metadata>>,
    ) -> Result<(), StoreError> {
        Ok(())
    }

    async fn query(&self, _query_text: &str, _top_k: usize) -> Result<QueryResult, StoreError> {
        Ok(QueryResult::default())
    }

    async fn get(&self) -> Result<GetResult, StoreError> {
        Ok(GetResult::default())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Err(StoreError::Io(std::io::Error::other("index offline")))
    }
}

#[tokio::test]
async fn test_ingest_succeeds_when_count_fails() {
    let store: Arc<dyn VectorStore> = Arc::new(UncountableStore);
    let (status, body) = send(
        app(config(&[]), Some(store)),
        post(INGEST, r#"{"documents": ["guardado"], "ids": ["g1"]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ingested": 1, "total_after": 0, "ids": ["g1"]}));
}

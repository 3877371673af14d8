//! Persistent document collections searchable by text similarity.
//!
//! Handlers only see the [`VectorStore`] trait; [`LocalVectorStore`] is the
//! bundled file-backed backend.

pub mod embedding;
pub mod local;

pub use local::LocalVectorStore;

use async_trait::async_trait;
use serde_json::{Map, Value};
use service_core::error::ApiError;
use thiserror::Error;

/// Free-form metadata attached to a stored document.
pub type Metadata = Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ID '{0}' already exists in the collection")]
    DuplicateId(String),

    #[error("expected {expected} {field}, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid collection name '{0}'")]
    InvalidCollectionName(String),

    #[error("collection I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("collection file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::StoreError(err.to_string())
    }
}

/// Nearest neighbours for a query, best match first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub ids: Vec<String>,
    pub documents: Vec<String>,
    /// `1 - cosine similarity` per hit.
    pub distances: Vec<f32>,
}

/// Full collection contents in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetResult {
    pub ids: Vec<String>,
    pub documents: Vec<String>,
    pub metadatas: Vec<Option<Metadata>>,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Append documents. `ids` and `metadatas` (when given) must be the same
    /// length as `documents`. Nothing is stored if any id is already taken.
    async fn add(
        &self,
        documents: Vec<String>,
        ids: Vec<String>,
        metadatas: Option<Vec<Metadata>>,
    ) -> Result<(), StoreError>;

    /// Rank stored documents against raw query text.
    async fn query(&self, query_text: &str, top_k: usize) -> Result<QueryResult, StoreError>;

    async fn get(&self) -> Result<GetResult, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}

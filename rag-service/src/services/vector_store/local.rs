//! File-backed collection: one JSON document per collection.
//!
//! All records live in memory behind a `tokio::sync::RwLock`. Queries share
//! the read lock; `add` holds the write lock until the new file has been
//! renamed into place, so writers are serialized.

use super::embedding::{cosine_similarity, embed_text};
use super::{GetResult, Metadata, QueryResult, StoreError, VectorStore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    id: String,
    document: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
struct CollectionFile {
    #[serde(default)]
    records: Vec<StoredRecord>,
}

#[derive(Serialize)]
struct CollectionFileRef<'a> {
    name: &'a str,
    records: Vec<&'a StoredRecord>,
}

#[derive(Debug)]
struct IndexedRecord {
    record: StoredRecord,
    embedding: Vec<f32>,
}

impl IndexedRecord {
    fn new(record: StoredRecord) -> Self {
        let embedding = embed_text(&record.document);
        Self { record, embedding }
    }
}

#[derive(Debug)]
pub struct LocalVectorStore {
    name: String,
    path: PathBuf,
    records: RwLock<Vec<IndexedRecord>>,
}

impl LocalVectorStore {
    /// Open (or create) `collection` under `dir`.
    pub async fn open(dir: impl AsRef<Path>, collection: &str) -> Result<Self, StoreError> {
        if !is_valid_collection_name(collection) {
            return Err(StoreError::InvalidCollectionName(collection.to_string()));
        }

        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!("{collection}.json"));

        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<CollectionFile>(&bytes)?.records,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            collection,
            path = %path.display(),
            records = records.len(),
            "Opened collection"
        );

        Ok(Self {
            name: collection.to_string(),
            path,
            records: RwLock::new(records.into_iter().map(IndexedRecord::new).collect()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    async fn persist(&self, records: &[&StoredRecord]) -> Result<(), StoreError> {
        let file = CollectionFileRef {
            name: &self.name,
            records: records.to_vec(),
        };
        let bytes = serde_json::to_vec(&file)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn is_valid_collection_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn add(
        &self,
        documents: Vec<String>,
        ids: Vec<String>,
        metadatas: Option<Vec<Metadata>>,
    ) -> Result<(), StoreError> {
        if ids.len() != documents.len() {
            return Err(StoreError::LengthMismatch {
                field: "ids",
                expected: documents.len(),
                actual: ids.len(),
            });
        }
        if let Some(metadatas) = &metadatas {
            if metadatas.len() != documents.len() {
                return Err(StoreError::LengthMismatch {
                    field: "metadatas",
                    expected: documents.len(),
                    actual: metadatas.len(),
                });
            }
        }

        let mut records = self.records.write().await;

        let mut seen: HashSet<&str> = records.iter().map(|r| r.record.id.as_str()).collect();
        for id in &ids {
            if !seen.insert(id.as_str()) {
                return Err(StoreError::DuplicateId(id.clone()));
            }
        }

        let mut metadatas = metadatas.map(Vec::into_iter);
        let new_records: Vec<StoredRecord> = documents
            .into_iter()
            .zip(ids)
            .map(|(document, id)| StoredRecord {
                id,
                document,
                metadata: metadatas.as_mut().and_then(|it| it.next()),
            })
            .collect();

        let snapshot: Vec<&StoredRecord> = records
            .iter()
            .map(|r| &r.record)
            .chain(new_records.iter())
            .collect();
        self.persist(&snapshot).await?;

        let added = new_records.len();
        records.extend(new_records.into_iter().map(IndexedRecord::new));

        tracing::debug!(
            collection = %self.name,
            added,
            total = records.len(),
            "Added documents"
        );
        Ok(())
    }

    async fn query(&self, query_text: &str, top_k: usize) -> Result<QueryResult, StoreError> {
        let query = embed_text(query_text);
        let records = self.records.read().await;

        let mut scored: Vec<(f32, &StoredRecord)> = records
            .iter()
            .map(|r| (cosine_similarity(&query, &r.embedding), &r.record))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        let mut result = QueryResult::default();
        for (similarity, record) in scored {
            result.ids.push(record.id.clone());
            result.documents.push(record.document.clone());
            result.distances.push(1.0 - similarity);
        }
        Ok(result)
    }

    async fn get(&self) -> Result<GetResult, StoreError> {
        let records = self.records.read().await;
        let mut result = GetResult::default();
        for IndexedRecord { record, .. } in records.iter() {
            result.ids.push(record.id.clone());
            result.documents.push(record.document.clone());
            result.metadatas.push(record.metadata.clone());
        }
        Ok(result)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().await.len())
    }
}

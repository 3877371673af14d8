//! Ingestion normalizer: cleans an untyped ingest payload into a batch the
//! vector store accepts.

use crate::services::vector_store::Metadata;
use serde_json::Value;
use service_core::error::ApiError;
use service_core::utils::first_truthy;
use uuid::Uuid;

/// Longest document stored, in characters.
pub const MAX_DOCUMENT_CHARS: usize = 8000;

pub const MISSING_DOCUMENTS: &str = "Campo 'documents' (lista) é obrigatório";
pub const NO_VALID_DOCUMENTS: &str = "Nenhum documento válido";

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBatch {
    pub documents: Vec<String>,
    pub ids: Vec<String>,
    /// `None` when the caller sent no metadata list at all.
    pub metadatas: Option<Vec<Metadata>>,
}

/// Normalize an ingest request body.
///
/// Documents come from `documents` (or `docs`), metadata from `metadatas`
/// (or `metadata`), caller ids from `ids`.
pub fn normalize_request(body: &Value) -> Result<NormalizedBatch, ApiError> {
    normalize(
        first_truthy(body, &["documents", "docs"]),
        body.get("ids"),
        first_truthy(body, &["metadatas", "metadata"]),
    )
}

pub fn normalize(
    documents: Option<&Value>,
    ids: Option<&Value>,
    metadatas: Option<&Value>,
) -> Result<NormalizedBatch, ApiError> {
    let documents = documents
        .and_then(Value::as_array)
        .filter(|docs| !docs.is_empty())
        .ok_or(ApiError::NoValidDocuments(MISSING_DOCUMENTS))?;
    let ids = ids.and_then(Value::as_array);

    let mut cleaned = Vec::new();
    let mut final_ids = Vec::new();

    for (index, document) in documents.iter().enumerate() {
        let Some(text) = document.as_str() else {
            continue;
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        cleaned.push(truncate_chars(text, MAX_DOCUMENT_CHARS).to_string());
        final_ids.push(caller_id(ids, index).unwrap_or_else(|| Uuid::new_v4().to_string()));
    }

    if cleaned.is_empty() {
        return Err(ApiError::NoValidDocuments(NO_VALID_DOCUMENTS));
    }

    // Aligned with the cleaned sequence, not the original indexes.
    let metadatas = metadatas.and_then(Value::as_array).map(|entries| {
        (0..cleaned.len())
            .map(|i| {
                entries
                    .get(i)
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default()
            })
            .collect()
    });

    Ok(NormalizedBatch {
        documents: cleaned,
        ids: final_ids,
        metadatas,
    })
}

fn caller_id(ids: Option<&Vec<Value>>, index: usize) -> Option<String> {
    ids?.get(index)?
        .as_str()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// The first `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

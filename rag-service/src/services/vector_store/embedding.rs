//! The collection's built-in embedding function.
//!
//! Tokens (lower-cased alphanumeric runs) are hashed into a fixed number of
//! signed buckets and the result is L2-normalized. Vectors are recomputed
//! whenever a collection is opened, so the hash only has to be stable within
//! one process.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const EMBEDDING_DIMENSIONS: usize = 384;

pub fn embed_text(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; EMBEDDING_DIMENSIONS];

    for token in tokens(text) {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        let hash = hasher.finish();

        let bucket = (hash % EMBEDDING_DIMENSIONS as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign;
    }

    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in &mut vector {
            *value /= norm;
        }
    }
    vector
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Cosine similarity; 0.0 when either vector is all zeros.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_is_normalized() {
        let v = embed_text("Boa Viagem é um bairro de Recife");
        assert_eq!(v.len(), EMBEDDING_DIMENSIONS);
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        assert!(embed_text("  ...  ").iter().all(|x| *x == 0.0));
        assert_eq!(cosine_similarity(&embed_text(""), &embed_text("recife")), 0.0);
    }

    #[test]
    fn test_case_and_punctuation_are_ignored() {
        let a = embed_text("Casa Amarela, Recife!");
        let b = embed_text("casa amarela recife");
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_shared_words_score_higher() {
        let query = embed_text("praia de boa viagem");
        let near = embed_text("a praia de boa viagem fica na zona sul");
        let far = embed_text("mercado de são josé no centro");
        assert!(cosine_similarity(&query, &near) > cosine_similarity(&query, &far));
    }
}

//! In-Memory Vector Store
//!
//! Immutable word -> vector table loaded once at construction.

use async_trait::async_trait;
use hashbrown::HashMap;
use std::path::Path;
use tracing::info;

use super::{word2vec, VectorStore};
use crate::error::{Error, Result};

/// Vector store backed by a fully resident table.
#[derive(Debug)]
pub struct MemoryStore {
    dimension: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl MemoryStore {
    /// Load a binary word2vec file fully into memory.
    pub fn load(path: &Path) -> Result<Self> {
        let parsed = word2vec::read_file(path)?;
        info!(
            path = %path.display(),
            words = parsed.vectors.len(),
            dimension = parsed.dimension,
            "loaded embeddings into memory"
        );
        Ok(Self {
            dimension: parsed.dimension,
            vectors: parsed.vectors,
        })
    }

    /// Build a store from already materialized entries.
    ///
    /// Every vector must match `dimension`; a mismatch is a data-integrity
    /// failure, not something to paper over.
    pub fn from_entries<I>(dimension: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<f32>)>,
    {
        let mut vectors = HashMap::new();
        for (word, vector) in entries {
            if vector.len() != dimension {
                return Err(Error::DataIntegrity(format!(
                    "vector for {:?} has dimension {}, expected {}",
                    word,
                    vector.len(),
                    dimension
                )));
            }
            vectors.insert(word, vector);
        }
        Ok(Self { dimension, vectors })
    }

    /// Embedding dimension of every stored vector.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of words in the vocabulary.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn get_vectors(&self, words: &[String]) -> Result<HashMap<String, Vec<f32>>> {
        Ok(words
            .iter()
            .filter_map(|word| {
                self.vectors
                    .get_key_value(word)
                    .map(|(w, v)| (w.clone(), v.clone()))
            })
            .collect())
    }

    async fn filter_known(&self, words: &[String]) -> Result<Vec<String>> {
        Ok(words
            .iter()
            .filter(|word| self.vectors.contains_key(word.as_str()))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::from_entries(
            3,
            [
                ("dog".to_string(), vec![1.0, 0.0, 0.0]),
                ("cat".to_string(), vec![0.9, 0.1, 0.0]),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_partial_miss_is_not_an_error() {
        let store = store();
        let words = vec!["dog".to_string(), "bird".to_string()];

        let found = store.get_vectors(&words).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found["dog"], vec![1.0, 0.0, 0.0]);
        assert!(!found.contains_key("bird"));
    }

    #[tokio::test]
    async fn test_filter_known_keeps_input_order() {
        let store = store();
        let words = vec![
            "cat".to_string(),
            "bird".to_string(),
            "dog".to_string(),
        ];

        let known = store.filter_known(&words).await.unwrap();
        assert_eq!(known, vec!["cat".to_string(), "dog".to_string()]);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let result = MemoryStore::from_entries(
            3,
            [("dog".to_string(), vec![1.0, 0.0])],
        );
        assert!(matches!(result, Err(Error::DataIntegrity(_))));
    }

    #[tokio::test]
    async fn test_ping_and_close_are_noops() {
        let store = store();
        store.ping().await.unwrap();
        store.close().await.unwrap();
        assert_eq!(store.len(), 2);
    }
}

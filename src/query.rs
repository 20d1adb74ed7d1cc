//! Query Service
//!
//! Orchestrates the vector store, the similarity engine and the edit
//! candidate generator behind the three operations the API surface exposes.
//! Built once at startup and shared by reference with request handlers.

use hashbrown::HashSet;
use std::sync::Arc;

use crate::edits;
use crate::error::{Error, Result};
use crate::similarity::{self, WordDistance, INFINITE_DISTANCE};
use crate::store::VectorStore;

/// Word-similarity query front end over a [`VectorStore`].
pub struct QueryService {
    store: Arc<dyn VectorStore>,
}

impl QueryService {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// The backing store, for health probes and shutdown.
    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Cosine distance between two words, or [`INFINITE_DISTANCE`] when
    /// either is missing from the vocabulary. Both vectors come from one
    /// batched store call.
    pub async fn distance_between(&self, word1: &str, word2: &str) -> Result<f32> {
        let w1 = normalize(word1)?;
        let w2 = normalize(word2)?;

        let mut lookup = vec![w1.clone()];
        if w2 != w1 {
            lookup.push(w2.clone());
        }
        let vectors = self.store.get_vectors(&lookup).await?;

        match (vectors.get(&w1), vectors.get(&w2)) {
            (Some(a), Some(b)) => Ok(similarity::distance(a, b)),
            _ => Ok(INFINITE_DISTANCE),
        }
    }

    /// Distance from a center word to every candidate, sorted. One batched
    /// store call covers the center and all candidates.
    ///
    /// The output always has one entry per input candidate (duplicates
    /// included). If the center word itself is unknown, every candidate
    /// reports the infinite sentinel; a partial result would be misleading.
    pub async fn ranked_neighbors(
        &self,
        center: &str,
        candidates: &[String],
        ascending: bool,
    ) -> Result<Vec<WordDistance>> {
        let center = normalize(center)?;
        let candidates: Vec<String> = candidates.iter().map(|w| w.trim().to_string()).collect();

        let mut lookup = Vec::with_capacity(candidates.len() + 1);
        let mut seen = HashSet::new();
        for word in std::iter::once(&center).chain(candidates.iter()) {
            if seen.insert(word.clone()) {
                lookup.push(word.clone());
            }
        }
        let vectors = self.store.get_vectors(&lookup).await?;

        match vectors.get(&center) {
            Some(center_vec) => Ok(similarity::rank(center_vec, &candidates, &vectors, ascending)),
            None => Ok(candidates
                .into_iter()
                .map(|word| WordDistance {
                    word,
                    distance: INFINITE_DISTANCE,
                })
                .collect()),
        }
    }

    /// Vocabulary words within edit distance 1 (optionally 2) of `word`,
    /// the word itself included when it is valid. One batched existence
    /// check against the store; output is deduplicated and sorted.
    pub async fn spelling_suggestions(
        &self,
        word: &str,
        edit_distance_2: bool,
    ) -> Result<Vec<String>> {
        let word = normalize(word)?;

        let mut candidates = edits::edits_within_one(&word);
        if edit_distance_2 {
            candidates.extend(edits::edits_within_two(&word));
        }
        candidates.insert(word);

        let lookup: Vec<String> = candidates.into_iter().collect();
        let mut known = self.store.filter_known(&lookup).await?;
        known.sort();
        Ok(known)
    }
}

/// Trim a word, rejecting blank input before any I/O happens.
fn normalize(word: &str) -> Result<String> {
    let trimmed = word.trim();
    if trimmed.is_empty() {
        return Err(Error::Input("word must not be blank".to_string()));
    }
    Ok(trimmed.to_string())
}

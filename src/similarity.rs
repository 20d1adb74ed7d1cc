//! Cosine Similarity and Neighbor Ranking
//!
//! Distance computations over fixed-dimension embedding vectors.

use hashbrown::HashMap;
use std::cmp::Ordering;

/// Sentinel distance reported for words absent from the vocabulary.
///
/// Only vocabulary misses produce this value; numerically degenerate
/// vectors get a finite defined distance instead (see [`cosine_similarity`]).
pub const INFINITE_DISTANCE: f32 = f32::INFINITY;

/// A (word, distance) result pair.
#[derive(Debug, Clone, PartialEq)]
pub struct WordDistance {
    pub word: String,
    pub distance: f32,
}

/// Compute dot product of two vectors
///
/// Uses unrolled loop for better CPU performance.
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let len = a.len();
    let mut sum = 0.0f32;

    // Process 4 elements at a time (manual unrolling)
    let chunks = len / 4;
    let remainder = len % 4;

    for i in 0..chunks {
        let idx = i * 4;
        sum += a[idx] * b[idx];
        sum += a[idx + 1] * b[idx + 1];
        sum += a[idx + 2] * b[idx + 2];
        sum += a[idx + 3] * b[idx + 3];
    }

    for i in (len - remainder)..len {
        sum += a[i] * b[i];
    }

    sum
}

/// Compute the Euclidean norm of a vector
#[inline]
pub fn magnitude(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Compute cosine similarity between two vectors
///
/// Returns value in range [-1, 1] where 1 means identical direction.
/// A zero-norm operand yields a defined similarity of 0.0 rather than NaN.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let dot = dot_product(a, b);
    let denom = magnitude(a) * magnitude(b);
    if denom > 0.0 {
        dot / denom
    } else {
        0.0
    }
}

/// Cosine distance: `1 - cosine_similarity`, range approximately [0, 2].
///
/// 0 means identical direction. Zero-norm operands land on 1.0 via the
/// similarity guard above.
#[inline]
pub fn distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}

/// Rank candidate words by cosine distance to a center vector.
///
/// Every candidate appears in the output, in a full stable sort: candidates
/// missing from `vectors` get [`INFINITE_DISTANCE`] and therefore sort last
/// when `ascending`. Ties keep input order.
pub fn rank(
    center: &[f32],
    candidates: &[String],
    vectors: &HashMap<String, Vec<f32>>,
    ascending: bool,
) -> Vec<WordDistance> {
    let mut results: Vec<WordDistance> = candidates
        .iter()
        .map(|word| {
            let dist = match vectors.get(word) {
                Some(vec) => distance(center, vec),
                None => INFINITE_DISTANCE,
            };
            WordDistance {
                word: word.clone(),
                distance: dist,
            }
        })
        .collect();

    if ascending {
        results.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
    } else {
        results.sort_by(|a, b| b.distance.partial_cmp(&a.distance).unwrap_or(Ordering::Equal));
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &[f32])]) -> HashMap<String, Vec<f32>> {
        entries
            .iter()
            .map(|(w, v)| (w.to_string(), v.to_vec()))
            .collect()
    }

    #[test]
    fn test_dot_product() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![4.0, 5.0, 6.0];
        assert!((dot_product(&a, &b) - 32.0).abs() < 1e-6);
    }

    #[test]
    fn test_dot_product_unrolled_tail() {
        // 6 elements exercises both the unrolled chunk and the remainder
        let a = vec![1.0, 1.0, 1.0, 1.0, 2.0, 3.0];
        let b = vec![1.0, 1.0, 1.0, 1.0, 2.0, 3.0];
        assert!((dot_product(&a, &b) - 17.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_norm_is_defined() {
        let zero = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &b), 0.0);
        assert_eq!(distance(&zero, &b), 1.0);
    }

    #[test]
    fn test_self_distance_near_zero() {
        let a = vec![0.3, -1.2, 4.5, 0.7];
        assert!(distance(&a, &a).abs() < 1e-6);
    }

    #[test]
    fn test_rank_ascending_with_missing() {
        let vectors = map(&[("cat", &[0.9, 0.1, 0.0]), ("fish", &[0.0, 1.0, 0.0])]);
        let center = [1.0, 0.0, 0.0];
        let candidates = vec!["fish".to_string(), "bird".to_string(), "cat".to_string()];

        let ranked = rank(&center, &candidates, &vectors, true);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].word, "cat");
        assert_eq!(ranked[1].word, "fish");
        assert_eq!(ranked[2].word, "bird");
        assert_eq!(ranked[2].distance, INFINITE_DISTANCE);
    }

    #[test]
    fn test_rank_descending_reverses() {
        let vectors = map(&[("cat", &[0.9, 0.1, 0.0]), ("fish", &[0.0, 1.0, 0.0])]);
        let center = [1.0, 0.0, 0.0];
        let candidates = vec!["fish".to_string(), "cat".to_string()];

        let asc = rank(&center, &candidates, &vectors, true);
        let desc = rank(&center, &candidates, &vectors, false);
        assert_eq!(asc[0].word, desc[1].word);
        assert_eq!(asc[1].word, desc[0].word);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let vectors = HashMap::new();
        let center = [1.0, 0.0];
        let candidates = vec!["b".to_string(), "a".to_string(), "c".to_string()];

        // All missing, all infinite: stable sort preserves input order
        let ranked = rank(&center, &candidates, &vectors, true);
        let words: Vec<&str> = ranked.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["b", "a", "c"]);
    }
}

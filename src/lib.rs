//! WORDVEC - Word-Embedding Similarity Service
//!
//! Nearest-neighbor word lookups over precomputed embedding vectors,
//! served over a small HTTP API, with an edit-distance spelling-correction
//! fallback. Vectors come from one of two interchangeable backends: an
//! in-memory table loaded from a binary word2vec file, or a remote
//! key-value service queried with batched multi-key lookups.

pub mod edits;
pub mod error;
pub mod metrics;
pub mod query;
pub mod server;
pub mod similarity;
pub mod store;

pub use error::{Error, Result};
pub use metrics::Metrics;
pub use query::QueryService;
pub use server::{Config, HttpServer};
pub use similarity::{WordDistance, INFINITE_DISTANCE};
pub use store::{MemoryStore, RemoteStore, StoreConfig, VectorStore};

//! Vector Storage Backends
//!
//! One contract, two implementations: an immutable in-memory table loaded
//! from a word2vec file, and a remote key-value service reached over TCP
//! with batched multi-key lookups.

mod kv;
mod memory;
mod remote;
pub mod word2vec;

pub use kv::{KvClient, KvCommand, KvReply, RespCodec};
pub use memory::MemoryStore;
pub use remote::RemoteStore;

use async_trait::async_trait;
use hashbrown::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;

/// Word -> vector lookup service.
///
/// Words absent from the backing store are simply missing from the result
/// map; partial misses are never an error. Only total failure (unreachable
/// backend, malformed stored data) surfaces as `Err`. Lookups are
/// idempotent and side-effect-free aside from connection caching.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Fetch vectors for the given words in a single backend round trip.
    async fn get_vectors(&self, words: &[String]) -> Result<HashMap<String, Vec<f32>>>;

    /// Batched existence check: the subset of `words` present in the
    /// vocabulary, one backend round trip.
    async fn filter_known(&self, words: &[String]) -> Result<Vec<String>>;

    /// Probe backend reachability. For the remote store this performs the
    /// idempotent lazy connect.
    async fn ping(&self) -> Result<()>;

    /// Release any held connection deterministically. Safe to call more
    /// than once; subsequent lookups reconnect lazily.
    async fn close(&self) -> Result<()>;
}

/// Backend selection, decided once at construction time.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// Load a binary word2vec file fully into memory.
    Memory { path: PathBuf },
    /// Batched lookups against a remote key-value service.
    Remote { addr: String, dimension: usize },
}

impl StoreConfig {
    /// Build the configured backend.
    ///
    /// The memory variant reads its file here; the remote variant defers
    /// connecting until first use.
    pub fn build(&self) -> Result<Arc<dyn VectorStore>> {
        match self {
            StoreConfig::Memory { path } => Ok(Arc::new(MemoryStore::load(path)?)),
            StoreConfig::Remote { addr, dimension } => {
                Ok(Arc::new(RemoteStore::new(addr.clone(), *dimension)))
            }
        }
    }
}

//! Remote Vector Store
//!
//! Backend that resolves vectors from the key-value service. One shared
//! connection, established lazily and guarded by an async mutex so
//! overlapping requests serialize their round trips without leaking state
//! into each other. Every batch of words is a single MGET.

use async_trait::async_trait;
use bytes::{Buf, Bytes};
use hashbrown::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

use super::kv::KvClient;
use super::VectorStore;
use crate::error::{Error, Result};

/// Vector store backed by the remote key-value service.
pub struct RemoteStore {
    addr: String,
    dimension: usize,
    client: Mutex<Option<KvClient>>,
}

impl RemoteStore {
    /// Configure a store against `addr`. No I/O happens until first use.
    pub fn new(addr: impl Into<String>, dimension: usize) -> Self {
        Self {
            addr: addr.into(),
            dimension,
            client: Mutex::new(None),
        }
    }

    /// Expected dimension of every stored vector.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Lock the connection slot, connecting first if needed. Idempotent.
    async fn connected(&self) -> Result<tokio::sync::MutexGuard<'_, Option<KvClient>>> {
        let mut guard = self.client.lock().await;
        if guard.is_none() {
            debug!(addr = %self.addr, "establishing key-value store connection");
            *guard = Some(KvClient::connect(&self.addr).await?);
        }
        Ok(guard)
    }

    fn decode_vector(&self, word: &str, raw: &Bytes) -> Result<Vec<f32>> {
        if raw.len() != self.dimension * 4 {
            return Err(Error::DataIntegrity(format!(
                "stored vector for {:?} is {} bytes, expected {} ({} x f32)",
                word,
                raw.len(),
                self.dimension * 4,
                self.dimension
            )));
        }
        let mut buf = raw.clone();
        let mut vector = Vec::with_capacity(self.dimension);
        while buf.has_remaining() {
            vector.push(buf.get_f32_le());
        }
        Ok(vector)
    }
}

#[async_trait]
impl VectorStore for RemoteStore {
    async fn get_vectors(&self, words: &[String]) -> Result<HashMap<String, Vec<f32>>> {
        let mut guard = self.connected().await?;
        let client = guard.as_mut().expect("connected() fills the slot");

        let values = client.mget(words).await?;

        let mut found = HashMap::new();
        for (word, value) in words.iter().zip(values) {
            if let Some(raw) = value {
                found.insert(word.clone(), self.decode_vector(word, &raw)?);
            }
        }
        Ok(found)
    }

    async fn filter_known(&self, words: &[String]) -> Result<Vec<String>> {
        let mut guard = self.connected().await?;
        let client = guard.as_mut().expect("connected() fills the slot");

        let values = client.mget(words).await?;
        Ok(words
            .iter()
            .zip(values)
            .filter_map(|(word, value)| value.map(|_| word.clone()))
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        let mut guard = self.connected().await?;
        let client = guard.as_mut().expect("connected() fills the slot");
        client.ping().await
    }

    async fn close(&self) -> Result<()> {
        let mut guard = self.client.lock().await;
        if guard.take().is_some() {
            debug!(addr = %self.addr, "released key-value store connection");
        }
        Ok(())
    }
}

//! In-memory blob backend.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use docharbor_core::error::AppError;
use docharbor_core::result::AppResult;
use docharbor_core::traits::blob::{BlobStore, ByteStream};

/// In-memory blob backend for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    /// Blobs keyed by opaque key.
    blobs: DashMap<String, Bytes>,
}

impl MemoryBlobStore {
    /// Create an empty blob store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether no blobs are stored.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn put(&self, key: &str, data: Bytes) -> AppResult<()> {
        self.blobs.insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Bytes> {
        self.blobs
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {key}")))
    }

    async fn get_stream(&self, key: &str) -> AppResult<ByteStream> {
        let data = self.get(key).await?;
        Ok(Box::pin(futures::stream::once(async move { Ok(data) })))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.blobs.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.blobs.contains_key(key))
    }
}

//! Blob backend trait for pluggable document byte storage.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading blob contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for blob backends.
///
/// The store only requires a put/get/delete/exists contract; keys are
/// opaque strings chosen by the caller. Implementations exist for the
/// local filesystem and for in-memory storage. The [`BlobStore`] trait is
/// defined here in `docharbor-core` and implemented in `docharbor-blob`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Durably persist blob bytes under the given key.
    ///
    /// Overwrites any existing blob at the same key.
    async fn put(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Read a blob into memory as a complete byte vector.
    async fn get(&self, key: &str) -> AppResult<Bytes>;

    /// Read a blob as a byte stream.
    async fn get_stream(&self, key: &str) -> AppResult<ByteStream>;

    /// Delete the blob at the given key. Deleting a missing key is not an
    /// error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a blob exists at the given key.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}

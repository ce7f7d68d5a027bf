//! Tree-wide read/write lock.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Coarse read/write lock serializing structural tree mutations.
///
/// `move` and recursive delete need a consistent snapshot of the whole
/// tree to detect cycles and cascade paths/deletions, so all structural
/// mutations take the exclusive side; reads (list, path lookup, access
/// resolution) share. Blob I/O must never happen while the exclusive
/// side is held — see the validate-reserve / write / commit flow in the
/// document service.
#[derive(Debug, Clone, Default)]
pub struct TreeLock {
    inner: Arc<RwLock<()>>,
}

impl TreeLock {
    /// Create a new unlocked tree lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the shared side.
    pub async fn read(&self) -> RwLockReadGuard<'_, ()> {
        self.inner.read().await
    }

    /// Acquire the exclusive side.
    pub async fn write(&self) -> RwLockWriteGuard<'_, ()> {
        self.inner.write().await
    }
}

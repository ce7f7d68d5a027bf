//! # docharbor-blob
//!
//! Blob backend implementations for the [`BlobStore`] trait defined in
//! `docharbor-core`. Bytes are durably persisted under opaque keys; all
//! catalog knowledge (which document owns which key) lives above this
//! crate.
//!
//! [`BlobStore`]: docharbor_core::traits::BlobStore

pub mod local;
pub mod memory;

pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;

//! Trait seams between the store and its collaborators.

pub mod audit;
pub mod blob;

pub use audit::AuditSink;
pub use blob::{BlobStore, ByteStream};

//! DashMap-backed in-memory repositories.
//!
//! Used by tests and embedded deployments; also the reference semantics
//! the flat-file backend must match.

pub mod document;
pub mod folder;

pub use document::MemoryDocumentRepository;
pub use folder::MemoryFolderRepository;

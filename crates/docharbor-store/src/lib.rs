//! # docharbor-store
//!
//! The DocHarbor service layer: the folder tree, the document catalog,
//! access-control resolution, and the compound lifecycle operations
//! (upload, move, recursive delete, copy) that coordinate them while
//! preserving tree invariants.
//!
//! The [`DocStore`] facade wires repositories, the blob backend, the
//! tree-wide read/write lock, upload reservations, and the audit sink
//! into one operation-oriented contract for the (external) transport
//! layer.

pub mod access;
pub mod audit;
pub mod context;
pub mod document;
pub mod folder;
pub mod locks;
pub mod reservations;
pub mod store;

mod validate;

pub use context::RequestContext;
pub use store::DocStore;

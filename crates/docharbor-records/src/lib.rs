//! # docharbor-records
//!
//! Persistence adapters for folder and document records. The business
//! rules live entirely above the [`repository`] traits; the two backends
//! here (DashMap-backed memory, one-JSON-file-per-record flat file) are
//! interchangeable and encode no domain logic of their own.
//!
//! Records are flat collections keyed by id, with `parent_id` /
//! `folder_id` as foreign references — never nested — so a rename/move
//! touches only the records actually on the path-recompute walk.

pub mod flatfile;
pub mod memory;
pub mod repository;

pub use repository::{DocumentRepository, FolderRepository};

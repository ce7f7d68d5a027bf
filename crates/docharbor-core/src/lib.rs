//! # docharbor-core
//!
//! Core crate for DocHarbor. Contains the trait seams (blob backend,
//! repositories, audit sink), configuration schemas, the content digest
//! used for deduplication, domain events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DocHarbor crates.

pub mod config;
pub mod digest;
pub mod error;
pub mod events;
pub mod logging;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;

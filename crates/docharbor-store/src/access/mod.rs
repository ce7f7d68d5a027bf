//! Access control resolution.

pub mod resolver;

pub use resolver::{authorize, document_delete_allowed, resolve};

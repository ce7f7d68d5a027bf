//! Access level types.

pub mod access;

pub use access::AccessLevel;

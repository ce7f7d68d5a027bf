//! User role types.

pub mod role;

pub use role::UserRole;

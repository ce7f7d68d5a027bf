//! # docharbor-entity
//!
//! Domain entity models for DocHarbor. Every struct in this crate
//! represents a persisted record or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod document;
pub mod folder;
pub mod permission;
pub mod user;

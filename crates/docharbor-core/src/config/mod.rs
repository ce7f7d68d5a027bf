//! Configuration schemas for DocHarbor.
//!
//! Every section has serde defaults so a partial (or missing) config file
//! still yields a usable configuration.

pub mod app;
pub mod blob;
pub mod logging;
pub mod records;

pub use app::{AppConfig, LimitsConfig};
pub use blob::BlobConfig;
pub use logging::LoggingConfig;
pub use records::RecordsConfig;

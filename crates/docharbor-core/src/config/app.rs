//! Top-level application configuration and loading.

use serde::{Deserialize, Serialize};

use crate::result::AppResult;

use super::blob::BlobConfig;
use super::logging::LoggingConfig;
use super::records::RecordsConfig;

/// Top-level DocHarbor configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Blob backend configuration.
    #[serde(default)]
    pub blob: BlobConfig,
    /// Record persistence configuration.
    #[serde(default)]
    pub records: RecordsConfig,
    /// Operational limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Operational limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum upload size in bytes (default 5 GiB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file plus `DOCHARBOR_*` environment
    /// overrides (e.g. `DOCHARBOR_LOGGING__LEVEL=debug`).
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load(path: &str) -> AppResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("DOCHARBOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config = settings.try_deserialize::<AppConfig>()?;
        Ok(config)
    }
}

fn default_max_upload() -> u64 {
    5_368_709_120 // 5 GiB
}

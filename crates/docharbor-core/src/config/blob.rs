//! Blob backend configuration.

use serde::{Deserialize, Serialize};

/// Blob backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobConfig {
    /// Blob provider to use: `"memory"` or `"local"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Local filesystem blob configuration.
    #[serde(default)]
    pub local: LocalBlobConfig,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            local: LocalBlobConfig::default(),
        }
    }
}

/// Local filesystem blob backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalBlobConfig {
    /// Root path for blob storage.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalBlobConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_local_root() -> String {
    "./data/blobs".to_string()
}

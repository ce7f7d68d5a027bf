//! Record persistence configuration.

use serde::{Deserialize, Serialize};

/// Record persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsConfig {
    /// Repository backend to use: `"memory"` or `"flatfile"`.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Root path for flat-file records.
    #[serde(default = "default_records_root")]
    pub root_path: String,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            root_path: default_records_root(),
        }
    }
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_records_root() -> String {
    "./data/records".to_string()
}

//! Flat-file repositories: one JSON record file per entity id.
//!
//! Layout under the records root:
//!
//! ```text
//! <root>/folders/<uuid>.json
//! <root>/documents/<uuid>.json
//! ```
//!
//! Queries scan the record directory; this backend targets small and
//! medium trees where durability without a database server matters more
//! than lookup speed.

pub mod document;
pub mod folder;

pub use document::FlatFileDocumentRepository;
pub use folder::FlatFileFolderRepository;

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use uuid::Uuid;

use docharbor_core::error::{AppError, ErrorKind};
use docharbor_core::result::AppResult;

/// Path of the record file for an id.
fn record_path(dir: &Path, id: Uuid) -> PathBuf {
    dir.join(format!("{id}.json"))
}

/// Create the record directory if missing.
async fn ensure_dir(dir: &Path) -> AppResult<()> {
    fs::create_dir_all(dir).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to create records directory: {}", dir.display()),
            e,
        )
    })
}

/// Read one record, `None` if the file does not exist.
async fn read_record<T: DeserializeOwned>(dir: &Path, id: Uuid) -> AppResult<Option<T>> {
    let path = record_path(dir, id);
    let data = match fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read record: {}", path.display()),
                e,
            ));
        }
    };
    let record = serde_json::from_slice(&data)?;
    Ok(Some(record))
}

/// Serialize and write one record.
async fn write_record<T: Serialize>(dir: &Path, id: Uuid, record: &T) -> AppResult<()> {
    let path = record_path(dir, id);
    let data = serde_json::to_vec_pretty(record)?;
    fs::write(&path, data).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to write record: {}", path.display()),
            e,
        )
    })
}

/// Delete one record file. Returns `true` if it existed.
async fn delete_record(dir: &Path, id: Uuid) -> AppResult<bool> {
    let path = record_path(dir, id);
    match fs::remove_file(&path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to delete record: {}", path.display()),
            e,
        )),
    }
}

/// Load every record in a directory.
async fn load_all<T: DeserializeOwned>(dir: &Path) -> AppResult<Vec<T>> {
    let mut records = Vec::new();
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(records),
        Err(e) => {
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to list records: {}", dir.display()),
                e,
            ));
        }
    };

    while let Some(entry) = entries.next_entry().await.map_err(|e| {
        AppError::with_source(ErrorKind::Storage, "Failed to read record entry", e)
    })? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let data = fs::read(&path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read record: {}", path.display()),
                e,
            )
        })?;
        records.push(serde_json::from_slice(&data)?);
    }

    Ok(records)
}

/// Whether a record file exists.
async fn record_exists(dir: &Path, id: Uuid) -> bool {
    fs::try_exists(record_path(dir, id)).await.unwrap_or(false)
}

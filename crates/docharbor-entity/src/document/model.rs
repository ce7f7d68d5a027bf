//! Document entity model.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A document stored in DocHarbor.
///
/// Every document is pinned to exactly one folder. No two documents by
/// the same uploader may share a checksum (content-level dedup is scoped
/// per uploader, not global).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: Uuid,
    /// The folder owning this document.
    pub folder_id: Uuid,
    /// Display name, unique among documents in the same folder
    /// (case-insensitive).
    pub name: String,
    /// The name the upload transport originally declared.
    pub original_name: String,
    /// MIME type of the document.
    pub mime_type: Option<String>,
    /// Document size in bytes.
    pub size_bytes: i64,
    /// SHA-256 checksum of the content, used for dedup.
    pub checksum_sha256: String,
    /// The uploading user.
    pub uploaded_by: Uuid,
    /// Unordered tag set.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Arbitrary metadata (JSON object).
    pub metadata: serde_json::Value,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new document record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocument {
    /// The folder to place the document in.
    pub folder_id: Uuid,
    /// The document name.
    pub name: String,
    /// The originally declared name.
    pub original_name: String,
    /// MIME type.
    pub mime_type: Option<String>,
    /// Document size in bytes.
    pub size_bytes: i64,
    /// SHA-256 checksum.
    pub checksum_sha256: String,
    /// The uploading user.
    pub uploaded_by: Uuid,
    /// Unordered tag set.
    pub tags: BTreeSet<String>,
    /// Arbitrary metadata.
    pub metadata: serde_json::Value,
}

impl From<CreateDocument> for Document {
    fn from(record: CreateDocument) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            folder_id: record.folder_id,
            name: record.name,
            original_name: record.original_name,
            mime_type: record.mime_type,
            size_bytes: record.size_bytes,
            checksum_sha256: record.checksum_sha256,
            uploaded_by: record.uploaded_by,
            tags: record.tags,
            metadata: record.metadata,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_create_preserves_fields() {
        let record = CreateDocument {
            folder_id: Uuid::new_v4(),
            name: "report.pdf".to_string(),
            original_name: "Report Final.pdf".to_string(),
            mime_type: Some("application/pdf".to_string()),
            size_bytes: 3,
            checksum_sha256: "abc".to_string(),
            uploaded_by: Uuid::new_v4(),
            tags: BTreeSet::new(),
            metadata: serde_json::json!({}),
        };

        let document = Document::from(record.clone());
        assert_eq!(document.folder_id, record.folder_id);
        assert_eq!(document.name, record.name);
        assert_eq!(document.original_name, record.original_name);
        assert_eq!(document.checksum_sha256, record.checksum_sha256);
        assert_eq!(document.created_at, document.updated_at);
    }
}

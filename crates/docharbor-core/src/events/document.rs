//! Document-related domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to document operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DocumentEvent {
    /// A document was uploaded.
    Uploaded {
        /// The document ID.
        document_id: Uuid,
        /// The folder containing the document.
        folder_id: Uuid,
        /// The document name.
        name: String,
        /// The document size in bytes.
        size_bytes: u64,
        /// The uploader.
        uploaded_by: Uuid,
    },
    /// A document was moved to another folder.
    Moved {
        /// The document ID.
        document_id: Uuid,
        /// The source folder.
        from_folder_id: Uuid,
        /// The destination folder.
        to_folder_id: Uuid,
    },
    /// A document was deleted.
    Deleted {
        /// The document ID.
        document_id: Uuid,
        /// The document name (for display after deletion).
        name: String,
        /// The folder it was in.
        folder_id: Uuid,
    },
    /// A document was renamed.
    Renamed {
        /// The document ID.
        document_id: Uuid,
        /// The previous name.
        old_name: String,
        /// The new name.
        new_name: String,
    },
    /// A document's tags changed.
    Retagged {
        /// The document ID.
        document_id: Uuid,
        /// The new tag set.
        tags: Vec<String>,
    },
}

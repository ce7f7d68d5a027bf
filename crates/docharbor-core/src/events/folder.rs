//! Folder-related domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to folder operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FolderEvent {
    /// A folder was created.
    Created {
        /// The folder ID.
        folder_id: Uuid,
        /// The parent folder.
        parent_id: Uuid,
        /// The folder name.
        name: String,
        /// The user who created it.
        created_by: Uuid,
    },
    /// A folder was renamed.
    Renamed {
        /// The folder ID.
        folder_id: Uuid,
        /// The previous name.
        old_name: String,
        /// The new name.
        new_name: String,
    },
    /// A folder was moved to a new parent.
    Moved {
        /// The folder ID.
        folder_id: Uuid,
        /// The source parent.
        from_parent_id: Uuid,
        /// The destination parent.
        to_parent_id: Uuid,
    },
    /// A folder and its entire subtree were deleted.
    Deleted {
        /// The folder ID at the root of the delete.
        folder_id: Uuid,
        /// Total folders removed (including this one).
        folders_deleted: u64,
        /// Total documents removed.
        documents_deleted: u64,
    },
    /// A folder's visibility or permission sets changed.
    PermissionsChanged {
        /// The folder ID.
        folder_id: Uuid,
        /// The user who changed them.
        changed_by: Uuid,
    },
    /// A folder subtree was copied.
    Copied {
        /// The source folder ID.
        source_folder_id: Uuid,
        /// The newly created folder ID.
        new_folder_id: Uuid,
        /// Folders created by the copy.
        folders_copied: u64,
        /// Documents created by the copy.
        documents_copied: u64,
    },
}

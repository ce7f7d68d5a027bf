//! Folder entity model.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docharbor_core::AppError;

/// The fixed ID of the single well-known root folder.
///
/// The root always exists, has no parent, and is never deleted.
pub const ROOT_FOLDER_ID: Uuid = Uuid::nil();

/// Folder visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Any authenticated caller gets at least view access.
    Public,
    /// Access is limited to the owner and the permission sets.
    Private,
}

impl Visibility {
    /// Return the visibility as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            _ => Err(AppError::validation(format!(
                "Invalid visibility: '{s}'. Expected one of: public, private"
            ))),
        }
    }
}

/// Per-folder permission sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderPermissions {
    /// The folder owner.
    pub owner_id: Uuid,
    /// Users with read access on a private folder.
    #[serde(default)]
    pub viewers: BTreeSet<Uuid>,
    /// Users with write access.
    #[serde(default)]
    pub editors: BTreeSet<Uuid>,
}

impl FolderPermissions {
    /// Permissions with only an owner and empty member sets.
    pub fn owned_by(owner_id: Uuid) -> Self {
        Self {
            owner_id,
            viewers: BTreeSet::new(),
            editors: BTreeSet::new(),
        }
    }

    /// Check membership in the editor set.
    pub fn is_editor(&self, user_id: Uuid) -> bool {
        self.editors.contains(&user_id)
    }

    /// Check membership in the viewer set.
    pub fn is_viewer(&self, user_id: Uuid) -> bool {
        self.viewers.contains(&user_id)
    }
}

/// A folder in the document hierarchy.
///
/// The parent/child relation forms a forest rooted at the well-known
/// root folder; `path` is derived from ancestor names and recomputed on
/// every rename/move, so it is display-only, never authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// Parent folder ID (None only for the root folder).
    pub parent_id: Option<Uuid>,
    /// Folder name, unique among siblings (case-insensitive).
    pub name: String,
    /// Full materialized path (e.g., `/documents/reports`).
    pub path: String,
    /// Depth in the folder tree (0 for root).
    pub depth: i32,
    /// Folder visibility.
    pub visibility: Visibility,
    /// Owner and member permission sets.
    pub permissions: FolderPermissions,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// The well-known root folder record.
    pub fn root() -> Self {
        let now = Utc::now();
        Self {
            id: ROOT_FOLDER_ID,
            parent_id: None,
            name: String::new(),
            path: "/".to_string(),
            depth: 0,
            visibility: Visibility::Private,
            permissions: FolderPermissions::owned_by(Uuid::nil()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new folder under the given parent.
    pub fn new(
        parent: &Folder,
        name: impl Into<String>,
        visibility: Visibility,
        permissions: FolderPermissions,
    ) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            parent_id: Some(parent.id),
            path: Self::child_path(&parent.path, &name),
            depth: parent.depth + 1,
            name,
            visibility,
            permissions,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this is the root folder.
    pub fn is_root(&self) -> bool {
        self.id == ROOT_FOLDER_ID || self.parent_id.is_none()
    }

    /// The folder owner.
    pub fn owner_id(&self) -> Uuid {
        self.permissions.owner_id
    }

    /// Join a parent path and a child name into a materialized path.
    ///
    /// The root path is `/`, so joining must not produce `//name`.
    pub fn child_path(parent_path: &str, name: &str) -> String {
        if parent_path == "/" {
            format!("/{name}")
        } else {
            format!("{parent_path}/{name}")
        }
    }
}

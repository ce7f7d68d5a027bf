//! Access level enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use docharbor_core::AppError;

/// Access level a caller holds on a folder.
///
/// Ordered by capability: Owner > Edit > View > None. Every capability a
/// lower level grants is also granted by every higher level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Full control including delete, visibility, and permission changes.
    Owner,
    /// Can create, rename, move, and upload into the folder.
    Edit,
    /// Can list and read contents.
    View,
    /// No access; the folder's contents and metadata are not enumerable.
    None,
}

impl AccessLevel {
    /// Return the capability level (higher = more capable).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Owner => 3,
            Self::Edit => 2,
            Self::View => 1,
            Self::None => 0,
        }
    }

    /// Check if this level grants at least the given level.
    pub fn has_at_least(&self, required: AccessLevel) -> bool {
        self.privilege_level() >= required.privilege_level()
    }

    /// Check if this level allows read operations.
    pub fn can_read(&self) -> bool {
        self.has_at_least(Self::View)
    }

    /// Check if this level allows create/rename/move/upload operations.
    pub fn can_write(&self) -> bool {
        self.has_at_least(Self::Edit)
    }

    /// Return the level as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Edit => "edit",
            Self::View => "view",
            Self::None => "none",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "edit" => Ok(Self::Edit),
            "view" => Ok(Self::View),
            "none" => Ok(Self::None),
            _ => Err(AppError::validation(format!(
                "Invalid access level: '{s}'. Expected one of: owner, edit, view, none"
            ))),
        }
    }
}

//! Access level resolution for folders and documents.
//!
//! Resolution order (first match wins):
//! 1. The folder owner gets `owner`.
//! 2. On a public folder, members of `editors` get `edit`, everyone
//!    else gets `view`.
//! 3. On a private folder, `editors` get `edit`, `viewers` get `view`,
//!    everyone else gets `none`.
//!
//! Admin bypass lives in [`authorize`], not in [`resolve`]: the nominal
//! level is what display surfaces report, while lifecycle operations
//! treat an admin as owner-equivalent everywhere.

use docharbor_core::{AppError, AppResult};
use docharbor_entity::document::Document;
use docharbor_entity::folder::{Folder, Visibility};
use docharbor_entity::permission::AccessLevel;
use uuid::Uuid;

use crate::context::RequestContext;

/// Resolve the nominal access level a caller holds on a folder.
///
/// Pure function over the folder's visibility and permission sets.
pub fn resolve(folder: &Folder, caller_id: Uuid) -> AccessLevel {
    if folder.is_root() {
        // The root is a shared namespace: every authenticated caller
        // may list it and create under it; nobody owns it, and the
        // operations an owner would unlock (delete, move, rename,
        // permission changes) are rejected for the root upstream.
        return AccessLevel::Edit;
    }
    if folder.owner_id() == caller_id {
        return AccessLevel::Owner;
    }

    match folder.visibility {
        Visibility::Public => {
            if folder.permissions.is_editor(caller_id) {
                AccessLevel::Edit
            } else {
                AccessLevel::View
            }
        }
        Visibility::Private => {
            if folder.permissions.is_editor(caller_id) {
                AccessLevel::Edit
            } else if folder.permissions.is_viewer(caller_id) {
                AccessLevel::View
            } else {
                AccessLevel::None
            }
        }
    }
}

/// Require at least the given access level, with admin bypass.
///
/// Returns the effective level on success (admins report `owner`).
pub fn authorize(
    ctx: &RequestContext,
    folder: &Folder,
    required: AccessLevel,
) -> AppResult<AccessLevel> {
    if ctx.is_admin() {
        return Ok(AccessLevel::Owner);
    }

    let level = resolve(folder, ctx.user_id);
    if level.has_at_least(required) {
        Ok(level)
    } else {
        Err(AppError::forbidden(format!(
            "Access level '{level}' is insufficient; '{required}' required"
        )))
    }
}

/// Whether a caller may delete a document.
///
/// The union of: caller is admin; caller uploaded the document; caller
/// has edit or owner access on the document's current folder.
pub fn document_delete_allowed(
    ctx: &RequestContext,
    document: &Document,
    folder: &Folder,
) -> bool {
    if ctx.is_admin() || document.uploaded_by == ctx.user_id {
        return true;
    }
    resolve(folder, ctx.user_id).can_write()
}

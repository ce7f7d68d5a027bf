//! Name validation shared by folder and document operations.

use docharbor_core::{AppError, AppResult};

/// Maximum display-name length in characters.
const MAX_NAME_CHARS: usize = 255;

/// Validate a folder or document display name.
pub(crate) fn name(name: &str, what: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation(format!("{what} name cannot be empty")));
    }
    if name.contains('/') {
        return Err(AppError::validation(format!(
            "{what} name cannot contain '/'"
        )));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::validation(format!(
            "{what} name exceeds {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(())
}

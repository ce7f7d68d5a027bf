//! Folder entities.

pub mod model;

pub use model::{Folder, FolderPermissions, ROOT_FOLDER_ID, Visibility};

//! Folder tree operations.

pub mod service;
pub mod tree;

pub use service::{
    CopyFolderOutcome, CreateFolderRequest, DeleteFolderOutcome, FolderService,
    SetPermissionsRequest,
};

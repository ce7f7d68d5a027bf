//! Storage-agnostic repository traits for folder and document records.

use std::collections::BTreeSet;

use async_trait::async_trait;
use uuid::Uuid;

use docharbor_core::AppResult;
use docharbor_entity::document::Document;
use docharbor_entity::folder::Folder;

/// Repository for folder records.
///
/// Name lookups are case-insensitive, matching the sibling-uniqueness
/// rule enforced by the service layer.
#[async_trait]
pub trait FolderRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new folder record. Fails if the id already exists.
    async fn insert(&self, folder: &Folder) -> AppResult<()>;

    /// Replace an existing folder record. Fails if the id is missing.
    async fn update(&self, folder: &Folder) -> AppResult<()>;

    /// Delete a folder record. Returns `true` if a record was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Find a folder by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>>;

    /// List direct children of a folder, ordered by name.
    async fn find_children(&self, parent_id: Uuid) -> AppResult<Vec<Folder>>;

    /// Find a direct child by name (case-insensitive).
    async fn find_child_by_name(&self, parent_id: Uuid, name: &str)
    -> AppResult<Option<Folder>>;

    /// Count all folder records.
    async fn count(&self) -> AppResult<u64>;
}

/// Repository for document records.
#[async_trait]
pub trait DocumentRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new document record. Fails if the id already exists.
    async fn insert(&self, document: &Document) -> AppResult<()>;

    /// Replace an existing document record. Fails if the id is missing.
    async fn update(&self, document: &Document) -> AppResult<()>;

    /// Delete a document record. Returns `true` if a record was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Find a document by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>>;

    /// List documents directly owned by a folder, ordered by name.
    async fn find_by_folder(&self, folder_id: Uuid) -> AppResult<Vec<Document>>;

    /// Find a document in a folder by name (case-insensitive).
    async fn find_by_folder_and_name(
        &self,
        folder_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Document>>;

    /// Find a document by uploader and checksum (dedup lookup; scoped per
    /// uploader across the whole tree).
    async fn find_by_uploader_and_checksum(
        &self,
        uploaded_by: Uuid,
        checksum: &str,
    ) -> AppResult<Option<Document>>;

    /// All checksums currently owned by an uploader.
    async fn checksums_by_uploader(&self, uploaded_by: Uuid) -> AppResult<BTreeSet<String>>;

    /// Count all document records.
    async fn count(&self) -> AppResult<u64>;
}

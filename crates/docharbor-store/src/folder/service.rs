//! Folder lifecycle operations.
//!
//! Structural mutations (create, rename, move, recursive delete, copy
//! commit) run under the exclusive side of the tree lock so cycle
//! detection and path cascades always see a consistent tree. Blob I/O
//! for `copy_folder` happens with no lock held, between a snapshot
//! phase and a commit phase.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use docharbor_core::events::FolderEvent;
use docharbor_core::traits::{AuditSink, BlobStore};
use docharbor_core::{AppError, AppResult};
use docharbor_entity::document::Document;
use docharbor_entity::folder::{Folder, FolderPermissions, Visibility};
use docharbor_entity::permission::AccessLevel;
use docharbor_records::{DocumentRepository, FolderRepository};

use crate::access;
use crate::context::RequestContext;
use crate::document::service::blob_key;
use crate::folder::tree;
use crate::locks::TreeLock;
use crate::reservations::UploadReservations;
use crate::validate;

/// Parameters for creating a folder.
///
/// The caller always becomes the owner; `viewers` and `editors` seed
/// the permission sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// The parent folder.
    pub parent_id: Uuid,
    /// The new folder's name.
    pub name: String,
    /// Folder visibility.
    pub visibility: Visibility,
    /// Initial viewer set.
    #[serde(default)]
    pub viewers: std::collections::BTreeSet<Uuid>,
    /// Initial editor set.
    #[serde(default)]
    pub editors: std::collections::BTreeSet<Uuid>,
}

/// Parameters for changing a folder's visibility or permission sets.
///
/// `None` fields are left unchanged. Replacing `permissions` wholesale
/// permits ownership transfer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetPermissionsRequest {
    /// New visibility, if changing.
    pub visibility: Option<Visibility>,
    /// New permission sets, if changing.
    pub permissions: Option<FolderPermissions>,
}

/// Aggregate counts returned by a recursive folder delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFolderOutcome {
    /// Folders removed, including the operation root.
    pub folders_deleted: u64,
    /// Documents removed across the whole subtree.
    pub documents_deleted: u64,
}

/// Result of a recursive folder copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyFolderOutcome {
    /// The newly created copy root.
    pub new_folder: Folder,
    /// Folders created, including the copy root.
    pub folders_copied: u64,
    /// Documents created.
    pub documents_copied: u64,
    /// Documents skipped because the caller already owns identical
    /// content.
    pub documents_skipped: u64,
}

/// A document staged for copy: its new identity plus the source record.
struct StagedCopy {
    new_id: Uuid,
    key: String,
    source: Document,
}

/// Service for folder tree operations.
#[derive(Clone)]
pub struct FolderService {
    folders: Arc<dyn FolderRepository>,
    documents: Arc<dyn DocumentRepository>,
    blobs: Arc<dyn BlobStore>,
    lock: TreeLock,
    reservations: Arc<UploadReservations>,
    audit: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for FolderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderService").finish_non_exhaustive()
    }
}

impl FolderService {
    /// Create a new folder service.
    pub fn new(
        folders: Arc<dyn FolderRepository>,
        documents: Arc<dyn DocumentRepository>,
        blobs: Arc<dyn BlobStore>,
        lock: TreeLock,
        reservations: Arc<UploadReservations>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            folders,
            documents,
            blobs,
            lock,
            reservations,
            audit,
        }
    }

    async fn require_folder(&self, id: Uuid) -> AppResult<Folder> {
        self.folders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))
    }

    fn parent_of(folder: &Folder) -> AppResult<Uuid> {
        folder
            .parent_id
            .ok_or_else(|| AppError::internal("Non-root folder without a parent"))
    }

    /// Create a folder under `parent_id`. The caller becomes the owner.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        request: CreateFolderRequest,
    ) -> AppResult<Folder> {
        validate::name(&request.name, "Folder")?;

        let _guard = self.lock.write().await;

        let parent = self.require_folder(request.parent_id).await?;
        access::authorize(ctx, &parent, AccessLevel::Edit)?;

        if self
            .folders
            .find_child_by_name(parent.id, &request.name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "A folder named '{}' already exists here",
                request.name
            )));
        }

        let permissions = FolderPermissions {
            owner_id: ctx.user_id,
            viewers: request.viewers,
            editors: request.editors,
        };
        let folder = Folder::new(&parent, request.name, request.visibility, permissions);
        self.folders.insert(&folder).await?;

        info!(folder_id = %folder.id, path = %folder.path, "Folder created");
        self.audit.record(
            &FolderEvent::Created {
                folder_id: folder.id,
                parent_id: parent.id,
                name: folder.name.clone(),
                created_by: ctx.user_id,
            }
            .into(),
        );

        Ok(folder)
    }

    /// Rename a folder and cascade the path recompute to every
    /// descendant.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        new_name: &str,
    ) -> AppResult<Folder> {
        validate::name(new_name, "Folder")?;

        let _guard = self.lock.write().await;

        let mut folder = self.require_folder(folder_id).await?;
        if folder.is_root() {
            return Err(AppError::invalid_operation(
                "The root folder cannot be renamed",
            ));
        }
        access::authorize(ctx, &folder, AccessLevel::Edit)?;

        let parent_id = Self::parent_of(&folder)?;
        if let Some(existing) = self.folders.find_child_by_name(parent_id, new_name).await?
            && existing.id != folder.id
        {
            return Err(AppError::conflict(format!(
                "A folder named '{new_name}' already exists here"
            )));
        }

        let parent = self.require_folder(parent_id).await?;
        let old_name = std::mem::replace(&mut folder.name, new_name.to_string());
        folder.path = Folder::child_path(&parent.path, &folder.name);
        folder.updated_at = chrono::Utc::now();
        self.folders.update(&folder).await?;
        tree::recompute_subtree_paths(self.folders.as_ref(), &folder).await?;

        info!(folder_id = %folder.id, old_name = %old_name, new_name = %folder.name, "Folder renamed");
        self.audit.record(
            &FolderEvent::Renamed {
                folder_id: folder.id,
                old_name,
                new_name: folder.name.clone(),
            }
            .into(),
        );

        Ok(folder)
    }

    /// Move a folder under a new parent.
    ///
    /// Rejects moves that would create a cycle: the destination must
    /// not be the folder itself or any of its descendants, checked by
    /// walking upward from the destination before committing.
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        new_parent_id: Uuid,
    ) -> AppResult<Folder> {
        let _guard = self.lock.write().await;

        let mut folder = self.require_folder(folder_id).await?;
        if folder.is_root() {
            return Err(AppError::invalid_operation(
                "The root folder cannot be moved",
            ));
        }
        let target = self.require_folder(new_parent_id).await?;

        access::authorize(ctx, &folder, AccessLevel::Edit)?;
        access::authorize(ctx, &target, AccessLevel::Edit)?;

        if new_parent_id == folder.id
            || tree::is_ancestor(self.folders.as_ref(), folder.id, new_parent_id).await?
        {
            return Err(AppError::invalid_operation(
                "Moving the folder here would create a cycle",
            ));
        }

        if let Some(existing) = self
            .folders
            .find_child_by_name(target.id, &folder.name)
            .await?
            && existing.id != folder.id
        {
            return Err(AppError::conflict(format!(
                "A folder named '{}' already exists at the destination",
                folder.name
            )));
        }

        let from_parent_id = Self::parent_of(&folder)?;
        folder.parent_id = Some(target.id);
        folder.path = Folder::child_path(&target.path, &folder.name);
        folder.depth = target.depth + 1;
        folder.updated_at = chrono::Utc::now();
        self.folders.update(&folder).await?;
        tree::recompute_subtree_paths(self.folders.as_ref(), &folder).await?;

        info!(folder_id = %folder.id, path = %folder.path, "Folder moved");
        self.audit.record(
            &FolderEvent::Moved {
                folder_id: folder.id,
                from_parent_id,
                to_parent_id: target.id,
            }
            .into(),
        );

        Ok(folder)
    }

    /// Change a folder's visibility and/or permission sets. Owner or
    /// admin only.
    pub async fn set_folder_permissions(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        request: SetPermissionsRequest,
    ) -> AppResult<Folder> {
        let _guard = self.lock.write().await;

        let mut folder = self.require_folder(folder_id).await?;
        if folder.is_root() {
            return Err(AppError::invalid_operation(
                "The root folder's permissions cannot be changed",
            ));
        }
        access::authorize(ctx, &folder, AccessLevel::Owner)?;

        if let Some(visibility) = request.visibility {
            folder.visibility = visibility;
        }
        if let Some(permissions) = request.permissions {
            folder.permissions = permissions;
        }
        folder.updated_at = chrono::Utc::now();
        self.folders.update(&folder).await?;

        info!(folder_id = %folder.id, visibility = %folder.visibility, "Folder permissions changed");
        self.audit.record(
            &FolderEvent::PermissionsChanged {
                folder_id: folder.id,
                changed_by: ctx.user_id,
            }
            .into(),
        );

        Ok(folder)
    }

    /// List the direct child folders visible to the caller.
    ///
    /// A caller with no access gets an empty list rather than an error,
    /// so a private folder's contents are not enumerable; a missing
    /// folder is still `NotFound`.
    pub async fn list_children(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> AppResult<Vec<Folder>> {
        let _guard = self.lock.read().await;

        let folder = self.require_folder(folder_id).await?;
        if !ctx.is_admin() && !access::resolve(&folder, ctx.user_id).can_read() {
            return Ok(Vec::new());
        }

        self.folders.find_children(folder.id).await
    }

    /// The breadcrumb chain from the root to the folder, inclusive.
    pub async fn folder_path(&self, folder_id: Uuid) -> AppResult<Vec<Folder>> {
        let _guard = self.lock.read().await;
        tree::path_to(self.folders.as_ref(), folder_id).await
    }

    /// Recursively delete a folder, its descendant folders, and every
    /// document any of them owns.
    ///
    /// Authorization happens once, at the operation root. Catalog
    /// records go first, children before parents; blob bytes are
    /// removed best-effort after the lock is released, since a dangling
    /// blob is reclaimable while a record pointing at missing bytes is
    /// not.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> AppResult<DeleteFolderOutcome> {
        let guard = self.lock.write().await;

        let folder = self.require_folder(folder_id).await?;
        if folder.is_root() {
            return Err(AppError::invalid_operation(
                "The root folder cannot be deleted",
            ));
        }
        access::authorize(ctx, &folder, AccessLevel::Owner)?;

        let subtree = tree::collect_subtree(self.folders.as_ref(), &folder).await?;

        let mut folders_deleted = 0u64;
        let mut documents_deleted = 0u64;
        let mut orphaned_keys = Vec::new();

        for node in subtree.iter().rev() {
            for document in self.documents.find_by_folder(node.id).await? {
                self.documents.delete(document.id).await?;
                orphaned_keys.push(blob_key(document.id));
                documents_deleted += 1;
            }
            self.folders.delete(node.id).await?;
            folders_deleted += 1;
        }

        drop(guard);

        for key in orphaned_keys {
            if let Err(e) = self.blobs.delete(&key).await {
                warn!(key = %key, error = %e, "Failed to delete blob for removed document");
            }
        }

        info!(
            folder_id = %folder.id,
            folders_deleted,
            documents_deleted,
            "Folder subtree deleted"
        );
        self.audit.record(
            &FolderEvent::Deleted {
                folder_id: folder.id,
                folders_deleted,
                documents_deleted,
            }
            .into(),
        );

        Ok(DeleteFolderOutcome {
            folders_deleted,
            documents_deleted,
        })
    }

    /// Recursively copy a folder subtree under a new parent.
    ///
    /// The copy gets fresh IDs throughout and the caller becomes the
    /// owner of every copied folder; visibility and member sets carry
    /// over. Document bytes are duplicated under new blob keys, never
    /// shared by reference, so the per-uploader checksum invariant
    /// holds for the new owner. Documents whose content the caller
    /// already owns are skipped and counted.
    ///
    /// Runs in three phases: snapshot under the shared lock, blob
    /// duplication with no lock held, then commit under the exclusive
    /// lock with re-validation.
    pub async fn copy_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        target_parent_id: Uuid,
        new_name: Option<String>,
    ) -> AppResult<CopyFolderOutcome> {
        if let Some(name) = &new_name {
            validate::name(name, "Folder")?;
        }

        // Phase 1: validate and snapshot the source subtree.
        let (source, target, copy_name, subtree, source_documents, mut owned_checksums) = {
            let _guard = self.lock.read().await;

            let source = self.require_folder(folder_id).await?;
            if source.is_root() {
                return Err(AppError::invalid_operation(
                    "The root folder cannot be copied",
                ));
            }
            let target = self.require_folder(target_parent_id).await?;

            access::authorize(ctx, &source, AccessLevel::View)?;
            access::authorize(ctx, &target, AccessLevel::Edit)?;

            if target.id == source.id
                || tree::is_ancestor(self.folders.as_ref(), source.id, target.id).await?
            {
                return Err(AppError::invalid_operation(
                    "A folder cannot be copied into its own subtree",
                ));
            }

            let copy_name = new_name.unwrap_or_else(|| source.name.clone());
            if self
                .folders
                .find_child_by_name(target.id, &copy_name)
                .await?
                .is_some()
            {
                return Err(AppError::conflict(format!(
                    "A folder named '{copy_name}' already exists at the destination"
                )));
            }

            let subtree = tree::collect_subtree(self.folders.as_ref(), &source).await?;
            let mut source_documents = Vec::new();
            for node in &subtree {
                for document in self.documents.find_by_folder(node.id).await? {
                    source_documents.push(document);
                }
            }
            let owned_checksums = self.documents.checksums_by_uploader(ctx.user_id).await?;

            (
                source,
                target,
                copy_name,
                subtree,
                source_documents,
                owned_checksums,
            )
        };

        // Phase 2: duplicate bytes with no lock held. Content the
        // caller already owns (including earlier documents within this
        // same copy) is skipped up front.
        let mut staged: Vec<StagedCopy> = Vec::new();
        let mut documents_skipped = 0u64;

        for document in source_documents {
            if owned_checksums.contains(&document.checksum_sha256) {
                documents_skipped += 1;
                continue;
            }

            let bytes = match self.blobs.get(&blob_key(document.id)).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    self.discard_staged(&staged).await;
                    return Err(e);
                }
            };

            let new_id = Uuid::new_v4();
            let key = blob_key(new_id);
            if let Err(e) = self.blobs.put(&key, bytes).await {
                self.discard_staged(&staged).await;
                return Err(e);
            }

            owned_checksums.insert(document.checksum_sha256.clone());
            staged.push(StagedCopy {
                new_id,
                key,
                source: document,
            });
        }

        // Phase 3: commit under the exclusive lock, re-validating what
        // may have changed while bytes were being written.
        let guard = self.lock.write().await;

        let target = match self.folders.find_by_id(target.id).await? {
            Some(target) => target,
            None => {
                drop(guard);
                self.discard_staged(&staged).await;
                return Err(AppError::not_found("Destination folder no longer exists"));
            }
        };
        if self
            .folders
            .find_child_by_name(target.id, &copy_name)
            .await?
            .is_some()
        {
            drop(guard);
            self.discard_staged(&staged).await;
            return Err(AppError::conflict(format!(
                "A folder named '{copy_name}' already exists at the destination"
            )));
        }

        // Old folder id -> freshly created copy.
        let mut copies: HashMap<Uuid, Folder> = HashMap::new();
        let mut folders_copied = 0u64;

        for node in &subtree {
            let copy = if node.id == source.id {
                let permissions = FolderPermissions {
                    owner_id: ctx.user_id,
                    viewers: node.permissions.viewers.clone(),
                    editors: node.permissions.editors.clone(),
                };
                Folder::new(&target, copy_name.clone(), node.visibility, permissions)
            } else {
                let parent_id = Self::parent_of(node)?;
                let new_parent = copies.get(&parent_id).ok_or_else(|| {
                    AppError::internal("Subtree copy visited a child before its parent")
                })?;
                let permissions = FolderPermissions {
                    owner_id: ctx.user_id,
                    viewers: node.permissions.viewers.clone(),
                    editors: node.permissions.editors.clone(),
                };
                Folder::new(new_parent, node.name.clone(), node.visibility, permissions)
            };
            self.folders.insert(&copy).await?;
            folders_copied += 1;
            copies.insert(node.id, copy);
        }

        let mut documents_copied = 0u64;
        let mut discarded = Vec::new();

        for stage in &staged {
            // Another upload may have landed identical content for the
            // caller while the lock was released.
            let duplicate = self
                .documents
                .find_by_uploader_and_checksum(ctx.user_id, &stage.source.checksum_sha256)
                .await?
                .is_some()
                || self
                    .reservations
                    .checksum_reserved(ctx.user_id, &stage.source.checksum_sha256);
            if duplicate {
                documents_skipped += 1;
                discarded.push(stage.key.clone());
                continue;
            }

            let new_folder = copies.get(&stage.source.folder_id).ok_or_else(|| {
                AppError::internal("Staged document references a folder outside the copied subtree")
            })?;
            let now = chrono::Utc::now();
            let document = Document {
                id: stage.new_id,
                folder_id: new_folder.id,
                name: stage.source.name.clone(),
                original_name: stage.source.original_name.clone(),
                mime_type: stage.source.mime_type.clone(),
                size_bytes: stage.source.size_bytes,
                checksum_sha256: stage.source.checksum_sha256.clone(),
                uploaded_by: ctx.user_id,
                tags: stage.source.tags.clone(),
                metadata: stage.source.metadata.clone(),
                created_at: now,
                updated_at: now,
            };
            self.documents.insert(&document).await?;
            documents_copied += 1;
        }

        let new_folder = copies.remove(&source.id).ok_or_else(|| {
            AppError::internal("Copied subtree is missing its own root")
        })?;

        drop(guard);

        for key in discarded {
            if let Err(e) = self.blobs.delete(&key).await {
                warn!(key = %key, error = %e, "Failed to delete discarded copy blob");
            }
        }

        info!(
            source_folder_id = %source.id,
            new_folder_id = %new_folder.id,
            folders_copied,
            documents_copied,
            documents_skipped,
            "Folder subtree copied"
        );
        self.audit.record(
            &FolderEvent::Copied {
                source_folder_id: source.id,
                new_folder_id: new_folder.id,
                folders_copied,
                documents_copied,
            }
            .into(),
        );

        Ok(CopyFolderOutcome {
            new_folder,
            folders_copied,
            documents_copied,
            documents_skipped,
        })
    }

    /// Best-effort removal of blobs staged by an aborted copy.
    async fn discard_staged(&self, staged: &[StagedCopy]) {
        for stage in staged {
            if let Err(e) = self.blobs.delete(&stage.key).await {
                warn!(key = %stage.key, error = %e, "Failed to delete staged copy blob");
            }
        }
    }
}

//! Flat-file folder repository.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use docharbor_core::{AppError, AppResult};
use docharbor_entity::folder::Folder;

use crate::repository::FolderRepository;

use super::{delete_record, ensure_dir, load_all, read_record, record_exists, write_record};

/// Folder repository writing one JSON file per folder record.
#[derive(Debug, Clone)]
pub struct FlatFileFolderRepository {
    /// Directory holding the folder record files.
    dir: PathBuf,
}

impl FlatFileFolderRepository {
    /// Create a repository rooted at `<records_root>/folders`.
    pub async fn new(records_root: &str) -> AppResult<Self> {
        let dir = PathBuf::from(records_root).join("folders");
        ensure_dir(&dir).await?;
        Ok(Self { dir })
    }
}

#[async_trait]
impl FolderRepository for FlatFileFolderRepository {
    async fn insert(&self, folder: &Folder) -> AppResult<()> {
        if record_exists(&self.dir, folder.id).await {
            return Err(AppError::internal(format!(
                "Folder record {} already exists",
                folder.id
            )));
        }
        write_record(&self.dir, folder.id, folder).await
    }

    async fn update(&self, folder: &Folder) -> AppResult<()> {
        if !record_exists(&self.dir, folder.id).await {
            return Err(AppError::not_found(format!(
                "Folder record {} not found",
                folder.id
            )));
        }
        write_record(&self.dir, folder.id, folder).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        delete_record(&self.dir, id).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        read_record(&self.dir, id).await
    }

    async fn find_children(&self, parent_id: Uuid) -> AppResult<Vec<Folder>> {
        let mut children: Vec<Folder> = load_all::<Folder>(&self.dir)
            .await?
            .into_iter()
            .filter(|folder| folder.parent_id == Some(parent_id))
            .collect();
        children.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(children)
    }

    async fn find_child_by_name(
        &self,
        parent_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        let lower = name.to_lowercase();
        Ok(load_all::<Folder>(&self.dir)
            .await?
            .into_iter()
            .find(|folder| {
                folder.parent_id == Some(parent_id) && folder.name.to_lowercase() == lower
            }))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(load_all::<Folder>(&self.dir).await?.len() as u64)
    }
}

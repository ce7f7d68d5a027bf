//! In-memory folder repository.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use docharbor_core::{AppError, AppResult};
use docharbor_entity::folder::Folder;

use crate::repository::FolderRepository;

/// In-memory folder repository backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryFolderRepository {
    /// Folder records keyed by id.
    folders: DashMap<Uuid, Folder>,
}

impl MemoryFolderRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FolderRepository for MemoryFolderRepository {
    async fn insert(&self, folder: &Folder) -> AppResult<()> {
        if self.folders.contains_key(&folder.id) {
            return Err(AppError::internal(format!(
                "Folder record {} already exists",
                folder.id
            )));
        }
        self.folders.insert(folder.id, folder.clone());
        Ok(())
    }

    async fn update(&self, folder: &Folder) -> AppResult<()> {
        match self.folders.get_mut(&folder.id) {
            Some(mut entry) => {
                *entry = folder.clone();
                Ok(())
            }
            None => Err(AppError::not_found(format!(
                "Folder record {} not found",
                folder.id
            ))),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.folders.remove(&id).is_some())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        Ok(self.folders.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_children(&self, parent_id: Uuid) -> AppResult<Vec<Folder>> {
        let mut children: Vec<Folder> = self
            .folders
            .iter()
            .filter(|entry| entry.parent_id == Some(parent_id))
            .map(|entry| entry.value().clone())
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
        Ok(self
            .folders
            .iter()
            .find(|entry| {
                entry.parent_id == Some(parent_id) && entry.name.to_lowercase() == lower
            })
            .map(|entry| entry.value().clone()))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.folders.len() as u64)
    }
}

//! Tree walks: ancestry, breadcrumbs, subtree collection, and the
//! cascading path recompute.
//!
//! All walks run against the flat folder record collection and rely on
//! the structure being acyclic by construction; callers hold the tree
//! lock for the duration of a walk.

use std::collections::VecDeque;

use chrono::Utc;
use uuid::Uuid;

use docharbor_core::{AppError, AppResult};
use docharbor_entity::folder::Folder;
use docharbor_records::FolderRepository;

/// Check whether `candidate` is an ancestor of `node`.
///
/// Walks from `node` up through `parent_id` links; O(depth). This is
/// the cycle defense for `move`: a folder may not be moved under itself
/// or under any of its descendants.
pub async fn is_ancestor(
    repo: &dyn FolderRepository,
    candidate: Uuid,
    node: Uuid,
) -> AppResult<bool> {
    let mut current = node;
    loop {
        let Some(folder) = repo.find_by_id(current).await? else {
            return Ok(false);
        };
        match folder.parent_id {
            Some(parent_id) => {
                if parent_id == candidate {
                    return Ok(true);
                }
                current = parent_id;
            }
            None => return Ok(false),
        }
    }
}

/// The ordered folder chain from the root to the given folder,
/// inclusive. Terminates because the structure is acyclic.
pub async fn path_to(repo: &dyn FolderRepository, id: Uuid) -> AppResult<Vec<Folder>> {
    let mut chain = Vec::new();
    let mut current = Some(id);

    while let Some(folder_id) = current {
        let folder = repo
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        current = folder.parent_id;
        chain.push(folder);
    }

    chain.reverse();
    Ok(chain)
}

/// Collect a folder's subtree breadth-first, parents before children.
/// The result starts with `root` itself.
///
/// Uses an explicit worklist rather than call-stack recursion so very
/// deep trees cannot exhaust the stack.
pub async fn collect_subtree(
    repo: &dyn FolderRepository,
    root: &Folder,
) -> AppResult<Vec<Folder>> {
    let mut result = vec![root.clone()];
    let mut queue = VecDeque::from([root.id]);

    while let Some(folder_id) = queue.pop_front() {
        for child in repo.find_children(folder_id).await? {
            queue.push_back(child.id);
            result.push(child);
        }
    }

    Ok(result)
}

/// Recompute the materialized `path` (and `depth`) of every descendant
/// of `root` after a rename or move. `root` itself must already carry
/// its new path.
///
/// Walks the subtree exactly once; each descendant record is rewritten
/// at most once regardless of how many ancestors changed.
pub async fn recompute_subtree_paths(
    repo: &dyn FolderRepository,
    root: &Folder,
) -> AppResult<u64> {
    let mut updated = 0u64;
    let mut queue = VecDeque::from([(root.id, root.path.clone(), root.depth)]);

    while let Some((parent_id, parent_path, parent_depth)) = queue.pop_front() {
        for mut child in repo.find_children(parent_id).await? {
            child.path = Folder::child_path(&parent_path, &child.name);
            child.depth = parent_depth + 1;
            child.updated_at = Utc::now();
            repo.update(&child).await?;
            updated += 1;
            queue.push_back((child.id, child.path.clone(), child.depth));
        }
    }

    Ok(updated)
}

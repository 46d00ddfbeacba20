//! Derived folder relationships.
//!
//! Nothing here is cached: every call walks the store's current collections,
//! so results can never go stale after a mutation. Walks that follow parent
//! links keep a visited set and stop with [`UrbrainError::CycleDetected`]
//! instead of looping.

use crate::entities::EntityStore;
use crate::error::{Result, UrbrainError};
use crate::model::{Folder, FolderId};
use std::collections::HashSet;

#[derive(Clone, Copy)]
pub struct Hierarchy<'a> {
    store: &'a EntityStore,
}

impl<'a> Hierarchy<'a> {
    pub fn new(store: &'a EntityStore) -> Self {
        Self { store }
    }

    pub fn direct_children(&self, id: FolderId) -> Vec<&'a Folder> {
        self.store
            .folders()
            .iter()
            .filter(|f| f.parent_id == Some(id))
            .collect()
    }

    pub fn root_folders(&self) -> Vec<&'a Folder> {
        self.store.folders().iter().filter(|f| f.is_root()).collect()
    }

    /// Direct subfolders plus direct notes. Grandchildren are not counted.
    pub fn item_count(&self, id: FolderId) -> usize {
        let subfolders = self
            .store
            .folders()
            .iter()
            .filter(|f| f.parent_id == Some(id))
            .count();
        let notes = self
            .store
            .notes()
            .iter()
            .filter(|n| n.folder_id == id)
            .count();
        subfolders + notes
    }

    /// All folders below `id`, depth-first pre-order, siblings in store order.
    pub fn descendant_folder_ids(&self, id: FolderId) -> Result<Vec<FolderId>> {
        let mut out = Vec::new();
        let mut visited = HashSet::from([id]);
        self.collect_descendants(id, &mut visited, &mut out)?;
        Ok(out)
    }

    fn collect_descendants(
        &self,
        id: FolderId,
        visited: &mut HashSet<FolderId>,
        out: &mut Vec<FolderId>,
    ) -> Result<()> {
        for child in self.direct_children(id) {
            if !visited.insert(child.id) {
                return Err(UrbrainError::CycleDetected(child.id));
            }
            out.push(child.id);
            self.collect_descendants(child.id, visited, out)?;
        }
        Ok(())
    }

    /// Root-to-`id` path, inclusive. A parent link that resolves to nothing
    /// ends the trail early; an unknown `id` gives an empty trail.
    pub fn breadcrumb_trail(&self, id: FolderId) -> Result<Vec<&'a Folder>> {
        let mut trail = Vec::new();
        let mut visited = HashSet::new();
        let mut current = self.store.folder(id);

        while let Some(folder) = current {
            if !visited.insert(folder.id) {
                return Err(UrbrainError::CycleDetected(folder.id));
            }
            trail.push(folder);
            current = folder.parent_id.and_then(|p| self.store.folder(p));
        }

        trail.reverse();
        Ok(trail)
    }
}

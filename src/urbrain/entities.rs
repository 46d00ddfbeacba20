//! # Entity Store
//!
//! Owns the folder and note collections. Both are kept as ordered `Vec`s (the
//! order is the creation order and is what listings and persistence see) plus
//! an id → position map. Every insert and removal goes through this module so
//! the maps never drift from the vectors.
//!
//! The store knows nothing about tabs, rendering or persistence: callers read
//! the collections back out and decide what to save.

use crate::error::{Result, UrbrainError};
use crate::hierarchy::Hierarchy;
use crate::model::{Folder, FolderId, Note, NoteId};
use chrono::Utc;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed { previous: String },
    Unchanged,
}

/// Everything removed by a cascading folder delete. `folders[0]` is the
/// requested folder, followed by its descendants in pre-order.
#[derive(Debug, Clone, Default)]
pub struct CascadeReport {
    pub folders: Vec<Folder>,
    pub notes: Vec<Note>,
}

impl CascadeReport {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.notes.is_empty()
    }

    pub fn folder_ids(&self) -> HashSet<FolderId> {
        self.folders.iter().map(|f| f.id).collect()
    }

    pub fn note_ids(&self) -> HashSet<NoteId> {
        self.notes.iter().map(|n| n.id).collect()
    }
}

/// A problem found in loaded data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    OrphanNote { note: NoteId, folder: FolderId },
    DanglingParent { folder: FolderId, parent: FolderId },
    ParentCycle { folder: FolderId },
    /// Not on a cycle itself, but one of its ancestors is.
    BelowCycle { folder: FolderId, ancestor: FolderId },
}

impl std::fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityIssue::OrphanNote { note, folder } => {
                write!(f, "note {} points at missing folder {}", note, folder)
            }
            IntegrityIssue::DanglingParent { folder, parent } => {
                write!(f, "folder {} points at missing parent {}", folder, parent)
            }
            IntegrityIssue::ParentCycle { folder } => {
                write!(f, "folder {} is its own ancestor", folder)
            }
            IntegrityIssue::BelowCycle { folder, ancestor } => {
                write!(
                    f,
                    "folder {} hangs below a parent cycle through {}",
                    folder, ancestor
                )
            }
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct EntityStore {
    folders: Vec<Folder>,
    notes: Vec<Note>,
    folder_pos: HashMap<FolderId, usize>,
    note_pos: HashMap<NoteId, usize>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from loaded collections. Records with an id seen
    /// earlier in the same collection are dropped.
    pub fn from_parts(folders: Vec<Folder>, notes: Vec<Note>) -> Self {
        let mut store = Self::new();
        for folder in folders {
            if store.folder_pos.contains_key(&folder.id) {
                tracing::warn!(id = %folder.id, "dropping duplicate folder record");
                continue;
            }
            store.folder_pos.insert(folder.id, store.folders.len());
            store.folders.push(folder);
        }
        for note in notes {
            if store.note_pos.contains_key(&note.id) {
                tracing::warn!(id = %note.id, "dropping duplicate note record");
                continue;
            }
            store.note_pos.insert(note.id, store.notes.len());
            store.notes.push(note);
        }
        store
    }

    // --- Lookups ---

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folder_pos.get(&id).map(|&i| &self.folders[i])
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.note_pos.get(&id).map(|&i| &self.notes[i])
    }

    pub fn notes_in_folder(&self, id: FolderId) -> Vec<&Note> {
        self.notes.iter().filter(|n| n.folder_id == id).collect()
    }

    pub fn hierarchy(&self) -> Hierarchy<'_> {
        Hierarchy::new(self)
    }

    // --- Folders ---

    pub fn create_folder(&mut self, name: &str, parent_id: Option<FolderId>) -> Result<Folder> {
        let name = validate_name(name, "Folder name cannot be empty")?;
        if let Some(parent) = parent_id {
            if self.folder(parent).is_none() {
                return Err(UrbrainError::FolderNotFound(parent));
            }
        }

        let folder = Folder::new(name, parent_id);
        self.folder_pos.insert(folder.id, self.folders.len());
        self.folders.push(folder.clone());
        tracing::debug!(id = %folder.id, name = %folder.name, "folder created");
        Ok(folder)
    }

    pub fn rename_folder(&mut self, id: FolderId, new_name: &str) -> Result<RenameOutcome> {
        let pos = *self
            .folder_pos
            .get(&id)
            .ok_or(UrbrainError::FolderNotFound(id))?;
        let new_name = validate_name(new_name, "Folder name cannot be empty")?;

        let folder = &mut self.folders[pos];
        if folder.name == new_name {
            return Ok(RenameOutcome::Unchanged);
        }
        let previous = std::mem::replace(&mut folder.name, new_name);
        tracing::debug!(id = %id, from = %previous, to = %folder.name, "folder renamed");
        Ok(RenameOutcome::Renamed { previous })
    }

    /// Deletes the folder, every descendant folder and every note inside any
    /// of them. An unknown id removes nothing.
    pub fn delete_folder_cascade(&mut self, id: FolderId) -> Result<CascadeReport> {
        if self.folder(id).is_none() {
            return Ok(CascadeReport::default());
        }

        // Computed before anything is touched so a cycle leaves the store intact.
        let mut doomed = vec![id];
        doomed.extend(self.hierarchy().descendant_folder_ids(id)?);
        let doomed_set: HashSet<FolderId> = doomed.iter().copied().collect();

        let mut report = CascadeReport::default();
        for folder_id in &doomed {
            if let Some(folder) = self.folder(*folder_id) {
                report.folders.push(folder.clone());
            }
        }

        let (removed_notes, kept_notes): (Vec<Note>, Vec<Note>) = std::mem::take(&mut self.notes)
            .into_iter()
            .partition(|n| doomed_set.contains(&n.folder_id));
        self.notes = kept_notes;
        report.notes = removed_notes;

        self.folders.retain(|f| !doomed_set.contains(&f.id));
        self.reindex();

        tracing::info!(
            id = %id,
            folders = report.folders.len(),
            notes = report.notes.len(),
            "folder deleted with contents"
        );
        Ok(report)
    }

    // --- Notes ---

    pub fn create_note(&mut self, title: &str, folder_id: FolderId, content: &str) -> Result<Note> {
        let title = validate_name(title, "Note title cannot be empty")?;
        if self.folder(folder_id).is_none() {
            return Err(UrbrainError::FolderNotFound(folder_id));
        }

        let note = Note::new(title, folder_id, content.to_string());
        self.note_pos.insert(note.id, self.notes.len());
        self.notes.push(note.clone());
        tracing::debug!(id = %note.id, folder = %folder_id, "note created");
        Ok(note)
    }

    /// Applies a title and/or content edit. `modified_at` only moves when
    /// something actually changed.
    pub fn update_note(
        &mut self,
        id: NoteId,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<Note> {
        let pos = *self.note_pos.get(&id).ok_or(UrbrainError::NoteNotFound(id))?;
        let title = title
            .map(|t| validate_name(t, "Note title cannot be empty"))
            .transpose()?;

        let note = &mut self.notes[pos];
        let mut changed = false;
        if let Some(title) = title {
            if note.title != title {
                note.title = title;
                changed = true;
            }
        }
        if let Some(content) = content {
            if note.content != content {
                note.content = content.to_string();
                changed = true;
            }
        }
        if changed {
            note.modified_at = Utc::now();
        }
        Ok(note.clone())
    }

    pub fn delete_note(&mut self, id: NoteId) -> Result<Note> {
        let pos = *self.note_pos.get(&id).ok_or(UrbrainError::NoteNotFound(id))?;
        let note = self.notes.remove(pos);
        self.reindex();
        Ok(note)
    }

    /// Drops every folder and note.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // --- Integrity ---

    pub fn check_integrity(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();
        let hierarchy = self.hierarchy();

        for folder in &self.folders {
            if let Some(parent) = folder.parent_id {
                if self.folder(parent).is_none() {
                    issues.push(IntegrityIssue::DanglingParent {
                        folder: folder.id,
                        parent,
                    });
                }
            }
            // The walk first revisits the folder itself only when it is on the loop.
            if let Err(UrbrainError::CycleDetected(seen)) = hierarchy.breadcrumb_trail(folder.id) {
                if seen == folder.id {
                    issues.push(IntegrityIssue::ParentCycle { folder: folder.id });
                } else {
                    issues.push(IntegrityIssue::BelowCycle {
                        folder: folder.id,
                        ancestor: seen,
                    });
                }
            }
        }

        for note in &self.notes {
            if self.folder(note.folder_id).is_none() {
                issues.push(IntegrityIssue::OrphanNote {
                    note: note.id,
                    folder: note.folder_id,
                });
            }
        }

        issues
    }

    fn reindex(&mut self) {
        self.folder_pos = self
            .folders
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id, i))
            .collect();
        self.note_pos = self
            .notes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id, i))
            .collect();
    }
}

fn validate_name(raw: &str, message: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrbrainError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    /// Builds small folder trees by name for tests.
    #[derive(Default)]
    pub struct StoreFixture {
        pub store: EntityStore,
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn folder(&mut self, name: &str, parent: Option<FolderId>) -> FolderId {
            self.store.create_folder(name, parent).unwrap().id
        }

        pub fn note(&mut self, title: &str, folder: FolderId) -> NoteId {
            self.store.create_note(title, folder, "").unwrap().id
        }

        /// root → A → B → C, returned in that order.
        pub fn chain(&mut self) -> [FolderId; 4] {
            let root = self.folder("root", None);
            let a = self.folder("A", Some(root));
            let b = self.folder("B", Some(a));
            let c = self.folder("C", Some(b));
            [root, a, b, c]
        }
    }
}

//! # Storage Layer
//!
//! Persistence is a plain key-value blob store: three keys, each holding a
//! JSON array. [`BlobStore`] is the raw "how" (files on disk, or a map in
//! memory); [`Gateway`] is the "what" (which key holds which collection, how
//! to fall back when a value is missing or broken).
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: one `<key>.json` file per key in a data directory
//! - [`memory::InMemoryStore`]: a `RefCell<HashMap>` for tests, with write
//!   failure simulation
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── urbrain_folders.json       # [Folder, ...]
//! ├── urbrain_notes.json         # [Note, ...]
//! └── urbrain_sticky_notes.json  # opaque, only rewritten by a full clear
//! ```
//!
//! Loads never fail: a namespace that is missing starts empty, and one that
//! cannot be read or parsed also starts empty and is reported as a
//! [`LoadIssue`]. Saves overwrite a whole namespace at a time; saving folders
//! and saving notes are independent, there is no transaction spanning them.

use crate::error::{Result, UrbrainError};
use crate::model::{Folder, Note, StickyNote};
use crate::workspace::Workspace;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod fs;
pub mod memory;

/// Whether `key` is usable as a storage key: non-empty, only
/// `[A-Za-z0-9_.-]`, and not starting with a dot.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// Abstract raw key-value storage.
pub trait BlobStore {
    /// Read the value under `key`. `Ok(None)` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// The persisted namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Folders,
    Notes,
    Stickies,
}

impl Collection {
    pub fn all() -> [Collection; 3] {
        [Collection::Folders, Collection::Notes, Collection::Stickies]
    }

    fn suffix(&self) -> &'static str {
        match self {
            Collection::Folders => "folders",
            Collection::Notes => "notes",
            Collection::Stickies => "sticky_notes",
        }
    }
}

/// A namespace that could not be loaded and was reset to empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadIssue {
    pub key: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct Loaded {
    pub folders: Vec<Folder>,
    pub notes: Vec<Note>,
    pub stickies: Vec<StickyNote>,
    pub issues: Vec<LoadIssue>,
}

pub struct Gateway<S: BlobStore> {
    store: S,
    prefix: String,
}

impl<S: BlobStore> Gateway<S> {
    pub fn new(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self, collection: Collection) -> String {
        format!("{}{}", self.prefix, collection.suffix())
    }

    pub fn load(&self) -> Loaded {
        let mut issues = Vec::new();
        let folders = self.load_collection(Collection::Folders, &mut issues);
        let notes = self.load_collection(Collection::Notes, &mut issues);
        let stickies = self.load_collection(Collection::Stickies, &mut issues);
        Loaded {
            folders,
            notes,
            stickies,
            issues,
        }
    }

    fn load_collection<T: DeserializeOwned>(
        &self,
        collection: Collection,
        issues: &mut Vec<LoadIssue>,
    ) -> Vec<T> {
        let key = self.key(collection);
        let parsed = self.store.get(&key).and_then(|raw| match raw {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str::<Vec<T>>(&raw).map_err(UrbrainError::from),
        });

        match parsed {
            Ok(items) => {
                tracing::debug!(key = %key, count = items.len(), "collection loaded");
                items
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "collection unreadable, starting empty");
                issues.push(LoadIssue {
                    key,
                    reason: e.to_string(),
                });
                Vec::new()
            }
        }
    }

    fn save_collection<T: Serialize>(&self, collection: Collection, items: &[T]) -> Result<()> {
        let key = self.key(collection);
        let raw = serde_json::to_string(items)?;
        self.store
            .set(&key, &raw)
            .map_err(|e| match e {
                UrbrainError::Persistence(msg) => {
                    UrbrainError::Persistence(format!("saving {}: {}", key, msg))
                }
                other => UrbrainError::Persistence(format!("saving {}: {}", key, other)),
            })?;
        tracing::debug!(key = %key, count = items.len(), "collection saved");
        Ok(())
    }

    pub fn save_folders(&self, folders: &[Folder]) -> Result<()> {
        self.save_collection(Collection::Folders, folders)
    }

    pub fn save_notes(&self, notes: &[Note]) -> Result<()> {
        self.save_collection(Collection::Notes, notes)
    }

    pub fn save_stickies(&self, stickies: &[StickyNote]) -> Result<()> {
        self.save_collection(Collection::Stickies, stickies)
    }

    /// Writes one namespace from the workspace.
    pub fn save(&self, collection: Collection, ws: &Workspace) -> Result<()> {
        match collection {
            Collection::Folders => self.save_folders(ws.entities.folders()),
            Collection::Notes => self.save_notes(ws.entities.notes()),
            Collection::Stickies => self.save_stickies(&ws.stickies),
        }
    }

    /// Removes every namespace from the store.
    pub fn clear(&self) -> Result<()> {
        for collection in Collection::all() {
            self.store.remove(&self.key(collection))?;
        }
        Ok(())
    }
}

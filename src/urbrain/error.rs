use crate::model::{FolderId, NoteId};
use crate::tabs::TabId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UrbrainError {
    #[error("{0}")]
    Validation(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(FolderId),

    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),

    #[error("Tab not found: {0}")]
    TabNotFound(TabId),

    #[error("Nothing matches '{0}'")]
    NotFound(String),

    #[error("'{0}' matches more than one item, use a longer id")]
    Ambiguous(String),

    #[error("Cycle detected in folder parents at {0}")]
    CycleDetected(FolderId),

    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, UrbrainError>;

use crate::error::{Result, UrbrainError};
use crate::model::{FolderId, NoteId};
use crate::tabs::TabId;
use crate::workspace::Workspace;

/// Picks the single id whose text starts with `input`. A full id always wins.
fn unique_prefix<I, T>(input: &str, ids: I) -> Result<T>
where
    I: IntoIterator<Item = T>,
    T: Copy + ToString,
{
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Err(UrbrainError::NotFound(input.to_string()));
    }

    let mut found = None;
    for id in ids {
        let text = id.to_string();
        if text == needle {
            return Ok(id);
        }
        if text.starts_with(&needle) {
            if found.is_some() {
                return Err(UrbrainError::Ambiguous(input.to_string()));
            }
            found = Some(id);
        }
    }
    found.ok_or_else(|| UrbrainError::NotFound(input.to_string()))
}

pub fn resolve_folder(ws: &Workspace, input: &str) -> Result<FolderId> {
    unique_prefix(input, ws.entities.folders().iter().map(|f| f.id))
}

pub fn resolve_note(ws: &Workspace, input: &str) -> Result<NoteId> {
    unique_prefix(input, ws.entities.notes().iter().map(|n| n.id))
}

/// Accepts `tab-3` or plain `3`.
pub fn resolve_tab(ws: &Workspace, input: &str) -> Result<TabId> {
    let trimmed = input.trim();
    let number = trimmed.strip_prefix("tab-").unwrap_or(trimmed);
    let id = number
        .parse::<u64>()
        .map(TabId)
        .map_err(|_| UrbrainError::NotFound(input.to_string()))?;
    ws.tabs
        .get(id)
        .map(|t| t.id)
        .ok_or(UrbrainError::TabNotFound(id))
}

//! # View Layer
//!
//! The core never produces markup. After each committed mutation it builds a
//! [`View`] (tab strip, active tab, and whatever the active tab resolves to)
//! and hands it to a [`ViewRenderer`]. Renderers only read.

use crate::model::{Folder, Note};
use crate::tabs::{Tab, TabId, TabTarget};
use crate::workspace::Workspace;

pub const DEFAULT_PREVIEW_LENGTH: usize = 80;
const EMPTY_PREVIEW: &str = "No content yet...";

/// What the active tab shows, resolved against the current entities.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveView<'a> {
    Home {
        root_folders: Vec<&'a Folder>,
        sticky_count: usize,
    },
    Folder {
        folder: &'a Folder,
        trail: Vec<&'a Folder>,
        subfolders: Vec<&'a Folder>,
        notes: Vec<&'a Note>,
    },
    Note {
        note: &'a Note,
        folder: Option<&'a Folder>,
    },
    Sticky {
        id: &'a str,
    },
}

#[derive(Debug, Clone)]
pub struct View<'a> {
    pub tabs: &'a [Tab],
    pub active_id: TabId,
    pub active: ActiveView<'a>,
}

impl<'a> View<'a> {
    pub fn build(ws: &'a Workspace) -> Self {
        let tab = ws.tabs.active();
        Self {
            tabs: ws.tabs.tabs(),
            active_id: tab.id,
            active: resolve(ws, &tab.target),
        }
    }
}

/// Folder and note tabs whose entity is gone fall back to the home view.
pub fn resolve<'a>(ws: &'a Workspace, target: &'a TabTarget) -> ActiveView<'a> {
    let entities = &ws.entities;
    let hierarchy = entities.hierarchy();
    match target {
        TabTarget::Folder(id) => {
            if let Some(folder) = entities.folder(*id) {
                let trail = hierarchy.breadcrumb_trail(*id).unwrap_or_else(|e| {
                    tracing::error!(folder = %id, error = %e, "cannot build breadcrumb");
                    vec![folder]
                });
                return ActiveView::Folder {
                    folder,
                    trail,
                    subfolders: hierarchy.direct_children(*id),
                    notes: entities.notes_in_folder(*id),
                };
            }
            tracing::warn!(folder = %id, "tab points at a missing folder");
        }
        TabTarget::Note(id) => {
            if let Some(note) = entities.note(*id) {
                return ActiveView::Note {
                    note,
                    folder: entities.folder(note.folder_id),
                };
            }
            tracing::warn!(note = %id, "tab points at a missing note");
        }
        TabTarget::Sticky(id) => return ActiveView::Sticky { id },
        TabTarget::Home => {}
    }
    ActiveView::Home {
        root_folders: hierarchy.root_folders(),
        sticky_count: ws.stickies.len(),
    }
}

/// Trimmed note body cut to `max_len` characters, or a placeholder when empty.
pub fn content_preview(content: &str, max_len: usize) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return EMPTY_PREVIEW.to_string();
    }
    if trimmed.chars().count() <= max_len {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_len).collect();
    format!("{}...", cut)
}

pub trait ViewRenderer {
    fn render(&mut self, view: &View<'_>);
}

/// Renderer for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl ViewRenderer for NullRenderer {
    fn render(&mut self, _view: &View<'_>) {}
}

impl<R: ViewRenderer + ?Sized> ViewRenderer for &mut R {
    fn render(&mut self, view: &View<'_>) {
        (**self).render(view)
    }
}

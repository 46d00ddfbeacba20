//! # Tab Manager
//!
//! The ordered tab strip and the active-tab pointer.
//!
//! Two rules hold after every public method returns:
//!
//! 1. There is at least one tab.
//! 2. `active_id()` names a tab that is in the list.
//!
//! Folder and note tabs are unique per entity: opening one that is already
//! open just switches to it. Home and sticky tabs are never deduplicated.
//!
//! Closing the active tab activates the *last* tab in the strip, not a
//! neighbour of the closed one.

use crate::error::{Result, UrbrainError};
use crate::model::{FolderId, NoteId};
use serde::Serialize;
use std::fmt;

pub const HOME_TITLE: &str = "Home";

/// Session-scoped tab id. Counter based, never reused until [`TabManager::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

/// What a tab shows. Carries the referenced id where there is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "referenceId", rename_all = "lowercase")]
pub enum TabTarget {
    Home,
    Folder(FolderId),
    Note(NoteId),
    Sticky(String),
}

impl TabTarget {
    fn is_unique(&self) -> bool {
        matches!(self, TabTarget::Folder(_) | TabTarget::Note(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TabTarget::Home => "home",
            TabTarget::Folder(_) => "folder",
            TabTarget::Note(_) => "note",
            TabTarget::Sticky(_) => "sticky",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tab {
    pub id: TabId,
    #[serde(flatten)]
    pub target: TabTarget,
    /// Cached label; refreshed by [`TabManager::sync_title`].
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// The tab was the only one left and stays open.
    Refused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Created(TabId),
    Switched(TabId),
}

impl OpenOutcome {
    pub fn tab_id(&self) -> TabId {
        match self {
            OpenOutcome::Created(id) | OpenOutcome::Switched(id) => *id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TabManager {
    tabs: Vec<Tab>,
    active: TabId,
    next_id: u64,
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TabManager {
    /// A strip holding a single active Home tab.
    pub fn new() -> Self {
        let home = Tab {
            id: TabId(1),
            target: TabTarget::Home,
            title: HOME_TITLE.to_string(),
        };
        Self {
            active: home.id,
            tabs: vec![home],
            next_id: 2,
        }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_id(&self) -> TabId {
        self.active
    }

    pub fn active(&self) -> &Tab {
        // The active id is kept valid by every mutating method.
        self.get(self.active).unwrap_or(&self.tabs[self.tabs.len() - 1])
    }

    pub fn get(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn find(&self, target: &TabTarget) -> Option<&Tab> {
        self.tabs.iter().find(|t| &t.target == target)
    }

    fn position(&self, id: TabId) -> Result<usize> {
        self.tabs
            .iter()
            .position(|t| t.id == id)
            .ok_or(UrbrainError::TabNotFound(id))
    }

    fn push(&mut self, target: TabTarget, title: String) -> TabId {
        let id = TabId(self.next_id);
        self.next_id += 1;
        self.tabs.push(Tab { id, target, title });
        self.active = id;
        id
    }

    /// Opens `target`, reusing an existing folder/note tab when there is one.
    pub fn open(&mut self, target: TabTarget, title: impl Into<String>) -> OpenOutcome {
        if target.is_unique() {
            if let Some(existing) = self.find(&target) {
                let id = existing.id;
                self.active = id;
                tracing::debug!(tab = %id, "switched to existing tab");
                return OpenOutcome::Switched(id);
            }
        }
        let id = self.push(target, title.into());
        tracing::debug!(tab = %id, "tab created");
        OpenOutcome::Created(id)
    }

    pub fn open_home(&mut self) -> TabId {
        self.open(TabTarget::Home, HOME_TITLE).tab_id()
    }

    pub fn switch(&mut self, id: TabId) -> Result<()> {
        self.position(id)?;
        self.active = id;
        Ok(())
    }

    pub fn close(&mut self, id: TabId) -> Result<CloseOutcome> {
        let pos = self.position(id)?;
        if self.tabs.len() <= 1 {
            tracing::debug!(tab = %id, "refusing to close the last tab");
            return Ok(CloseOutcome::Refused);
        }

        self.tabs.remove(pos);
        if self.active == id {
            self.active = self.tabs[self.tabs.len() - 1].id;
        }
        tracing::debug!(tab = %id, "tab closed");
        Ok(CloseOutcome::Closed)
    }

    /// Moves `dragged` to the index `target` held before the move.
    ///
    /// `[T1, T2, T3, T4]` with `reorder(T1, T3)` gives `[T2, T3, T1, T4]`.
    pub fn reorder(&mut self, dragged: TabId, target: TabId) -> Result<()> {
        if dragged == target {
            return Ok(());
        }
        let from = self.position(dragged)?;
        let to = self.position(target)?;

        let tab = self.tabs.remove(from);
        let to = to.min(self.tabs.len());
        self.tabs.insert(to, tab);
        Ok(())
    }

    /// Closes every tab matching `doomed`. When the last remaining tab has to
    /// go it is swapped for a fresh Home tab. Returns the ids that went away.
    pub fn retire<F>(&mut self, doomed: F) -> Vec<TabId>
    where
        F: Fn(&TabTarget) -> bool,
    {
        let ids: Vec<TabId> = self
            .tabs
            .iter()
            .filter(|t| doomed(&t.target))
            .map(|t| t.id)
            .collect();

        for id in &ids {
            match self.close(*id) {
                Ok(CloseOutcome::Closed) => {}
                Ok(CloseOutcome::Refused) => {
                    self.tabs.clear();
                    self.push(TabTarget::Home, HOME_TITLE.to_string());
                    tracing::debug!(tab = %id, "last tab retired, replaced with home");
                }
                Err(e) => tracing::warn!(tab = %id, error = %e, "tab vanished during retire"),
            }
        }
        ids
    }

    /// Updates the cached title of every tab showing `target`.
    pub fn sync_title(&mut self, target: &TabTarget, title: &str) -> usize {
        let mut touched = 0;
        for tab in self.tabs.iter_mut().filter(|t| &t.target == target) {
            tab.title = title.to_string();
            touched += 1;
        }
        touched
    }

    /// Back to a single Home tab with the id counter restarted.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

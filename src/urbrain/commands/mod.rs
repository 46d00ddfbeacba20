//! # Command Layer
//!
//! Every user action is a [`Command`]. [`dispatch`] maps it to a transition
//! function `(workspace, args) -> Result<CmdResult>`; the returned
//! [`CmdResult`] lists what the caller should do next ([`Effect`]) alongside
//! user-facing messages.
//!
//! Transition functions check everything they need *before* touching state,
//! so an `Err` always means the workspace is unchanged. They never persist or
//! render themselves: that is the API layer's job.

use crate::config::UrbrainConfig;
use crate::entities::IntegrityIssue;
use crate::error::Result;
use crate::model::{Folder, FolderId, Note, NoteId};
use crate::tabs::TabId;
use crate::workspace::Workspace;
use std::path::PathBuf;

pub use crate::store::Collection;

pub mod clear;
pub mod config;
pub mod doctor;
pub mod folders;
pub mod helpers;
pub mod notes;
pub mod tabs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateFolder {
        name: String,
        parent: Option<FolderId>,
    },
    RenameFolder {
        id: FolderId,
        name: String,
    },
    PreviewDeleteFolder {
        id: FolderId,
    },
    DeleteFolder {
        id: FolderId,
    },
    CreateNote {
        title: String,
        folder: FolderId,
        content: String,
    },
    UpdateNote {
        id: NoteId,
        title: Option<String>,
        content: Option<String>,
    },
    DeleteNote {
        id: NoteId,
    },
    OpenFolder {
        id: FolderId,
    },
    OpenNote {
        id: NoteId,
    },
    OpenHome,
    SwitchTab {
        id: TabId,
    },
    CloseTab {
        id: TabId,
    },
    ReorderTab {
        dragged: TabId,
        target: TabId,
    },
    Reset,
}

pub fn dispatch(ws: &mut Workspace, command: Command) -> Result<CmdResult> {
    match command {
        Command::CreateFolder { name, parent } => folders::create(ws, &name, parent),
        Command::RenameFolder { id, name } => folders::rename(ws, id, &name),
        Command::PreviewDeleteFolder { id } => folders::preview_delete(ws, id),
        Command::DeleteFolder { id } => folders::delete(ws, id),
        Command::CreateNote {
            title,
            folder,
            content,
        } => notes::create(ws, &title, folder, &content),
        Command::UpdateNote { id, title, content } => {
            notes::update(ws, id, title.as_deref(), content.as_deref())
        }
        Command::DeleteNote { id } => notes::delete(ws, id),
        Command::OpenFolder { id } => tabs::open_folder(ws, id),
        Command::OpenNote { id } => tabs::open_note(ws, id),
        Command::OpenHome => tabs::open_home(ws),
        Command::SwitchTab { id } => tabs::switch(ws, id),
        Command::CloseTab { id } => tabs::close(ws, id),
        Command::ReorderTab { dragged, target } => tabs::reorder(ws, dragged, target),
        Command::Reset => clear::run(ws),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Persist(Collection),
    Render,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What the delete confirmation shows before anything is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionPreview {
    pub folder: FolderId,
    pub name: String,
    /// Direct subfolders plus direct notes.
    pub item_count: usize,
    /// Every folder below this one, at any depth.
    pub descendant_count: usize,
}

impl DeletionPreview {
    pub fn prompt(&self) -> String {
        let mut text = format!("Delete folder \"{}\"?", self.name);
        if self.item_count > 0 {
            text.push_str(&format!(
                "\n\nThis folder contains {} item{}.",
                self.item_count,
                plural(self.item_count)
            ));
            if self.descendant_count > 0 {
                text.push_str(&format!(
                    " This will also delete {} subfolder{} inside.",
                    self.descendant_count,
                    plural(self.descendant_count)
                ));
            }
            text.push_str("\n\nThis action cannot be undone!");
        }
        text
    }
}

pub(crate) fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub messages: Vec<CmdMessage>,
    pub effects: Vec<Effect>,
    pub affected_folders: Vec<Folder>,
    pub affected_notes: Vec<Note>,
    pub closed_tabs: Vec<TabId>,
    pub opened_tab: Option<TabId>,
    pub preview: Option<DeletionPreview>,
    pub issues: Vec<IntegrityIssue>,
    pub config: Option<UrbrainConfig>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn add_effect(&mut self, effect: Effect) {
        if !self.effects.contains(&effect) {
            self.effects.push(effect);
        }
    }

    pub fn with_effects(mut self, effects: &[Effect]) -> Self {
        for effect in effects {
            self.add_effect(*effect);
        }
        self
    }

    pub fn with_config(mut self, config: UrbrainConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn persists(&self, collection: Collection) -> bool {
        self.effects.contains(&Effect::Persist(collection))
    }

    pub fn renders(&self) -> bool {
        self.effects.contains(&Effect::Render)
    }
}

/// Where configuration and data live on disk.
#[derive(Debug, Clone)]
pub struct UrbrainPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_for_empty_folder_is_short() {
        let preview = DeletionPreview {
            folder: FolderId::new(),
            name: "Empty".into(),
            item_count: 0,
            descendant_count: 0,
        };
        assert_eq!(preview.prompt(), "Delete folder \"Empty\"?");
    }

    #[test]
    fn prompt_mentions_shallow_items_and_deep_subfolders() {
        let preview = DeletionPreview {
            folder: FolderId::new(),
            name: "Work".into(),
            item_count: 1,
            descendant_count: 3,
        };
        let prompt = preview.prompt();
        assert!(prompt.contains("contains 1 item."));
        assert!(prompt.contains("also delete 3 subfolders inside."));
        assert!(prompt.ends_with("This action cannot be undone!"));
    }

    #[test]
    fn effects_are_deduplicated() {
        let result = CmdResult::default().with_effects(&[
            Effect::Persist(Collection::Folders),
            Effect::Render,
            Effect::Render,
        ]);
        assert_eq!(result.effects.len(), 2);
        assert!(result.persists(Collection::Folders));
        assert!(!result.persists(Collection::Notes));
    }
}

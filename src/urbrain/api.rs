//! # API Facade
//!
//! The single entry point for every urbrain operation, whatever the UI.
//!
//! `UrbrainApi<S, R>` owns the [`Workspace`], a [`Gateway`] over some
//! [`BlobStore`] `S`, and a [`ViewRenderer`] `R`. For each [`Command`] it:
//!
//! 1. runs the transition in `commands::dispatch`;
//! 2. saves every collection the result marks dirty;
//! 3. hands the fresh [`View`] to the renderer.
//!
//! ## Failure policy
//!
//! [`UrbrainApi::execute`] never fails. A rejected command comes back as an
//! error message with the workspace untouched. A failed save comes back as a
//! warning: the in-memory state stays authoritative and the next successful
//! save of that collection catches storage up. [`UrbrainApi::try_execute`]
//! does the same work but hands rejections back as `Err`, for callers that
//! want an exit code.

use crate::commands::{self, helpers, CmdMessage, CmdResult, Command, Effect};
use crate::config::UrbrainConfig;
use crate::entities::{EntityStore, IntegrityIssue};
use crate::error::{Result, UrbrainError};
use crate::model::{FolderId, NoteId};
use crate::store::{BlobStore, Gateway, LoadIssue};
use crate::tabs::TabId;
use crate::view::{View, ViewRenderer};
use crate::workspace::Workspace;

pub struct UrbrainApi<S: BlobStore, R: ViewRenderer> {
    gateway: Gateway<S>,
    renderer: R,
    workspace: Workspace,
    config: UrbrainConfig,
    load_issues: Vec<LoadIssue>,
    integrity_issues: Vec<IntegrityIssue>,
}

impl<S: BlobStore, R: ViewRenderer> UrbrainApi<S, R> {
    /// Loads every collection from `store` and renders the initial view.
    pub fn open(store: S, renderer: R, config: UrbrainConfig) -> Self {
        let gateway = Gateway::new(store, config.key_prefix.clone());
        let loaded = gateway.load();

        let entities = EntityStore::from_parts(loaded.folders, loaded.notes);
        let integrity_issues = entities.check_integrity();
        for issue in &integrity_issues {
            tracing::error!(%issue, "stored data is inconsistent");
        }

        let workspace = Workspace::new(entities, loaded.stickies);
        tracing::info!(
            folders = workspace.entities.folders().len(),
            notes = workspace.entities.notes().len(),
            "workspace loaded"
        );

        let mut api = Self {
            gateway,
            renderer,
            workspace,
            config,
            load_issues: loaded.issues,
            integrity_issues,
        };
        api.render();
        api
    }

    /// Runs `command`, reporting rather than returning any failure.
    pub fn execute(&mut self, command: Command) -> CmdResult {
        match self.try_execute(command) {
            Ok(result) => result,
            Err(e) => {
                match &e {
                    UrbrainError::Validation(_) => tracing::debug!(error = %e, "command rejected"),
                    _ => tracing::warn!(error = %e, "command failed"),
                }
                let mut result = CmdResult::default();
                result.add_message(CmdMessage::error(e.to_string()));
                result
            }
        }
    }

    /// Runs `command`; a rejected command is returned as `Err` and changes
    /// nothing. Storage failures after a successful transition are still
    /// reported as warnings on the `Ok` result.
    pub fn try_execute(&mut self, command: Command) -> Result<CmdResult> {
        tracing::trace!(?command, "dispatching");
        let mut result = commands::dispatch(&mut self.workspace, command)?;
        self.apply_effects(&mut result);
        Ok(result)
    }

    fn apply_effects(&mut self, result: &mut CmdResult) {
        let mut render = false;
        for effect in result.effects.clone() {
            match effect {
                Effect::Persist(collection) => {
                    if let Err(e) = self.gateway.save(collection, &self.workspace) {
                        tracing::warn!(
                            ?collection,
                            error = %e,
                            "save failed, memory and storage now differ"
                        );
                        result.add_message(CmdMessage::warning(format!(
                            "Changes are not saved yet: {}",
                            e
                        )));
                    }
                }
                Effect::Render => render = true,
            }
        }
        // Render after every save so the view never runs ahead of storage.
        if render {
            self.render();
        }
    }

    fn render(&mut self) {
        let view = View::build(&self.workspace);
        self.renderer.render(&view);
    }

    pub fn view(&self) -> View<'_> {
        View::build(&self.workspace)
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn config(&self) -> &UrbrainConfig {
        &self.config
    }

    pub fn gateway(&self) -> &Gateway<S> {
        &self.gateway
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Problems found while loading, as user-facing messages.
    pub fn startup_messages(&self) -> Vec<CmdMessage> {
        let mut messages: Vec<CmdMessage> = self
            .load_issues
            .iter()
            .map(|issue| {
                CmdMessage::warning(format!(
                    "Could not load {}, starting it empty: {}",
                    issue.key, issue.reason
                ))
            })
            .collect();
        if !self.integrity_issues.is_empty() {
            messages.push(CmdMessage::error(format!(
                "Stored data has {} inconsistencies, run `urbrain doctor` for details",
                self.integrity_issues.len()
            )));
        }
        messages
    }

    pub fn load_issues(&self) -> &[LoadIssue] {
        &self.load_issues
    }

    pub fn doctor(&self) -> Result<CmdResult> {
        commands::doctor::run(&self.workspace)
    }

    /// Deletes all stored data and resets the workspace.
    pub fn clear_all(&mut self) -> Result<CmdResult> {
        self.gateway.clear()?;
        self.try_execute(Command::Reset)
    }

    pub fn resolve_folder(&self, input: &str) -> Result<FolderId> {
        helpers::resolve_folder(&self.workspace, input)
    }

    pub fn resolve_note(&self, input: &str) -> Result<NoteId> {
        helpers::resolve_note(&self.workspace, input)
    }

    pub fn resolve_tab(&self, input: &str) -> Result<TabId> {
        helpers::resolve_tab(&self.workspace, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Collection, MessageLevel};
    use crate::store::memory::InMemoryStore;
    use crate::tabs::TabTarget;
    use crate::view::{ActiveView, NullRenderer};

    #[derive(Default)]
    struct CountingRenderer {
        renders: usize,
        last_tabs: usize,
    }

    impl ViewRenderer for CountingRenderer {
        fn render(&mut self, view: &View<'_>) {
            self.renders += 1;
            self.last_tabs = view.tabs.len();
        }
    }

    fn open_api(store: &InMemoryStore) -> UrbrainApi<&InMemoryStore, CountingRenderer> {
        UrbrainApi::open(store, CountingRenderer::default(), UrbrainConfig::default())
    }

    fn create_folder(
        api: &mut UrbrainApi<&InMemoryStore, CountingRenderer>,
        name: &str,
    ) -> FolderId {
        api.execute(Command::CreateFolder {
            name: name.into(),
            parent: None,
        })
        .affected_folders[0]
            .id
    }

    #[test]
    fn open_renders_once() {
        let store = InMemoryStore::new();
        let api = open_api(&store);
        assert_eq!(api.renderer().renders, 1);
        assert_eq!(api.renderer().last_tabs, 1);
    }

    #[test]
    fn mutations_persist_and_render() {
        let store = InMemoryStore::new();
        let mut api = open_api(&store);
        create_folder(&mut api, "Work");

        assert_eq!(api.renderer().renders, 2);
        let raw = store.get("urbrain_folders").unwrap().unwrap();
        assert!(raw.contains("\"Work\""));
    }

    #[test]
    fn data_survives_reopen() {
        let store = InMemoryStore::new();
        {
            let mut api = open_api(&store);
            let work = create_folder(&mut api, "Work");
            api.execute(Command::CreateNote {
                title: "Plan".into(),
                folder: work,
                content: String::new(),
            });
        }
        let api = open_api(&store);
        assert_eq!(api.workspace().entities.folders().len(), 1);
        assert_eq!(api.workspace().entities.notes().len(), 1);
        assert_eq!(api.workspace().tabs.len(), 1);
    }

    #[test]
    fn rejected_command_is_reported_and_changes_nothing() {
        let store = InMemoryStore::new();
        let mut api = open_api(&store);

        let result = api.execute(Command::CreateFolder {
            name: "   ".into(),
            parent: None,
        });

        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(api.workspace().entities.folders().is_empty());
        assert_eq!(api.renderer().renders, 1);
        assert!(store.get("urbrain_folders").unwrap().is_none());
    }

    #[test]
    fn try_execute_propagates_rejection() {
        let store = InMemoryStore::new();
        let mut api = open_api(&store);
        let err = api
            .try_execute(Command::OpenFolder { id: FolderId::new() })
            .unwrap_err();
        assert!(matches!(err, UrbrainError::FolderNotFound(_)));
    }

    #[test]
    fn failed_save_keeps_memory_state() {
        let store = InMemoryStore::new();
        let mut api = open_api(&store);
        store.set_simulate_write_error(true);

        let result = api.execute(Command::CreateFolder {
            name: "Work".into(),
            parent: None,
        });

        assert!(result
            .messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning));
        assert_eq!(api.workspace().entities.folders().len(), 1);
        assert_eq!(api.renderer().renders, 2);

        store.set_simulate_write_error(false);
        create_folder(&mut api, "Home");
        let raw = store.get("urbrain_folders").unwrap().unwrap();
        assert!(raw.contains("\"Work\"") && raw.contains("\"Home\""));
    }

    #[test]
    fn corrupt_storage_is_reported_on_open() {
        let store = InMemoryStore::new();
        store.set("urbrain_folders", "oops").unwrap();

        let api = open_api(&store);
        assert_eq!(api.load_issues().len(), 1);
        assert_eq!(api.startup_messages().len(), 1);
        assert!(api.workspace().entities.folders().is_empty());
    }

    #[test]
    fn delete_folder_cascade_end_to_end() {
        let store = InMemoryStore::new();
        let mut api = open_api(&store);
        let work = create_folder(&mut api, "Work");
        let plan = api
            .execute(Command::CreateNote {
                title: "Plan".into(),
                folder: work,
                content: String::new(),
            })
            .affected_notes[0]
            .id;
        api.execute(Command::OpenFolder { id: work });
        api.execute(Command::OpenNote { id: plan });

        let preview = api
            .execute(Command::PreviewDeleteFolder { id: work })
            .preview
            .unwrap();
        assert_eq!(preview.item_count, 1);

        let result = api.execute(Command::DeleteFolder { id: work });
        assert!(result.persists(Collection::Notes));
        assert_eq!(api.workspace().tabs.len(), 1);
        assert!(matches!(api.view().active, ActiveView::Home { .. }));
        assert_eq!(store.get("urbrain_notes").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn clear_all_wipes_storage() {
        let store = InMemoryStore::new();
        let mut api = UrbrainApi::open(&store, NullRenderer, UrbrainConfig::default());
        api.execute(Command::CreateFolder {
            name: "Work".into(),
            parent: None,
        });
        api.execute(Command::OpenHome);

        api.clear_all().unwrap();
        assert!(api.workspace().entities.folders().is_empty());
        assert_eq!(api.workspace().tabs.tabs()[0].target, TabTarget::Home);
        assert_eq!(store.get("urbrain_notes").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn custom_key_prefix() {
        let store = InMemoryStore::new();
        let config = UrbrainConfig {
            key_prefix: "test_".into(),
            ..UrbrainConfig::default()
        };
        let mut api = UrbrainApi::open(&store, NullRenderer, config);
        api.execute(Command::CreateFolder {
            name: "Work".into(),
            parent: None,
        });
        assert!(store.get("test_folders").unwrap().is_some());
    }
}

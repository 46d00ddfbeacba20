use std::fs;
use tempfile::TempDir;
use urbrain::api::UrbrainApi;
use urbrain::commands::{Command, MessageLevel};
use urbrain::config::UrbrainConfig;
use urbrain::store::fs::FileStore;
use urbrain::tabs::{TabId, TabTarget};
use urbrain::view::{ActiveView, NullRenderer, View, ViewRenderer};

/// Keeps the tab titles of every view it is handed.
#[derive(Default)]
struct Recorder {
    strips: Vec<Vec<String>>,
}

impl ViewRenderer for Recorder {
    fn render(&mut self, view: &View<'_>) {
        self.strips
            .push(view.tabs.iter().map(|t| t.title.clone()).collect());
    }
}

fn open(dir: &TempDir) -> UrbrainApi<FileStore, Recorder> {
    UrbrainApi::open(
        FileStore::new(dir.path().to_path_buf()),
        Recorder::default(),
        UrbrainConfig::default(),
    )
}

#[test]
fn delete_folder_closes_its_tabs_and_survives_restart() {
    let dir = TempDir::new().unwrap();
    let mut api = open(&dir);

    let work = api
        .execute(Command::CreateFolder {
            name: "Work".into(),
            parent: None,
        })
        .affected_folders[0]
        .id;
    let plan = api
        .execute(Command::CreateNote {
            title: "Plan".into(),
            folder: work,
            content: "draft".into(),
        })
        .affected_notes[0]
        .id;
    api.execute(Command::OpenFolder { id: work });
    api.execute(Command::OpenNote { id: plan });
    assert_eq!(
        api.renderer().strips.last().unwrap(),
        &vec!["Home".to_string(), "Work".into(), "Plan".into()]
    );

    let result = api.execute(Command::DeleteFolder { id: work });
    assert_eq!(result.closed_tabs.len(), 2);
    assert_eq!(api.workspace().tabs.len(), 1);
    assert_eq!(api.workspace().tabs.active().target, TabTarget::Home);
    assert_eq!(
        api.renderer().strips.last().unwrap(),
        &vec!["Home".to_string()]
    );

    drop(api);
    let api = open(&dir);
    assert!(api.workspace().entities.folders().is_empty());
    assert!(api.workspace().entities.notes().is_empty());
}

#[test]
fn nested_tree_reloads_with_breadcrumbs() {
    let dir = TempDir::new().unwrap();
    let deepest = {
        let mut api = open(&dir);
        let mut parent = None;
        let mut last = None;
        for name in ["root", "A", "B", "C"] {
            let id = api
                .execute(Command::CreateFolder {
                    name: name.into(),
                    parent,
                })
                .affected_folders[0]
                .id;
            parent = Some(id);
            last = Some(id);
        }
        last.unwrap()
    };

    let mut api = open(&dir);
    api.execute(Command::OpenFolder { id: deepest });
    match api.view().active {
        ActiveView::Folder { trail, .. } => {
            let names: Vec<&str> = trail.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(names, ["root", "A", "B", "C"]);
        }
        other => panic!("expected folder view, got {:?}", other),
    }
}

#[test]
fn tabs_are_not_persisted() {
    let dir = TempDir::new().unwrap();
    {
        let mut api = open(&dir);
        api.execute(Command::OpenHome);
        api.execute(Command::OpenHome);
        assert_eq!(api.workspace().tabs.len(), 3);
    }
    let api = open(&dir);
    assert_eq!(api.workspace().tabs.len(), 1);
    assert_eq!(api.workspace().tabs.active_id(), TabId(1));
}

#[test]
fn reorder_moves_to_target_position() {
    let dir = TempDir::new().unwrap();
    let mut api = UrbrainApi::open(
        FileStore::new(dir.path().to_path_buf()),
        NullRenderer,
        UrbrainConfig::default(),
    );
    for _ in 0..3 {
        api.execute(Command::OpenHome);
    }

    api.execute(Command::ReorderTab {
        dragged: TabId(1),
        target: TabId(3),
    });

    let order: Vec<u64> = api.workspace().tabs.tabs().iter().map(|t| t.id.0).collect();
    assert_eq!(order, [2, 3, 1, 4]);
}

#[test]
fn unreadable_namespace_starts_empty_and_others_load() {
    let dir = TempDir::new().unwrap();
    {
        let mut api = open(&dir);
        api.execute(Command::CreateFolder {
            name: "Kept".into(),
            parent: None,
        });
    }
    fs::write(dir.path().join("urbrain_notes.json"), "not json").unwrap();

    let api = open(&dir);
    assert_eq!(api.workspace().entities.folders().len(), 1);
    assert!(api.workspace().entities.notes().is_empty());
    let startup = api.startup_messages();
    assert_eq!(startup.len(), 1);
    assert_eq!(startup[0].level, MessageLevel::Warning);
    assert!(startup[0].content.contains("urbrain_notes"));
}

#[test]
fn sticky_notes_pass_through_untouched() {
    let dir = TempDir::new().unwrap();
    let raw = r#"[{"id":"s1","text":"milk","color":"yellow"}]"#;
    fs::write(dir.path().join("urbrain_sticky_notes.json"), raw).unwrap();

    let mut api = open(&dir);
    api.execute(Command::CreateFolder {
        name: "Work".into(),
        parent: None,
    });
    match api.view().active {
        ActiveView::Home { sticky_count, .. } => assert_eq!(sticky_count, 1),
        other => panic!("expected home view, got {:?}", other),
    }

    let stored = fs::read_to_string(dir.path().join("urbrain_sticky_notes.json")).unwrap();
    assert_eq!(stored, raw);
}

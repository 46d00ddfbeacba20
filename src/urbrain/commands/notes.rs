use crate::commands::{CmdMessage, CmdResult, Collection, Effect};
use crate::error::{Result, UrbrainError};
use crate::model::{FolderId, NoteId};
use crate::tabs::TabTarget;
use crate::workspace::Workspace;

pub fn create(
    ws: &mut Workspace,
    title: &str,
    folder: FolderId,
    content: &str,
) -> Result<CmdResult> {
    let note = ws.entities.create_note(title, folder, content)?;

    let mut result =
        CmdResult::default().with_effects(&[Effect::Persist(Collection::Notes), Effect::Render]);
    result.add_message(CmdMessage::success(format!("Note created: {}", note.title)));
    result.affected_notes.push(note);
    Ok(result)
}

pub fn update(
    ws: &mut Workspace,
    id: NoteId,
    title: Option<&str>,
    content: Option<&str>,
) -> Result<CmdResult> {
    let before = ws
        .entities
        .note(id)
        .cloned()
        .ok_or(UrbrainError::NoteNotFound(id))?;
    let note = ws.entities.update_note(id, title, content)?;

    let mut result = CmdResult::default();
    if note == before {
        result.add_message(CmdMessage::info("Note unchanged."));
        return Ok(result);
    }

    if note.title != before.title {
        ws.tabs.sync_title(&TabTarget::Note(id), &note.title);
    }
    result.add_message(CmdMessage::success(format!("Note updated: {}", note.title)));
    result.add_effect(Effect::Persist(Collection::Notes));
    result.add_effect(Effect::Render);
    result.affected_notes.push(note);
    Ok(result)
}

pub fn delete(ws: &mut Workspace, id: NoteId) -> Result<CmdResult> {
    let note = ws.entities.delete_note(id)?;
    let mut result =
        CmdResult::default().with_effects(&[Effect::Persist(Collection::Notes), Effect::Render]);
    result.closed_tabs = ws.tabs.retire(|t| *t == TabTarget::Note(id));
    result.add_message(CmdMessage::success(format!("Note deleted: {}", note.title)));
    result.affected_notes.push(note);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{folders, tabs};

    fn folder(ws: &mut Workspace) -> FolderId {
        folders::create(ws, "Work", None).unwrap().affected_folders[0].id
    }

    #[test]
    fn create_defaults_to_given_content() {
        let mut ws = Workspace::default();
        let work = folder(&mut ws);
        let result = create(&mut ws, " Plan ", work, "").unwrap();

        let note = &result.affected_notes[0];
        assert_eq!(note.title, "Plan");
        assert!(note.content.is_empty());
        assert!(result.persists(Collection::Notes));
        assert!(!result.persists(Collection::Folders));
    }

    #[test]
    fn create_in_missing_folder_fails() {
        let mut ws = Workspace::default();
        let err = create(&mut ws, "Plan", FolderId::new(), "").unwrap_err();
        assert!(matches!(err, UrbrainError::FolderNotFound(_)));
    }

    #[test]
    fn retitle_updates_tab() {
        let mut ws = Workspace::default();
        let work = folder(&mut ws);
        let id = create(&mut ws, "Plan", work, "").unwrap().affected_notes[0].id;
        tabs::open_note(&mut ws, id).unwrap();

        update(&mut ws, id, Some("Roadmap"), None).unwrap();
        assert_eq!(ws.tabs.active().title, "Roadmap");
    }

    #[test]
    fn identical_update_is_noop() {
        let mut ws = Workspace::default();
        let work = folder(&mut ws);
        let id = create(&mut ws, "Plan", work, "body").unwrap().affected_notes[0].id;

        let result = update(&mut ws, id, Some("Plan"), Some("body")).unwrap();
        assert!(result.effects.is_empty());
    }

    #[test]
    fn delete_retires_note_tab() {
        let mut ws = Workspace::default();
        let work = folder(&mut ws);
        let id = create(&mut ws, "Plan", work, "").unwrap().affected_notes[0].id;
        tabs::open_note(&mut ws, id).unwrap();

        let result = delete(&mut ws, id).unwrap();
        assert_eq!(result.closed_tabs.len(), 1);
        assert!(ws.tabs.find(&TabTarget::Note(id)).is_none());
        assert!(ws.entities.note(id).is_none());
    }
}

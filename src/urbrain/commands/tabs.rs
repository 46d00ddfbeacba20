use crate::commands::{CmdMessage, CmdResult, Effect};
use crate::error::{Result, UrbrainError};
use crate::model::{FolderId, NoteId};
use crate::tabs::{CloseOutcome, OpenOutcome, TabId, TabTarget};
use crate::workspace::Workspace;

fn opened(outcome: OpenOutcome) -> CmdResult {
    let mut result = CmdResult::default().with_effects(&[Effect::Render]);
    result.opened_tab = Some(outcome.tab_id());
    result
}

pub fn open_folder(ws: &mut Workspace, id: FolderId) -> Result<CmdResult> {
    let name = ws
        .entities
        .folder(id)
        .map(|f| f.name.clone())
        .ok_or(UrbrainError::FolderNotFound(id))?;
    Ok(opened(ws.tabs.open(TabTarget::Folder(id), name)))
}

pub fn open_note(ws: &mut Workspace, id: NoteId) -> Result<CmdResult> {
    let title = ws
        .entities
        .note(id)
        .map(|n| n.title.clone())
        .ok_or(UrbrainError::NoteNotFound(id))?;
    Ok(opened(ws.tabs.open(TabTarget::Note(id), title)))
}

pub fn open_home(ws: &mut Workspace) -> Result<CmdResult> {
    Ok(opened(OpenOutcome::Created(ws.tabs.open_home())))
}

pub fn switch(ws: &mut Workspace, id: TabId) -> Result<CmdResult> {
    ws.tabs.switch(id)?;
    Ok(CmdResult::default().with_effects(&[Effect::Render]))
}

pub fn close(ws: &mut Workspace, id: TabId) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match ws.tabs.close(id)? {
        CloseOutcome::Closed => {
            result.closed_tabs.push(id);
            result.add_effect(Effect::Render);
        }
        CloseOutcome::Refused => {
            result.add_message(CmdMessage::info("Cannot close the last tab."));
        }
    }
    Ok(result)
}

pub fn reorder(ws: &mut Workspace, dragged: TabId, target: TabId) -> Result<CmdResult> {
    if dragged == target {
        return Ok(CmdResult::default());
    }
    ws.tabs.reorder(dragged, target)?;
    Ok(CmdResult::default().with_effects(&[Effect::Render]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{folders, notes};

    #[test]
    fn open_same_folder_twice_switches() {
        let mut ws = Workspace::default();
        let work = folders::create(&mut ws, "Work", None).unwrap().affected_folders[0].id;

        let first = open_folder(&mut ws, work).unwrap().opened_tab.unwrap();
        open_home(&mut ws).unwrap();
        let second = open_folder(&mut ws, work).unwrap().opened_tab.unwrap();

        assert_eq!(first, second);
        assert_eq!(ws.tabs.len(), 3);
        assert_eq!(ws.tabs.active_id(), first);
    }

    #[test]
    fn open_missing_entities_fails() {
        let mut ws = Workspace::default();
        assert!(open_folder(&mut ws, FolderId::new()).is_err());
        assert!(open_note(&mut ws, NoteId::new()).is_err());
        assert_eq!(ws.tabs.len(), 1);
    }

    #[test]
    fn note_tab_uses_note_title() {
        let mut ws = Workspace::default();
        let work = folders::create(&mut ws, "Work", None).unwrap().affected_folders[0].id;
        let plan = notes::create(&mut ws, "Plan", work, "").unwrap().affected_notes[0].id;

        open_note(&mut ws, plan).unwrap();
        assert_eq!(ws.tabs.active().title, "Plan");
        assert_eq!(ws.tabs.active().target, TabTarget::Note(plan));
    }

    #[test]
    fn closing_last_tab_reports_and_keeps_it() {
        let mut ws = Workspace::default();
        let only = ws.tabs.active_id();
        let result = close(&mut ws, only).unwrap();
        assert!(result.closed_tabs.is_empty());
        assert!(!result.renders());
        assert_eq!(ws.tabs.len(), 1);
    }

    #[test]
    fn switch_to_unknown_tab_errors() {
        let mut ws = Workspace::default();
        assert!(matches!(
            switch(&mut ws, TabId(77)),
            Err(UrbrainError::TabNotFound(_))
        ));
    }
}

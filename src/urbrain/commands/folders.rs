use crate::commands::{plural, CmdMessage, CmdResult, Collection, DeletionPreview, Effect};
use crate::entities::RenameOutcome;
use crate::error::{Result, UrbrainError};
use crate::model::FolderId;
use crate::tabs::TabTarget;
use crate::workspace::Workspace;

pub fn create(ws: &mut Workspace, name: &str, parent: Option<FolderId>) -> Result<CmdResult> {
    let folder = ws.entities.create_folder(name, parent)?;

    let mut result =
        CmdResult::default().with_effects(&[Effect::Persist(Collection::Folders), Effect::Render]);
    result.add_message(CmdMessage::success(format!(
        "Folder created: {}",
        folder.name
    )));
    result.affected_folders.push(folder);
    Ok(result)
}

pub fn rename(ws: &mut Workspace, id: FolderId, name: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match ws.entities.rename_folder(id, name)? {
        RenameOutcome::Unchanged => {
            result.add_message(CmdMessage::info("Folder name unchanged."));
        }
        RenameOutcome::Renamed { previous } => {
            let folder = ws
                .entities
                .folder(id)
                .cloned()
                .ok_or(UrbrainError::FolderNotFound(id))?;
            ws.tabs.sync_title(&TabTarget::Folder(id), &folder.name);
            result.add_message(CmdMessage::success(format!(
                "Folder renamed: {} -> {}",
                previous, folder.name
            )));
            result.affected_folders.push(folder);
            result.add_effect(Effect::Persist(Collection::Folders));
            result.add_effect(Effect::Render);
        }
    }
    Ok(result)
}

/// Counts shown in the delete confirmation. Does not mutate.
pub fn preview_delete(ws: &mut Workspace, id: FolderId) -> Result<CmdResult> {
    let preview = build_preview(ws, id)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::warning(preview.prompt()));
    result.preview = Some(preview);
    Ok(result)
}

pub fn build_preview(ws: &Workspace, id: FolderId) -> Result<DeletionPreview> {
    let folder = ws
        .entities
        .folder(id)
        .ok_or(UrbrainError::FolderNotFound(id))?;
    let hierarchy = ws.entities.hierarchy();
    Ok(DeletionPreview {
        folder: id,
        name: folder.name.clone(),
        item_count: hierarchy.item_count(id),
        descendant_count: hierarchy.descendant_folder_ids(id)?.len(),
    })
}

/// Deletes the folder with everything under it and retires the tabs that
/// were showing any of it.
pub fn delete(ws: &mut Workspace, id: FolderId) -> Result<CmdResult> {
    let report = ws.entities.delete_folder_cascade(id)?;
    let mut result = CmdResult::default();

    if report.is_empty() {
        result.add_message(CmdMessage::info(format!("No folder {} to delete.", id)));
        return Ok(result);
    }

    let folder_ids = report.folder_ids();
    let note_ids = report.note_ids();
    result.closed_tabs = ws.tabs.retire(|target| match target {
        TabTarget::Folder(f) => folder_ids.contains(f),
        TabTarget::Note(n) => note_ids.contains(n),
        _ => false,
    });

    let subfolders = report.folders.len() - 1;
    let mut text = format!("Folder deleted: {}", report.folders[0].name);
    if subfolders > 0 || !report.notes.is_empty() {
        text.push_str(&format!(
            " ({} subfolder{}, {} note{})",
            subfolders,
            plural(subfolders),
            report.notes.len(),
            plural(report.notes.len())
        ));
    }
    result.add_message(CmdMessage::success(text));

    result.add_effect(Effect::Persist(Collection::Folders));
    if !report.notes.is_empty() {
        result.add_effect(Effect::Persist(Collection::Notes));
    }
    result.add_effect(Effect::Render);
    result.affected_folders = report.folders;
    result.affected_notes = report.notes;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{notes, tabs};

    fn work_with_plan(ws: &mut Workspace) -> (FolderId, crate::model::NoteId) {
        let work = create(ws, "Work", None).unwrap().affected_folders[0].id;
        let plan = notes::create(ws, "Plan", work, "").unwrap().affected_notes[0].id;
        (work, plan)
    }

    #[test]
    fn create_requests_persist_and_render() {
        let mut ws = Workspace::default();
        let result = create(&mut ws, "Work", None).unwrap();
        assert!(result.persists(Collection::Folders));
        assert!(result.renders());
        assert_eq!(ws.entities.folders().len(), 1);
    }

    #[test]
    fn create_blank_is_validation_error() {
        let mut ws = Workspace::default();
        assert!(matches!(
            create(&mut ws, "  ", None),
            Err(UrbrainError::Validation(_))
        ));
    }

    #[test]
    fn rename_syncs_open_tab_titles() {
        let mut ws = Workspace::default();
        let (work, _) = work_with_plan(&mut ws);
        tabs::open_folder(&mut ws, work).unwrap();

        let result = rename(&mut ws, work, "Job").unwrap();
        assert!(result.persists(Collection::Folders));
        assert_eq!(ws.tabs.active().title, "Job");
    }

    #[test]
    fn rename_to_same_name_has_no_effects() {
        let mut ws = Workspace::default();
        let (work, _) = work_with_plan(&mut ws);
        let result = rename(&mut ws, work, "Work").unwrap();
        assert!(result.effects.is_empty());
    }

    #[test]
    fn preview_reports_shallow_items_and_deep_descendants() {
        let mut ws = Workspace::default();
        let (work, _) = work_with_plan(&mut ws);
        let sub = create(&mut ws, "Sub", Some(work)).unwrap().affected_folders[0].id;
        create(&mut ws, "Deep", Some(sub)).unwrap();

        let result = preview_delete(&mut ws, work).unwrap();
        let preview = result.preview.unwrap();
        assert_eq!(preview.item_count, 2);
        assert_eq!(preview.descendant_count, 2);
        assert_eq!(ws.entities.folders().len(), 3);
    }

    #[test]
    fn delete_closes_folder_and_note_tabs() {
        let mut ws = Workspace::default();
        let home = ws.tabs.active_id();
        let (work, plan) = work_with_plan(&mut ws);
        tabs::open_folder(&mut ws, work).unwrap();
        tabs::open_note(&mut ws, plan).unwrap();

        let result = delete(&mut ws, work).unwrap();

        assert_eq!(result.closed_tabs.len(), 2);
        assert!(result.persists(Collection::Folders));
        assert!(result.persists(Collection::Notes));
        assert_eq!(ws.tabs.len(), 1);
        assert_eq!(ws.tabs.active_id(), home);
        assert!(ws.entities.notes().is_empty());
    }

    #[test]
    fn delete_closes_tabs_of_nested_notes() {
        let mut ws = Workspace::default();
        let (work, _) = work_with_plan(&mut ws);
        let sub = create(&mut ws, "Sub", Some(work)).unwrap().affected_folders[0].id;
        let deep = notes::create(&mut ws, "Deep", sub, "").unwrap().affected_notes[0].id;
        tabs::open_note(&mut ws, deep).unwrap();

        delete(&mut ws, work).unwrap();
        assert!(ws.tabs.tabs().iter().all(|t| t.target == TabTarget::Home));
    }

    #[test]
    fn delete_unknown_is_harmless() {
        let mut ws = Workspace::default();
        let result = delete(&mut ws, FolderId::new()).unwrap();
        assert!(result.effects.is_empty());
        assert_eq!(ws.tabs.len(), 1);
    }
}

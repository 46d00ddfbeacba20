use crate::commands::{CmdMessage, CmdResult, Collection, Effect};
use crate::error::Result;
use crate::workspace::Workspace;

/// Wipes every folder, note and sticky note and starts a fresh tab strip.
pub fn run(ws: &mut Workspace) -> Result<CmdResult> {
    let folders = ws.entities.folders().len();
    let notes = ws.entities.notes().len();

    ws.entities.clear();
    ws.stickies.clear();
    ws.tabs.reset();

    let mut result = CmdResult::default().with_effects(&[
        Effect::Persist(Collection::Folders),
        Effect::Persist(Collection::Notes),
        Effect::Persist(Collection::Stickies),
        Effect::Render,
    ]);
    result.add_message(CmdMessage::success(format!(
        "All data cleared ({} folders, {} notes).",
        folders, notes
    )));
    Ok(result)
}

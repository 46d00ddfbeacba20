use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::workspace::Workspace;

/// Reports inconsistencies in the loaded data. Nothing is repaired.
pub fn run(ws: &Workspace) -> Result<CmdResult> {
    let issues = ws.entities.check_integrity();
    let mut result = CmdResult::default();

    if issues.is_empty() {
        result.add_message(CmdMessage::success("No inconsistencies found."));
    } else {
        result.add_message(CmdMessage::warning(format!(
            "{} inconsistenc{} found:",
            issues.len(),
            if issues.len() == 1 { "y" } else { "ies" }
        )));
        for issue in &issues {
            result.add_message(CmdMessage::info(format!("  - {}", issue)));
        }
    }

    result.issues = issues;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EntityStore, IntegrityIssue};
    use crate::model::{FolderId, Note};

    #[test]
    fn clean_workspace_reports_success() {
        let ws = Workspace::default();
        let result = run(&ws).unwrap();
        assert!(result.issues.is_empty());
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn orphan_note_is_listed() {
        let orphan = Note::new("lost".into(), FolderId::new(), String::new());
        let ws = Workspace::new(EntityStore::from_parts(vec![], vec![orphan.clone()]), vec![]);

        let result = run(&ws).unwrap();
        assert_eq!(
            result.issues,
            vec![IntegrityIssue::OrphanNote {
                note: orphan.id,
                folder: orphan.folder_id
            }]
        );
        assert_eq!(result.messages.len(), 2);
    }
}

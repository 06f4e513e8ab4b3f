use crate::backup::Backup;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::sanitize::drafts_from_values;
use crate::todos::restore_todos;

/// Describes a backup without importing it.
pub fn run(backup: &Backup) -> Result<CmdResult> {
    let (drafts, malformed) = drafts_from_values(backup.bookmarks());
    let (todos, _) = restore_todos(backup.todos());
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "{} bookmark(s), {} folder(s), {} todo(s), settings {}",
        drafts.len(),
        backup.folders().len(),
        todos.len(),
        if backup.settings().is_some() {
            "included"
        } else {
            "not included"
        }
    )));
    if malformed > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} unreadable bookmark entr(ies)",
            malformed
        )));
    }
    let extra: Vec<String> = backup.passthrough().keys().cloned().collect();
    if !extra.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Other data kept as is: {}",
            extra.join(", ")
        )));
    }
    Ok(result.with_backup(backup.clone()))
}

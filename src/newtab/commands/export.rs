use crate::backup::Backup;
use crate::commands::helpers::library_record;
use crate::commands::todos::todos_record;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Library;
use crate::settings::Settings;
use crate::store::DataStore;
use crate::todos::Todo;

/// Wraps the whole store in a backup envelope. The live library, settings and
/// todos replace whatever the store holds for their keys, so the backup
/// carries the repaired versions.
pub fn run<S: DataStore>(
    store: &S,
    library: &Library,
    settings: &Settings,
    todos: &[Todo],
) -> Result<CmdResult> {
    let mut data = store.get_all()?;
    data.extend(library_record(library)?);
    data.extend(settings.to_record()?);
    data.extend(todos_record(todos)?);

    let backup = Backup::new(data);
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "Exported {} bookmark(s) in {} folder(s)",
        library.bookmarks.len(),
        library.folders.len()
    )));
    Ok(result.with_backup(backup))
}

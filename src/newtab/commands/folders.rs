use crate::commands::helpers::commit;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NewtabError, Result};
use crate::folders::{self, is_sentinel};
use crate::model::Library;
use crate::store::DataStore;

pub fn add<S: DataStore>(store: &mut S, library: &mut Library, name: &str) -> Result<CmdResult> {
    let name = name.trim();
    if name.is_empty() {
        return Err(NewtabError::Contract(
            "Folder name cannot be empty".to_string(),
        ));
    }

    let mut result = CmdResult::default();
    let mut next = library.clone();
    if !folders::add_folder(&mut next, name) {
        result.add_message(CmdMessage::info(format!("Folder already exists: {}", name)));
        return Ok(result);
    }
    commit(store, library, next)?;
    result.add_message(CmdMessage::success(format!("Folder added: {}", name)));
    Ok(result)
}

pub fn delete<S: DataStore>(
    store: &mut S,
    library: &mut Library,
    name: &str,
) -> Result<CmdResult> {
    let name = name.trim();
    let mut result = CmdResult::default();
    let mut next = library.clone();

    let Some(moved) = folders::delete_folder(&mut next, name) else {
        let reason = if is_sentinel(name) {
            format!("The {} folder cannot be deleted", name)
        } else {
            format!("No such folder: {}", name)
        };
        result.add_message(CmdMessage::warning(reason));
        return Ok(result);
    };

    commit(store, library, next)?;
    result.add_message(CmdMessage::success(format!("Folder deleted: {}", name)));
    if moved > 0 {
        result.add_message(CmdMessage::info(format!(
            "{} bookmark(s) moved to {}",
            moved,
            crate::model::SENTINEL_FOLDER
        )));
    }
    Ok(result)
}

pub fn rename<S: DataStore>(
    store: &mut S,
    library: &mut Library,
    from: &str,
    to: &str,
) -> Result<CmdResult> {
    let (from, to) = (from.trim(), to.trim());
    let mut next = library.clone();
    let moved = folders::rename_folder(&mut next, from, to)?;
    commit(store, library, next)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Folder renamed: {} -> {} ({} bookmark(s))",
        from, to, moved
    )));
    Ok(result)
}

use crate::commands::helpers::{commit, valid_url};
use crate::commands::{BookmarkUpdate, CmdMessage, CmdResult};
use crate::error::{NewtabError, Result};
use crate::folders::add_folder;
use crate::model::{BookmarkId, Library};
use crate::reorder::move_to_folder;
use crate::store::DataStore;
use crate::urls;

pub fn run<S: DataStore>(
    store: &mut S,
    library: &mut Library,
    id: &BookmarkId,
    update: BookmarkUpdate,
    favicon_size: u32,
) -> Result<CmdResult> {
    let idx = library
        .position(id)
        .ok_or_else(|| NewtabError::BookmarkNotFound(id.to_string()))?;

    let mut result = CmdResult::default();
    if update.is_empty() {
        result.add_message(CmdMessage::info("Nothing to change"));
        return Ok(result);
    }

    let mut next = library.clone();
    {
        let bookmark = &mut next.bookmarks[idx];
        if let Some(url) = &update.url {
            bookmark.url = valid_url(url)?;
        }
        if let Some(name) = &update.name {
            let name = name.trim();
            bookmark.name = if name.is_empty() {
                urls::hostname(&bookmark.url).unwrap_or_else(|| bookmark.url.clone())
            } else {
                name.to_string()
            };
        }
        if let Some(icon) = &update.icon {
            let icon = icon.trim();
            bookmark.icon = if icon.is_empty() {
                urls::favicon_url(&bookmark.url, favicon_size)
            } else {
                icon.to_string()
            };
        }
    }

    if let Some(folder) = &update.folder {
        next.bookmarks = move_to_folder(&next.bookmarks, id, folder)?;
        add_folder(&mut next, folder.trim());
    }

    commit(store, library, next)?;

    let updated = library.bookmarks[idx].clone();
    result.add_message(CmdMessage::success(format!(
        "Bookmark updated ({}): {}",
        updated.id.short(),
        updated.name
    )));
    Ok(result.with_affected_bookmarks(vec![updated]))
}

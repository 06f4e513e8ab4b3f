use crate::commands::helpers::commit;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NewtabError, Result};
use crate::model::{BookmarkId, Library};
use crate::sanitize::normalize_orders;
use crate::store::DataStore;

pub fn run<S: DataStore>(
    store: &mut S,
    library: &mut Library,
    ids: &[BookmarkId],
) -> Result<CmdResult> {
    let mut next = library.clone();
    let mut removed = Vec::with_capacity(ids.len());
    for id in ids {
        let idx = next
            .position(id)
            .ok_or_else(|| NewtabError::BookmarkNotFound(id.to_string()))?;
        removed.push(next.bookmarks.remove(idx));
    }
    normalize_orders(&mut next.bookmarks);
    commit(store, library, next)?;

    let mut result = CmdResult::default();
    for bookmark in &removed {
        result.add_message(CmdMessage::success(format!(
            "Bookmark deleted ({}): {}",
            bookmark.id.short(),
            bookmark.name
        )));
    }
    Ok(result.with_affected_bookmarks(removed))
}

use crate::commands::helpers::commit;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::folders::{add_folder, bookmarks_in};
use crate::model::{BookmarkId, Library};
use crate::reorder::{move_to_folder, reorder_within_folder};
use crate::store::DataStore;

/// Applies a new order to every bookmark of `folder`.
pub fn reorder<S: DataStore>(
    store: &mut S,
    library: &mut Library,
    folder: &str,
    ordered_ids: &[BookmarkId],
) -> Result<CmdResult> {
    let folder = folder.trim();
    let mut next = library.clone();
    next.bookmarks = reorder_within_folder(&library.bookmarks, folder, ordered_ids)?;
    commit(store, library, next)?;

    let listed = bookmarks_in(&library.bookmarks, folder)
        .into_iter()
        .cloned()
        .collect();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Folder reordered: {}", folder)));
    Ok(result.with_listed_bookmarks(listed))
}

/// Files a bookmark at the end of another folder, registering it if new.
pub fn move_to<S: DataStore>(
    store: &mut S,
    library: &mut Library,
    id: &BookmarkId,
    folder: &str,
) -> Result<CmdResult> {
    let folder = folder.trim();
    let mut next = library.clone();
    next.bookmarks = move_to_folder(&library.bookmarks, id, folder)?;
    add_folder(&mut next, folder);

    let mut result = CmdResult::default();
    if next == *library {
        result.add_message(CmdMessage::info(format!("Already in {}", folder)));
        return Ok(result);
    }
    commit(store, library, next)?;

    if let Some(moved) = library.find(id) {
        result.add_message(CmdMessage::success(format!(
            "Bookmark moved to {} ({}): {}",
            folder,
            moved.id.short(),
            moved.name
        )));
        result.affected_bookmarks.push(moved.clone());
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::helpers::load_library;
    use crate::error::NewtabError;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn setup() -> (InMemoryStore, Library) {
        let store = StoreFixture::new()
            .with_bookmark("id1", "https://1.com", "Work")
            .with_bookmark("id2", "https://2.com", "Work")
            .with_bookmark("id3", "https://3.com", "Work")
            .build();
        let library = load_library(&store).unwrap();
        (store, library)
    }

    fn ids(list: &[&str]) -> Vec<BookmarkId> {
        list.iter().map(|s| BookmarkId::from(*s)).collect()
    }

    #[test]
    fn reorder_persists_new_order() {
        let (mut store, mut library) = setup();
        let result = reorder(&mut store, &mut library, "Work", &ids(&["id3", "id1", "id2"])).unwrap();

        let listed: Vec<&str> = result.listed_bookmarks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(listed, vec!["id3", "id1", "id2"]);
        assert_eq!(load_library(&store).unwrap(), library);
    }

    #[test]
    fn rejected_reorder_writes_nothing() {
        let (mut store, mut library) = setup();
        let writes = store.writes();
        let err = reorder(&mut store, &mut library, "Work", &ids(&["id3"]));
        assert!(matches!(err, Err(NewtabError::Contract(_))));
        assert_eq!(store.writes(), writes);
    }

    #[test]
    fn move_registers_target() {
        let (mut store, mut library) = setup();
        move_to(&mut store, &mut library, &"id2".into(), "Later").unwrap();
        assert!(library.has_folder("Later"));
        assert_eq!(library.find(&"id2".into()).unwrap().folder, "Later");
    }

    #[test]
    fn move_to_same_folder_skips_write() {
        let (mut store, mut library) = setup();
        let writes = store.writes();
        move_to(&mut store, &mut library, &"id2".into(), "Work").unwrap();
        assert_eq!(store.writes(), writes);
    }

    #[test]
    fn failed_move_leaves_library() {
        let (mut store, mut library) = setup();
        let before = library.clone();
        store.set_simulate_write_error(true);
        assert!(move_to(&mut store, &mut library, &"id2".into(), "All").is_err());
        assert_eq!(library, before);
    }
}

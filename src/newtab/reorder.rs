//! # Reordering Engine
//!
//! Computes new per-folder orders after a drag inside a folder or a move
//! between folders. Both operations validate first and work on a copy, so a
//! rejected request leaves the input untouched and an accepted one returns a
//! complete, dense collection ready to persist.

use crate::error::{NewtabError, Result};
use crate::model::{Bookmark, BookmarkId};
use crate::sanitize::normalize_orders;
use std::collections::{HashMap, HashSet};

/// Sets `order = index` for each id in `ordered_ids`.
///
/// `ordered_ids` must be exactly the ids currently in `folder`.
pub fn reorder_within_folder(
    bookmarks: &[Bookmark],
    folder: &str,
    ordered_ids: &[BookmarkId],
) -> Result<Vec<Bookmark>> {
    let current: HashSet<&BookmarkId> = bookmarks
        .iter()
        .filter(|b| b.folder == folder)
        .map(|b| &b.id)
        .collect();

    let mut requested: HashMap<&BookmarkId, u32> = HashMap::with_capacity(ordered_ids.len());
    for (idx, id) in ordered_ids.iter().enumerate() {
        if !current.contains(id) {
            return Err(NewtabError::Contract(format!(
                "Bookmark {} is not in folder {}",
                id, folder
            )));
        }
        if requested.insert(id, idx as u32).is_some() {
            return Err(NewtabError::Contract(format!(
                "Bookmark {} listed more than once",
                id
            )));
        }
    }
    if requested.len() != current.len() {
        return Err(NewtabError::Contract(format!(
            "Reorder of {} lists {} of its {} bookmarks",
            folder,
            requested.len(),
            current.len()
        )));
    }

    let mut next = bookmarks.to_vec();
    for bookmark in next.iter_mut().filter(|b| b.folder == folder) {
        if let Some(&order) = requested.get(&bookmark.id) {
            bookmark.order = order;
        }
    }
    Ok(next)
}

/// Moves one bookmark to the end of `target`, then closes the gap in the
/// source folder and densifies the target.
pub fn move_to_folder(
    bookmarks: &[Bookmark],
    id: &BookmarkId,
    target: &str,
) -> Result<Vec<Bookmark>> {
    let target = target.trim();
    if target.is_empty() {
        return Err(NewtabError::Contract(
            "Target folder cannot be empty".to_string(),
        ));
    }
    let idx = bookmarks
        .iter()
        .position(|b| &b.id == id)
        .ok_or_else(|| NewtabError::BookmarkNotFound(id.to_string()))?;

    let mut next = bookmarks.to_vec();
    if next[idx].folder == target {
        return Ok(next);
    }

    let end = next
        .iter()
        .filter(|b| b.folder == target)
        .map(|b| b.order.saturating_add(1))
        .max()
        .unwrap_or(0);

    next[idx].folder = target.to_string();
    next[idx].order = end;
    normalize_orders(&mut next);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookmarkDraft;
    use crate::sanitize::restore;

    fn work() -> Vec<Bookmark> {
        restore(
            vec![
                BookmarkDraft::new("https://1.com").with_id("id1").with_folder("Work"),
                BookmarkDraft::new("https://2.com").with_id("id2").with_folder("Work"),
                BookmarkDraft::new("https://3.com").with_id("id3").with_folder("Work"),
                BookmarkDraft::new("https://home.com").with_id("home"),
            ],
            &[],
        )
        .bookmarks
    }

    fn order_of(bookmarks: &[Bookmark], id: &str) -> (String, u32) {
        let b = bookmarks.iter().find(|b| b.id.as_str() == id).unwrap();
        (b.folder.clone(), b.order)
    }

    fn ids(list: &[&str]) -> Vec<BookmarkId> {
        list.iter().map(|s| BookmarkId::from(*s)).collect()
    }

    #[test]
    fn reorder_assigns_index_as_order() {
        let out = reorder_within_folder(&work(), "Work", &ids(&["id3", "id1", "id2"])).unwrap();
        assert_eq!(order_of(&out, "id3").1, 0);
        assert_eq!(order_of(&out, "id1").1, 1);
        assert_eq!(order_of(&out, "id2").1, 2);
        assert_eq!(order_of(&out, "home"), ("All".to_string(), 0));
    }

    #[test]
    fn reorder_rejects_missing_ids() {
        let err = reorder_within_folder(&work(), "Work", &ids(&["id3", "id1"]));
        assert!(matches!(err, Err(NewtabError::Contract(_))));
    }

    #[test]
    fn reorder_rejects_foreign_ids() {
        let err = reorder_within_folder(&work(), "Work", &ids(&["id3", "id1", "home"]));
        assert!(matches!(err, Err(NewtabError::Contract(_))));
    }

    #[test]
    fn reorder_rejects_repeated_ids() {
        let err = reorder_within_folder(&work(), "Work", &ids(&["id3", "id3", "id1", "id2"]));
        assert!(matches!(err, Err(NewtabError::Contract(_))));
    }

    #[test]
    fn reorder_of_empty_folder_with_empty_list_is_fine() {
        let before = work();
        let out = reorder_within_folder(&before, "Nothing", &[]).unwrap();
        assert_eq!(out, before);
    }

    #[test]
    fn move_appends_and_closes_gap() {
        let out = move_to_folder(&work(), &"id1".into(), "All").unwrap();
        assert_eq!(order_of(&out, "id1"), ("All".to_string(), 1));
        assert_eq!(order_of(&out, "id2"), ("Work".to_string(), 0));
        assert_eq!(order_of(&out, "id3"), ("Work".to_string(), 1));
    }

    #[test]
    fn move_to_new_folder_starts_at_zero() {
        let out = move_to_folder(&work(), &"id2".into(), "Fresh").unwrap();
        assert_eq!(order_of(&out, "id2"), ("Fresh".to_string(), 0));
        assert_eq!(order_of(&out, "id3"), ("Work".to_string(), 1));
    }

    #[test]
    fn move_to_same_folder_is_noop() {
        let before = work();
        let out = move_to_folder(&before, &"id2".into(), "Work").unwrap();
        assert_eq!(out, before);
    }

    #[test]
    fn move_unknown_id_fails() {
        let err = move_to_folder(&work(), &"ghost".into(), "Work");
        assert!(matches!(err, Err(NewtabError::BookmarkNotFound(_))));
    }

    #[test]
    fn move_then_reorder_positions_in_target() {
        let moved = move_to_folder(&work(), &"home".into(), "Work").unwrap();
        let out =
            reorder_within_folder(&moved, "Work", &ids(&["home", "id1", "id2", "id3"])).unwrap();
        assert_eq!(order_of(&out, "home"), ("Work".to_string(), 0));
        assert_eq!(order_of(&out, "id3"), ("Work".to_string(), 3));
    }
}

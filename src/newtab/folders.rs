//! # Folder Registry
//!
//! Folders have no record of their own: a folder is a name in the registry
//! plus the bookmarks whose `folder` field equals it. The registry must always
//! contain the sentinel folder and every folder some bookmark points at, so it
//! can always be rebuilt from an explicit list and the bookmarks.
//!
//! The sentinel folder uses explicit membership: it lists only the bookmarks
//! filed under it, not every bookmark.

use crate::error::{NewtabError, Result};
use crate::model::{Bookmark, Library, SENTINEL_FOLDER};
use crate::sanitize::normalize_orders;
use std::collections::HashSet;

pub fn is_sentinel(name: &str) -> bool {
    name == SENTINEL_FOLDER
}

/// Union of the sentinel, the explicit list and every bookmark's folder,
/// without duplicates, in first-seen order with the sentinel first.
pub fn list_folders(explicit: &[String], bookmarks: &[Bookmark]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut folders = Vec::new();

    let candidates = std::iter::once(SENTINEL_FOLDER)
        .chain(explicit.iter().map(String::as_str))
        .chain(bookmarks.iter().map(|b| b.folder.as_str()));

    for name in candidates {
        if name.trim().is_empty() {
            continue;
        }
        if seen.insert(name) {
            folders.push(name.to_string());
        }
    }

    folders
}

/// Members of `folder`, sorted by `(order, id)`.
pub fn bookmarks_in<'a>(bookmarks: &'a [Bookmark], folder: &str) -> Vec<&'a Bookmark> {
    let mut members: Vec<&Bookmark> = bookmarks.iter().filter(|b| b.folder == folder).collect();
    members.sort_by(|a, b| a.rank().cmp(&b.rank()));
    members
}

/// Appends `name` unless it is already registered. Returns whether it was added.
pub fn add_folder(library: &mut Library, name: &str) -> bool {
    if library.has_folder(name) {
        return false;
    }
    library.folders.push(name.to_string());
    true
}

/// Removes `name` from the registry and files its bookmarks under the
/// sentinel folder, after the bookmarks already there.
///
/// Returns `None` for the sentinel or an unknown folder, otherwise how many
/// bookmarks were moved.
pub fn delete_folder(library: &mut Library, name: &str) -> Option<usize> {
    if is_sentinel(name) || !library.has_folder(name) {
        return None;
    }

    let base = library
        .bookmarks
        .iter()
        .filter(|b| is_sentinel(&b.folder))
        .map(|b| b.order + 1)
        .max()
        .unwrap_or(0);

    let mut moving: Vec<usize> = library
        .bookmarks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.folder == name)
        .map(|(idx, _)| idx)
        .collect();
    moving.sort_by(|&a, &b| {
        library.bookmarks[a]
            .rank()
            .cmp(&library.bookmarks[b].rank())
    });

    for (offset, idx) in moving.iter().enumerate() {
        let bookmark = &mut library.bookmarks[*idx];
        bookmark.folder = SENTINEL_FOLDER.to_string();
        bookmark.order = base.saturating_add(offset as u32);
    }

    library.folders.retain(|f| f != name);
    normalize_orders(&mut library.bookmarks);

    Some(moving.len())
}

/// Renames a folder in place; its bookmarks follow. Returns how many
/// bookmarks moved.
pub fn rename_folder(library: &mut Library, from: &str, to: &str) -> Result<usize> {
    if is_sentinel(from) {
        return Err(NewtabError::Contract(format!(
            "The {} folder cannot be renamed",
            SENTINEL_FOLDER
        )));
    }
    if to.trim().is_empty() {
        return Err(NewtabError::Contract(
            "Folder name cannot be empty".to_string(),
        ));
    }
    let Some(slot) = library.folders.iter().position(|f| f == from) else {
        return Err(NewtabError::Contract(format!("No such folder: {}", from)));
    };
    if library.has_folder(to) {
        return Err(NewtabError::Contract(format!(
            "Folder already exists: {}",
            to
        )));
    }

    library.folders[slot] = to.to_string();
    let mut moved = 0;
    for bookmark in library.bookmarks.iter_mut().filter(|b| b.folder == from) {
        bookmark.folder = to.to_string();
        moved += 1;
    }
    Ok(moved)
}

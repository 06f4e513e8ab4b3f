use crate::commands::{CmdMessage, CmdResult, FolderEntry};
use crate::error::Result;
use crate::folders::bookmarks_in;
use crate::model::Library;

/// Members of one folder, or every bookmark grouped by registry order.
pub fn run(library: &Library, folder: Option<&str>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let listed = match folder.map(str::trim) {
        Some(name) => {
            if !library.has_folder(name) {
                result.add_message(CmdMessage::warning(format!("No such folder: {}", name)));
            }
            bookmarks_in(&library.bookmarks, name)
                .into_iter()
                .cloned()
                .collect()
        }
        None => library
            .folders
            .iter()
            .flat_map(|f| bookmarks_in(&library.bookmarks, f))
            .cloned()
            .collect(),
    };
    Ok(result.with_listed_bookmarks(listed))
}

pub fn folders(library: &Library) -> Result<CmdResult> {
    let entries = library
        .folders
        .iter()
        .map(|name| FolderEntry {
            name: name.clone(),
            count: library.bookmarks.iter().filter(|b| &b.folder == name).count(),
        })
        .collect();
    Ok(CmdResult::default().with_folders(entries))
}

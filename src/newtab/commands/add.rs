use crate::commands::helpers::{commit, folder_name, valid_url};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::folders::add_folder;
use crate::model::{Bookmark, BookmarkId, Library};
use crate::store::DataStore;
use crate::urls;

#[derive(Debug, Clone, Default)]
pub struct NewBookmark {
    pub url: String,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub folder: Option<String>,
}

impl NewBookmark {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn in_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

pub fn run<S: DataStore>(
    store: &mut S,
    library: &mut Library,
    input: NewBookmark,
    favicon_size: u32,
) -> Result<CmdResult> {
    let url = valid_url(&input.url)?;
    let folder = folder_name(input.folder.as_deref());

    let name = input
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .or_else(|| urls::hostname(&url))
        .unwrap_or_else(|| url.clone());
    let icon = input
        .icon
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .unwrap_or_else(|| urls::favicon_url(&url, favicon_size));
    let order = library
        .bookmarks
        .iter()
        .filter(|b| b.folder == folder)
        .map(|b| b.order.saturating_add(1))
        .max()
        .unwrap_or(0);

    let bookmark = Bookmark {
        id: BookmarkId::generate(),
        url,
        name,
        icon,
        folder: folder.clone(),
        order,
    };

    let mut next = library.clone();
    next.bookmarks.push(bookmark.clone());
    add_folder(&mut next, &folder);
    commit(store, library, next)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Bookmark added to {} ({}): {}",
        folder,
        bookmark.id.short(),
        bookmark.name
    )));
    Ok(result.with_affected_bookmarks(vec![bookmark]))
}

use crate::backup::Backup;
use crate::config::NewtabConfig;
use crate::model::Bookmark;
use crate::settings::Settings;
use crate::todos::Todo;

pub mod add;
pub mod config;
pub mod delete;
pub mod export;
pub mod folders;
pub mod helpers;
pub mod import;
pub mod inspect;
pub mod list;
pub mod reorder;
pub mod settings;
pub mod todos;
pub mod update;
pub mod wallpaper;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A registered folder and how many bookmarks are filed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub name: String,
    pub count: usize,
}

/// Counts of what an import did with the incoming bookmarks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub duplicates: usize,
    pub malformed: usize,
    pub unkeyable: usize,
    /// Bookmarks whose URL is not http or https.
    pub unsupported: usize,
    /// Todos in the result, when the backup carried a todo list.
    pub todos: Option<usize>,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_bookmarks: Vec<Bookmark>,
    pub listed_bookmarks: Vec<Bookmark>,
    pub folders: Vec<FolderEntry>,
    pub todos: Vec<Todo>,
    pub settings: Option<Settings>,
    pub backup: Option<Backup>,
    pub import_report: Option<ImportReport>,
    pub config: Option<NewtabConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_bookmarks(mut self, bookmarks: Vec<Bookmark>) -> Self {
        self.affected_bookmarks = bookmarks;
        self
    }

    pub fn with_listed_bookmarks(mut self, bookmarks: Vec<Bookmark>) -> Self {
        self.listed_bookmarks = bookmarks;
        self
    }

    pub fn with_folders(mut self, folders: Vec<FolderEntry>) -> Self {
        self.folders = folders;
        self
    }

    pub fn with_todos(mut self, todos: Vec<Todo>) -> Self {
        self.todos = todos;
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_backup(mut self, backup: Backup) -> Self {
        self.backup = Some(backup);
        self
    }

    pub fn with_config(mut self, config: NewtabConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// A partial edit of one bookmark. `None` leaves the field alone; an empty
/// name or icon falls back to the generated default.
#[derive(Debug, Clone, Default)]
pub struct BookmarkUpdate {
    pub url: Option<String>,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub folder: Option<String>,
}

impl BookmarkUpdate {
    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.name.is_none() && self.icon.is_none() && self.folder.is_none()
    }
}

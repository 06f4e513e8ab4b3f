use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// The default folder. Always present, never deleted or renamed.
pub const SENTINEL_FOLDER: &str = "All";

/// Stable bookmark identity.
///
/// New ids are random v4 UUIDs. Ids that came from older data (millisecond
/// timestamps stored as numbers, or arbitrary strings) are kept verbatim so a
/// bookmark never changes identity on load or import.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BookmarkId(String);

impl BookmarkId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// First eight characters, enough to tell bookmarks apart in listings.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookmarkId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BookmarkId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for BookmarkId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        id_text(deserializer).map(BookmarkId)
    }
}

/// Reads a stored id that may be text or a legacy numeric timestamp.
pub(crate) fn id_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Unsigned(n) => n.to_string(),
        RawId::Signed(n) => n.to_string(),
    })
}

/// A fully validated bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: BookmarkId,
    pub url: String,
    pub name: String,
    pub icon: String,
    pub folder: String,
    pub order: u32,
}

impl Bookmark {
    /// Sort key giving the strict per-folder ordering.
    pub fn rank(&self) -> (u32, &BookmarkId) {
        (self.order, &self.id)
    }
}

/// A bookmark as it may appear in storage or in a backup: everything but the
/// URL is optional. The sanitizer is the only place that turns drafts into
/// [`Bookmark`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkDraft {
    #[serde(default)]
    pub id: Option<BookmarkId>,
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default, deserialize_with = "lenient_order")]
    pub order: Option<u32>,
}

impl BookmarkDraft {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<BookmarkId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl From<&Bookmark> for BookmarkDraft {
    fn from(b: &Bookmark) -> Self {
        Self {
            id: Some(b.id.clone()),
            url: b.url.clone(),
            name: Some(b.name.clone()),
            icon: Some(b.icon.clone()),
            folder: Some(b.folder.clone()),
            order: Some(b.order),
        }
    }
}

// Orders that are negative, fractional or out of range count as missing.
fn lenient_order<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_u64())
        .and_then(|n| u32::try_from(n).ok()))
}

/// Bookmarks plus the folder registry, persisted together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    pub bookmarks: Vec<Bookmark>,
    pub folders: Vec<String>,
}

impl Default for Library {
    fn default() -> Self {
        Self {
            bookmarks: Vec::new(),
            folders: vec![SENTINEL_FOLDER.to_string()],
        }
    }
}

impl Library {
    pub fn find(&self, id: &BookmarkId) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| &b.id == id)
    }

    pub fn position(&self, id: &BookmarkId) -> Option<usize> {
        self.bookmarks.iter().position(|b| &b.id == id)
    }

    pub fn has_folder(&self, name: &str) -> bool {
        self.folders.iter().any(|f| f == name)
    }
}

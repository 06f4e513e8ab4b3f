//! # Storage Layer
//!
//! The page persists everything through a key/value store that the browser
//! may synchronize between devices. [`DataStore`] is that contract: read some
//! keys, read everything, write a record of keys in one go.
//!
//! ## Keys
//!
//! - `settings`: the full [`Settings`](crate::settings::Settings) object
//! - `bookmarks`: the bookmark list
//! - `folders`: the explicit folder registry
//! - `todos`: the todo list
//!
//! Backups may carry other keys (data written by features this crate does not
//! know about); they are stored and exported untouched.
//!
//! ## Atomicity
//!
//! A `set` call either stores every key of the record or none of them. The
//! command layer relies on this to write bookmarks and folders together, so a
//! reader never sees bookmarks pointing at an unregistered folder.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: the whole record in one `sync.json`, replaced
//!   atomically on every write.
//! - [`memory::InMemoryStore`]: for tests; can simulate failed writes.
//! - [`blob`]: the separate byte store holding a local video wallpaper.

use crate::error::Result;
use serde_json::{Map, Value};

pub mod blob;
pub mod fs;
pub mod memory;

/// A set of stored keys and their JSON values.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Settings,
    Bookmarks,
    Folders,
    Todos,
}

impl StoreKey {
    pub const ALL: [StoreKey; 4] = [
        StoreKey::Settings,
        StoreKey::Bookmarks,
        StoreKey::Folders,
        StoreKey::Todos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Settings => "settings",
            StoreKey::Bookmarks => "bookmarks",
            StoreKey::Folders => "folders",
            StoreKey::Todos => "todos",
        }
    }
}

/// Abstract interface for the synchronized key/value store.
pub trait DataStore {
    /// Read the given keys. Keys that were never written are absent.
    fn get(&self, keys: &[StoreKey]) -> Result<Record>;

    /// Read every stored key.
    fn get_all(&self) -> Result<Record>;

    /// Store every key of `record`, leaving other keys alone. All or nothing.
    fn set(&mut self, record: Record) -> Result<()>;
}

/// Picks the requested keys out of a full record.
pub(crate) fn select(all: &Record, keys: &[StoreKey]) -> Record {
    keys.iter()
        .filter_map(|k| all.get(k.as_str()).map(|v| (k.as_str().to_string(), v.clone())))
        .collect()
}

use super::{select, DataStore, Record, StoreKey};
use crate::error::{NewtabError, Result};
use std::cell::Cell;

/// In-memory storage for testing and development.
/// Does NOT persist data.
///
/// Uses `Cell` for the failure switch so tests can flip it through a shared
/// reference while the store is owned by the API.
#[derive(Default)]
pub struct InMemoryStore {
    record: Record,
    simulate_write_error: Cell<bool>,
    writes: Cell<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `set` fail until switched off again.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl DataStore for InMemoryStore {
    fn get(&self, keys: &[StoreKey]) -> Result<Record> {
        Ok(select(&self.record, keys))
    }

    fn get_all(&self) -> Result<Record> {
        Ok(self.record.clone())
    }

    fn set(&mut self, record: Record) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(NewtabError::Store("Simulated write error".to_string()));
        }
        self.record.extend(record);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use serde_json::{json, Value};

    /// Builds an [`InMemoryStore`] holding raw stored data, the way a browser
    /// profile would hand it over: possibly legacy, possibly inconsistent.
    pub struct StoreFixture {
        pub store: InMemoryStore,
        bookmarks: Vec<Value>,
        folders: Vec<String>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                bookmarks: Vec::new(),
                folders: Vec::new(),
            }
        }

        pub fn with_bookmarks(mut self, count: usize, folder: &str) -> Self {
            for i in 0..count {
                let n = self.bookmarks.len();
                self.bookmarks.push(json!({
                    "id": format!("{}-{}", folder.to_lowercase(), n),
                    "url": format!("https://site{}.example/{}", n, folder.to_lowercase()),
                    "name": format!("{} {}", folder, i + 1),
                    "folder": folder,
                }));
            }
            self
        }

        pub fn with_bookmark(mut self, id: &str, url: &str, folder: &str) -> Self {
            self.bookmarks.push(json!({
                "id": id,
                "url": url,
                "folder": folder,
            }));
            self
        }

        /// Stores an arbitrary entry in the bookmark list, valid or not.
        pub fn with_raw_bookmark(mut self, raw: Value) -> Self {
            self.bookmarks.push(raw);
            self
        }

        pub fn with_folder(mut self, name: &str) -> Self {
            self.folders.push(name.to_string());
            self
        }

        pub fn with_settings(mut self, settings: Value) -> Self {
            let mut record = Record::new();
            record.insert(StoreKey::Settings.as_str().to_string(), settings);
            self.store.set(record).unwrap();
            self
        }

        pub fn with_todos(mut self, todos: Value) -> Self {
            let mut record = Record::new();
            record.insert(StoreKey::Todos.as_str().to_string(), todos);
            self.store.set(record).unwrap();
            self
        }

        pub fn build(mut self) -> InMemoryStore {
            let mut record = Record::new();
            if !self.bookmarks.is_empty() {
                record.insert(
                    StoreKey::Bookmarks.as_str().to_string(),
                    Value::Array(self.bookmarks),
                );
            }
            if !self.folders.is_empty() {
                record.insert(
                    StoreKey::Folders.as_str().to_string(),
                    json!(self.folders),
                );
            }
            if !record.is_empty() {
                self.store.set(record).unwrap();
            }
            self.store
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_merges_keys() {
        let mut store = InMemoryStore::new();
        let mut first = Record::new();
        first.insert("bookmarks".into(), json!([]));
        store.set(first).unwrap();

        let mut second = Record::new();
        second.insert("folders".into(), json!(["All"]));
        store.set(second).unwrap();

        let all = store.get_all().unwrap();
        assert!(all.contains_key("bookmarks"));
        assert!(all.contains_key("folders"));
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn get_returns_only_requested_keys() {
        let store = fixtures::StoreFixture::new()
            .with_bookmarks(2, "Work")
            .with_folder("Work")
            .build();
        let record = store.get(&[StoreKey::Folders]).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record["folders"], json!(["Work"]));
    }

    #[test]
    fn simulated_failure_leaves_record_untouched() {
        let mut store = InMemoryStore::new();
        store.set_simulate_write_error(true);
        let mut record = Record::new();
        record.insert("folders".into(), json!(["All"]));
        assert!(store.set(record).is_err());
        assert!(store.get_all().unwrap().is_empty());
    }
}

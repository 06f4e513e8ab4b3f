use crate::error::{NewtabError, Result};
use crate::model::{BookmarkId, Library};
use crate::sanitize::{drafts_from_values, restore};
use crate::store::{DataStore, Record, StoreKey};
use crate::urls;
use log::{debug, info, warn};
use serde_json::Value;

/// Reads bookmarks and folders and runs them through the repair passes.
pub fn load_library<S: DataStore>(store: &S) -> Result<Library> {
    let record = store.get(&[StoreKey::Bookmarks, StoreKey::Folders])?;

    let raw: &[Value] = match record.get(StoreKey::Bookmarks.as_str()) {
        Some(Value::Array(list)) => list.as_slice(),
        Some(other) => {
            warn!("stored bookmarks are not a list ({}), ignoring", other);
            &[]
        }
        None => &[],
    };
    let folders: Vec<String> = match record.get(StoreKey::Folders.as_str()) {
        Some(Value::Array(list)) => list
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    let (drafts, malformed) = drafts_from_values(raw);
    if malformed > 0 {
        warn!("dropped {} unreadable stored bookmarks", malformed);
    }
    let library = restore(drafts, &folders);
    debug!(
        "loaded {} bookmarks in {} folders",
        library.bookmarks.len(),
        library.folders.len()
    );
    Ok(library)
}

/// The `bookmarks` and `folders` keys as they are written to the store.
pub fn library_record(library: &Library) -> Result<Record> {
    let mut record = Record::new();
    record.insert(
        StoreKey::Bookmarks.as_str().to_string(),
        serde_json::to_value(&library.bookmarks)?,
    );
    record.insert(
        StoreKey::Folders.as_str().to_string(),
        serde_json::to_value(&library.folders)?,
    );
    Ok(record)
}

/// Persists `next` and, once the store has it, makes it the live library.
pub fn commit<S: DataStore>(store: &mut S, library: &mut Library, next: Library) -> Result<()> {
    store.set(library_record(&next)?)?;
    *library = next;
    info!(
        "saved {} bookmarks in {} folders",
        library.bookmarks.len(),
        library.folders.len()
    );
    Ok(())
}

/// Finds the one bookmark whose id is `id` or starts with `id`.
pub fn resolve_id(library: &Library, id: &str) -> Result<BookmarkId> {
    let id = id.trim();
    if id.is_empty() {
        return Err(NewtabError::Contract("Bookmark id cannot be empty".to_string()));
    }
    if let Some(exact) = library.bookmarks.iter().find(|b| b.id.as_str() == id) {
        return Ok(exact.id.clone());
    }

    let mut matches = library
        .bookmarks
        .iter()
        .filter(|b| b.id.as_str().starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Ok(only.id.clone()),
        (Some(_), Some(_)) => Err(NewtabError::Contract(format!(
            "Id prefix {} matches more than one bookmark",
            id
        ))),
        (None, _) => Err(NewtabError::BookmarkNotFound(id.to_string())),
    }
}

/// Normalizes and checks a user-supplied URL.
pub fn valid_url(raw: &str) -> Result<String> {
    let normalized = urls::normalize(raw);
    if !urls::is_valid(&normalized) {
        return Err(NewtabError::InvalidUrl(raw.trim().to_string()));
    }
    Ok(normalized)
}

/// Trimmed folder name, or the sentinel when blank.
pub fn folder_name(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => crate::model::SENTINEL_FOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;
    use serde_json::json;

    #[test]
    fn empty_store_loads_sentinel_only() {
        let store = InMemoryStore::new();
        let library = load_library(&store).unwrap();
        assert!(library.bookmarks.is_empty());
        assert_eq!(library.folders, vec!["All"]);
    }

    #[test]
    fn load_repairs_stored_data() {
        let store = StoreFixture::new()
            .with_bookmark("b", "https://b.com", "Work")
            .with_raw_bookmark(json!({"id": "a", "url": "https://a.com", "folder": "Work", "order": 7}))
            .with_raw_bookmark(json!({"name": "no url"}))
            .with_raw_bookmark(json!("garbage"))
            .build();
        let library = load_library(&store).unwrap();

        assert_eq!(library.bookmarks.len(), 2);
        assert_eq!(library.folders, vec!["All", "Work"]);
        let orders: Vec<u32> = library.bookmarks.iter().map(|b| b.order).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn commit_failure_keeps_library() {
        let mut store = InMemoryStore::new();
        let mut library = Library::default();
        let mut next = library.clone();
        next.folders.push("Work".into());

        store.set_simulate_write_error(true);
        assert!(commit(&mut store, &mut library, next.clone()).is_err());
        assert_eq!(library, Library::default());

        store.set_simulate_write_error(false);
        commit(&mut store, &mut library, next.clone()).unwrap();
        assert_eq!(library, next);
        assert_eq!(load_library(&store).unwrap(), next);
    }

    #[test]
    fn resolves_unique_prefixes() {
        let store = StoreFixture::new()
            .with_bookmark("abc123", "https://a.com", "All")
            .with_bookmark("abd456", "https://b.com", "All")
            .build();
        let library = load_library(&store).unwrap();

        assert_eq!(resolve_id(&library, "abc").unwrap().as_str(), "abc123");
        assert!(matches!(
            resolve_id(&library, "ab"),
            Err(NewtabError::Contract(_))
        ));
        assert!(matches!(
            resolve_id(&library, "zz"),
            Err(NewtabError::BookmarkNotFound(_))
        ));
    }

    #[test]
    fn rejects_non_web_urls() {
        assert_eq!(valid_url(" example.com ").unwrap(), "https://example.com");
        assert!(matches!(
            valid_url("ftp://files.example.com"),
            Err(NewtabError::InvalidUrl(_))
        ));
    }
}

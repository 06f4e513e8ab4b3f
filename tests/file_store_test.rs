use newtab::api::{ImportMode, NewBookmark, NewtabApi};
use newtab::backup::Backup;
use newtab::search::SearchEngine;
use newtab::store::fs::FileStore;
use newtab::store::{DataStore, Record, StoreKey};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn open(dir: &TempDir) -> NewtabApi<FileStore> {
    let store = FileStore::new(dir.path().to_path_buf());
    NewtabApi::open(store, dir.path().to_path_buf()).unwrap()
}

#[test]
fn test_set_merges_and_leaves_no_tmp_files() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path().join("nested"));

    let mut first = Record::new();
    first.insert("bookmarks".into(), json!([]));
    store.set(first).unwrap();
    let mut second = Record::new();
    second.insert("folders".into(), json!(["All"]));
    store.set(second).unwrap();

    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(
        store.get(&[StoreKey::Folders]).unwrap()["folders"],
        json!(["All"])
    );

    for entry in fs::read_dir(store.root()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_missing_record_reads_empty() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().to_path_buf());
    assert!(store.get_all().unwrap().is_empty());
    assert!(store.get(&StoreKey::ALL).unwrap().is_empty());
}

#[test]
fn test_corrupt_record_is_an_error() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().to_path_buf());
    fs::write(store.record_path(), "[1, 2, 3]").unwrap();
    assert!(store.get_all().is_err());
}

#[test]
fn test_state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut api = open(&dir);
        api.add_bookmark(NewBookmark::new("rust-lang.org").in_folder("Dev"))
            .unwrap();
        api.set_setting("layout", "searchEngine", "bing").unwrap();
    }

    let api = open(&dir);
    assert_eq!(api.library().bookmarks.len(), 1);
    assert_eq!(api.library().bookmarks[0].url, "https://rust-lang.org");
    assert_eq!(api.library().folders, vec!["All", "Dev"]);
    assert_eq!(
        api.settings().current().layout.search_engine,
        SearchEngine::Bing
    );
}

#[test]
fn test_legacy_profile_is_repaired_on_open() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("sync.json"),
        r#"{
            "bookmarks": [
                {"id": 1700000000001, "url": "https://a.com", "order": 3, "folder": "Work"},
                {"id": 1700000000001, "url": "https://dup.com"},
                {"url": "https://b.com", "folder": "Work", "order": "first"},
                {"title": "no url here"}
            ],
            "settings": {"wallpaper": {"type": "video", "blur": 99}},
            "todos": [{"text": "water plants"}, {"completed": true}],
            "weather": {"city": "Lisbon"}
        }"#,
    )
    .unwrap();

    let api = open(&dir);
    let library = api.library();
    assert_eq!(library.bookmarks.len(), 2);
    assert_eq!(library.bookmarks[0].id.as_str(), "1700000000001");
    assert_eq!(library.folders, vec!["All", "Work"]);
    let mut orders: Vec<u32> = library.bookmarks.iter().map(|b| b.order).collect();
    orders.sort();
    assert_eq!(orders, vec![0, 1]);
    assert_eq!(api.settings().current().wallpaper.blur, 20);

    assert_eq!(api.todos().len(), 1);
    assert!(!api.todos()[0].completed);

    let backup = api.export().unwrap().backup.unwrap();
    assert_eq!(backup.data["todos"][0]["text"], "water plants");
    assert_eq!(backup.data["weather"], json!({"city": "Lisbon"}));
}

#[test]
fn test_backup_file_roundtrip_between_profiles() {
    let source_dir = TempDir::new().unwrap();
    let target_dir = TempDir::new().unwrap();
    let backup_path = source_dir.path().join("backup.json.gz");

    let mut source = open(&source_dir);
    source
        .add_bookmark(NewBookmark::new("docs.rs").named("Docs").in_folder("Dev"))
        .unwrap();
    source.add_bookmark(NewBookmark::new("crates.io")).unwrap();
    source.set_setting("appearance", "dateFormat", "short").unwrap();
    let backup = source.export().unwrap().backup.unwrap();
    newtab::backup::write_file(&backup_path, &backup, true).unwrap();

    let restored: Backup = newtab::backup::read_file(&backup_path).unwrap();
    let mut target = open(&target_dir);
    target.import(&restored, ImportMode::Replace).unwrap();

    assert_eq!(target.library(), source.library());
    assert_eq!(target.settings().current(), source.settings().current());

    let reopened = open(&target_dir);
    assert_eq!(reopened.library(), source.library());
}

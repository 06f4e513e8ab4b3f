#![allow(deprecated)]
use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn newtab_cmd(data_dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("newtab"));
    cmd.env("NO_COLOR", "1").arg("--data-dir").arg(data_dir);
    cmd
}

const WORK_BACKUP: &str = r#"{
    "version": "1.0",
    "exportDate": "2024-03-01T10:00:00.000Z",
    "data": {
        "bookmarks": [
            {"id": "w1", "url": "https://one.example", "name": "One", "folder": "Work", "order": 0},
            {"id": "w2", "url": "https://two.example", "name": "Two", "folder": "Work", "order": 1},
            {"id": "w3", "url": "https://three.example", "name": "Three", "folder": "Work", "order": 2}
        ],
        "folders": ["All", "Work"],
        "notes": "kept"
    }
}"#;

fn seed_work_folder(data_dir: &Path, scratch: &TempDir) {
    let backup = scratch.path().join("work.json");
    fs::write(&backup, WORK_BACKUP).unwrap();
    newtab_cmd(data_dir)
        .args(["import"])
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 bookmark(s)"));
}

#[test]
fn test_add_then_list() {
    let data = TempDir::new().unwrap();

    newtab_cmd(data.path())
        .args(["add", "github.com", "--folder", "Work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bookmark added to Work"));

    newtab_cmd(data.path())
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work"))
        .stdout(predicate::str::contains("https://github.com"));

    newtab_cmd(data.path())
        .args(["folders"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All"))
        .stdout(predicate::str::contains("Work"));
}

#[test]
fn test_empty_profile_lists_nothing() {
    let data = TempDir::new().unwrap();
    newtab_cmd(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No bookmarks found."));
}

#[test]
fn test_reorder_and_move() {
    let data = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    seed_work_folder(data.path(), &scratch);

    newtab_cmd(data.path())
        .args(["reorder", "Work", "w3", "w1", "w2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Folder reordered: Work"));

    let output = newtab_cmd(data.path())
        .args(["list", "--folder", "Work"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let three = stdout.find("three.example").unwrap();
    let one = stdout.find("one.example").unwrap();
    let two = stdout.find("two.example").unwrap();
    assert!(three < one && one < two, "unexpected order:\n{}", stdout);

    newtab_cmd(data.path())
        .args(["mv", "w2", "Fun"])
        .assert()
        .success();

    newtab_cmd(data.path())
        .args(["list", "--folder", "Fun"])
        .assert()
        .success()
        .stdout(predicate::str::contains("two.example"))
        .stdout(predicate::str::contains("one.example").not());
}

#[test]
fn test_reorder_with_missing_ids_fails() {
    let data = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    seed_work_folder(data.path(), &scratch);

    newtab_cmd(data.path())
        .args(["reorder", "Work", "w1", "w2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_settings_set_get_and_search() {
    let data = TempDir::new().unwrap();

    newtab_cmd(data.path())
        .args(["search", "rust", "lang"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://www.google.com/search?q=rust+lang",
        ));

    newtab_cmd(data.path())
        .args(["settings", "set", "layout", "searchEngine", "duckduckgo"])
        .assert()
        .success();

    newtab_cmd(data.path())
        .args(["settings", "get", "layout", "searchEngine"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"duckduckgo\""));

    newtab_cmd(data.path())
        .args(["search", "rust"])
        .assert()
        .success()
        .stdout(predicate::str::contains("duckduckgo.com"));
}

#[test]
fn test_invalid_setting_value_fails() {
    let data = TempDir::new().unwrap();
    newtab_cmd(data.path())
        .args(["settings", "set", "wallpaper", "blur", "very"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_export_import_roundtrip() {
    let data = TempDir::new().unwrap();
    let other = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let backup = scratch.path().join("backup.json.gz");

    newtab_cmd(data.path())
        .args(["add", "docs.rs", "--name", "Docs"])
        .assert()
        .success();

    newtab_cmd(data.path())
        .args(["export", "--output"])
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup written to"));
    assert!(backup.exists());

    newtab_cmd(data.path())
        .args(["inspect"])
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("1.0"))
        .stdout(predicate::str::contains("1 bookmark(s)"));

    newtab_cmd(other.path())
        .args(["import"])
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 bookmark(s)"));

    newtab_cmd(other.path())
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Docs"))
        .stdout(predicate::str::contains("https://docs.rs"));
}

#[test]
fn test_todo_add_toggle_and_clear() {
    let data = TempDir::new().unwrap();

    newtab_cmd(data.path())
        .args(["todo", "add", "water", "plants"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Todo added"));
    newtab_cmd(data.path())
        .args(["todo", "add", "pay rent"])
        .assert()
        .success();

    let output = newtab_cmd(data.path())
        .args(["todo", "list"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let line = stdout.lines().find(|l| l.contains("water plants")).unwrap();
    let id = line.split_whitespace().next().unwrap();

    newtab_cmd(data.path())
        .args(["todo", "done", id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Todo marked done: water plants"));

    newtab_cmd(data.path())
        .args(["todo", "list", "--active"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pay rent"))
        .stdout(predicate::str::contains("water plants").not());

    newtab_cmd(data.path())
        .args(["todo", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 1 completed todo(s)"));

    newtab_cmd(data.path())
        .args(["todo", "done", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Todo not found"));
}

#[test]
fn test_import_rejects_bad_backup() {
    let data = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let bad = scratch.path().join("bad.json");
    fs::write(&bad, r#"{"data": {"bookmarks": []}}"#).unwrap();

    newtab_cmd(data.path())
        .args(["import"])
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_config_set_and_show() {
    let data = TempDir::new().unwrap();

    newtab_cmd(data.path())
        .args(["config", "backup_prefix", "tabs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backup_prefix set to tabs"));

    newtab_cmd(data.path())
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backup_prefix = tabs"))
        .stdout(predicate::str::contains("compress_backups = false"));
}

#[test]
fn test_data_dir_from_env() {
    let data = TempDir::new().unwrap();

    Command::new(cargo_bin("newtab"))
        .env("NO_COLOR", "1")
        .env("NEWTAB_DATA_DIR", data.path())
        .args(["add", "example.org"])
        .assert()
        .success();

    assert!(data.path().join("sync.json").exists());
}

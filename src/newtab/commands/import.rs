use crate::backup::Backup;
use crate::commands::helpers::library_record;
use crate::commands::todos::todos_record;
use crate::commands::{CmdMessage, CmdResult, ImportReport};
use crate::error::Result;
use crate::model::Library;
use crate::sanitize::{merge_imported, MergeOutcome};
use crate::settings::{Settings, SettingsStore};
use crate::store::{DataStore, StoreKey};
use crate::todos::{restore_todos, Todo};
use log::info;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Every part the backup carries replaces the current one. Parts it
    /// does not carry stay as they are.
    #[default]
    Replace,
    /// Backup bookmarks and todos are added after the current ones; settings
    /// stay.
    Merge,
}

/// Imports a backup with a single store write.
///
/// Bookmarks and folders form one part: a backup holding either replaces the
/// library. Settings and todos are replaced only when the backup holds them.
pub fn run<S: DataStore>(
    store: &mut S,
    library: &mut Library,
    settings: &mut SettingsStore,
    todos: &mut Vec<Todo>,
    backup: &Backup,
    mode: ImportMode,
) -> Result<CmdResult> {
    let has_library = backup.has(StoreKey::Bookmarks) || backup.has(StoreKey::Folders);

    // (merged library, number of current bookmarks fed in ahead of the backup's)
    let next_library: Option<(MergeOutcome, usize)> = match mode {
        ImportMode::Replace if has_library => {
            Some((merge_imported(backup.bookmarks(), &backup.folders()), 0))
        }
        ImportMode::Replace => None,
        ImportMode::Merge => {
            let mut raw: Vec<Value> = library
                .bookmarks
                .iter()
                .map(serde_json::to_value)
                .collect::<std::result::Result<_, _>>()?;
            // incoming orders are dropped so they land after existing bookmarks
            raw.extend(backup.bookmarks().iter().cloned().map(|mut v| {
                if let Some(entry) = v.as_object_mut() {
                    entry.remove("order");
                }
                v
            }));
            let mut folders = library.folders.clone();
            folders.extend(backup.folders());
            Some((merge_imported(&raw, &folders), library.bookmarks.len()))
        }
    };

    let next_settings = match (mode, backup.settings()) {
        (ImportMode::Replace, Some(saved)) => Some(Settings::merge_with_defaults(Some(saved))),
        _ => None,
    };

    let next_todos: Option<Vec<Todo>> = if backup.has(StoreKey::Todos) {
        let incoming = match mode {
            ImportMode::Replace => restore_todos(backup.todos()).0,
            ImportMode::Merge => {
                let mut raw: Vec<Value> = todos
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<std::result::Result<_, _>>()?;
                raw.extend(backup.todos().iter().cloned());
                restore_todos(&raw).0
            }
        };
        Some(incoming)
    } else {
        None
    };

    let mut record = backup.passthrough();
    if mode == ImportMode::Merge {
        let stored = store.get_all()?;
        record.retain(|key, _| !stored.contains_key(key));
    }
    if let Some((outcome, _)) = &next_library {
        record.extend(library_record(&outcome.library)?);
    }
    if let Some(next) = &next_settings {
        record.extend(next.to_record()?);
    }
    if let Some(next) = &next_todos {
        record.extend(todos_record(next)?);
    }

    store.set(record)?;

    let mut report = ImportReport {
        todos: next_todos.as_ref().map(Vec::len),
        ..Default::default()
    };
    if let Some((outcome, carried)) = next_library {
        report.imported = outcome.report.accepted.saturating_sub(carried);
        report.duplicates = outcome.report.duplicates;
        report.malformed = outcome.report.malformed;
        report.unkeyable = outcome.report.unkeyable;
        report.unsupported = outcome.report.unsupported;
        *library = outcome.library;
    }
    let settings_restored = next_settings.is_some();
    if let Some(next) = next_settings {
        settings.commit(next);
    }
    if let Some(next) = next_todos {
        *todos = next;
    }
    info!(
        "imported {} bookmark(s), {} duplicate(s), {} skipped",
        report.imported,
        report.duplicates,
        report.malformed + report.unkeyable + report.unsupported
    );

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Imported {} bookmark(s) in {} folder(s)",
        report.imported,
        library.folders.len()
    )));
    if report.duplicates > 0 {
        result.add_message(CmdMessage::info(format!(
            "{} duplicate bookmark(s) merged",
            report.duplicates
        )));
    }
    let skipped = report.malformed + report.unkeyable;
    if skipped > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} unreadable bookmark(s) skipped",
            skipped
        )));
    }
    if report.unsupported > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} bookmark(s) skipped: only http and https links are kept",
            report.unsupported
        )));
    }
    if settings_restored {
        result.add_message(CmdMessage::info("Settings restored"));
    }
    if let Some(count) = report.todos {
        result.add_message(CmdMessage::info(format!("{} todo(s) in the list", count)));
    }
    result.import_report = Some(report);
    Ok(result
        .with_settings(settings.current().clone())
        .with_todos(todos.clone()))
}

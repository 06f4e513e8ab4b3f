use chrono::{DateTime, Utc};
use colored::Colorize;
use newtab::api::{CmdMessage, FolderEntry, MessageLevel};
use newtab::backup::Backup;
use newtab::model::Bookmark;
use newtab::settings::Settings;
use newtab::todos::Todo;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 10;
const NAME_WIDTH: usize = 32;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// One line per bookmark: short id, name, url. With `grouped`, a folder
/// header precedes each run of bookmarks from the same folder.
pub(super) fn print_bookmarks(bookmarks: &[Bookmark], grouped: bool) {
    if bookmarks.is_empty() {
        println!("No bookmarks found.");
        return;
    }

    let mut current_folder: Option<&str> = None;
    for bookmark in bookmarks {
        if grouped && current_folder != Some(bookmark.folder.as_str()) {
            if current_folder.is_some() {
                println!();
            }
            println!("{}", bookmark.folder.bold());
            current_folder = Some(bookmark.folder.as_str());
        }

        let id = format!("{:<width$}", bookmark.id.short(), width = ID_WIDTH);
        let name = pad_to_width(&truncate_to_width(&bookmark.name, NAME_WIDTH), NAME_WIDTH);
        let available = LINE_WIDTH.saturating_sub(ID_WIDTH + NAME_WIDTH + 4);
        let url = truncate_to_width(&bookmark.url, available);

        println!("  {}{}  {}", id.yellow(), name, url.dimmed());
    }
}

pub(super) fn print_todos(todos: &[Todo]) {
    if todos.is_empty() {
        println!("No todos.");
        return;
    }
    for todo in todos {
        let id = format!("{:<width$}", todo.id.short(), width = ID_WIDTH);
        if todo.completed {
            println!("  {}[x] {}", id.yellow(), todo.text.dimmed().strikethrough());
        } else {
            println!("  {}[ ] {}", id.yellow(), todo.text);
        }
    }
}

pub(super) fn print_folders(folders: &[FolderEntry]) {
    let widest = folders.iter().map(|f| f.name.width()).max().unwrap_or(0);
    for folder in folders {
        println!(
            "  {}  {}",
            pad_to_width(&folder.name, widest),
            format!("{}", folder.count).dimmed()
        );
    }
}

pub(super) fn print_settings(settings: &Settings) {
    let value = match serde_json::to_value(settings) {
        Ok(value) => value,
        Err(_) => return,
    };
    let Some(categories) = value.as_object() else {
        return;
    };
    for (category, entries) in categories {
        println!("{}", category.bold());
        let Some(entries) = entries.as_object() else {
            continue;
        };
        let widest = entries.keys().map(|k| k.width()).max().unwrap_or(0);
        for (key, val) in entries {
            println!("  {}  {}", pad_to_width(key, widest), val);
        }
    }
}

pub(super) fn print_backup_header(backup: &Backup) {
    println!("{} {}", "version".bold(), backup.version);
    match (backup.exported_at(), backup.export_date.as_deref()) {
        (Some(date), _) => println!(
            "{} {} {}",
            "exported".bold(),
            date.format("%Y-%m-%d %H:%M"),
            format!("({})", format_time_ago(date)).dimmed()
        ),
        (None, Some(raw)) => println!("{} {}", "exported".bold(), raw),
        (None, None) => println!("{} {}", "exported".bold(), "unknown".dimmed()),
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}

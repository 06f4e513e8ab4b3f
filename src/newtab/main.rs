use chrono::Utc;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use newtab::api::{BookmarkUpdate, ConfigAction, ImportMode, NewBookmark, NewtabApi};
use newtab::backup;
use newtab::config::NewtabConfig;
use newtab::error::{NewtabError, Result};
use newtab::store::blob::FsBlobStore;
use newtab::store::fs::FileStore;
use newtab::todos::TodoFilter;
use std::path::PathBuf;

mod args;
mod print;
use args::{Cli, Commands, FolderCommands, SettingsCommands, TodoCommands, WallpaperCommands};
use print::{
    print_backup_header, print_bookmarks, print_folders, print_messages, print_settings,
    print_todos,
};

const DATA_DIR_ENV: &str = "NEWTAB_DATA_DIR";
const BLOB_DIR: &str = "blobs";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: NewtabApi<FileStore>,
    data_dir: PathBuf,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::List { folder }) => handle_list(&ctx, folder),
        Some(Commands::Add {
            url,
            name,
            icon,
            folder,
        }) => handle_add(&mut ctx, NewBookmark {
            url,
            name,
            icon,
            folder,
        }),
        Some(Commands::Edit {
            id,
            url,
            name,
            icon,
            folder,
        }) => handle_edit(&mut ctx, id, BookmarkUpdate {
            url,
            name,
            icon,
            folder,
        }),
        Some(Commands::Delete { ids }) => handle_delete(&mut ctx, ids),
        Some(Commands::Move { id, folder }) => handle_move(&mut ctx, id, folder),
        Some(Commands::Reorder { folder, ids }) => handle_reorder(&mut ctx, folder, ids),
        Some(Commands::Folders) => handle_folders(&ctx),
        Some(Commands::Folder(cmd)) => handle_folder(&mut ctx, cmd),
        Some(Commands::Settings(cmd)) => handle_settings(&mut ctx, cmd),
        Some(Commands::Wallpaper(cmd)) => handle_wallpaper(&mut ctx, cmd),
        Some(Commands::Todo(cmd)) => handle_todo(&mut ctx, cmd),
        Some(Commands::Export { output, gzip }) => handle_export(&ctx, output, gzip),
        Some(Commands::Import { file, merge }) => handle_import(&mut ctx, file, merge),
        Some(Commands::Inspect { file }) => handle_inspect(&ctx, file),
        Some(Commands::Search { query }) => handle_search(&ctx, query),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&ctx, None),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => ProjectDirs::from("com", "newtab", "newtab")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| {
                    NewtabError::Api(format!(
                        "Could not determine a data dir; pass --data-dir or set {}",
                        DATA_DIR_ENV
                    ))
                })?,
        },
    };

    let store = FileStore::new(data_dir.clone());
    let api = NewtabApi::open(store, data_dir.clone())?;
    Ok(AppContext { api, data_dir })
}

fn handle_list(ctx: &AppContext, folder: Option<String>) -> Result<()> {
    let result = ctx.api.list_bookmarks(folder.as_deref())?;
    print_bookmarks(&result.listed_bookmarks, folder.is_none());
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(ctx: &mut AppContext, input: NewBookmark) -> Result<()> {
    let result = ctx.api.add_bookmark(input)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, id: String, update: BookmarkUpdate) -> Result<()> {
    if update.is_empty() {
        return Err(NewtabError::Api(
            "Nothing to change: pass --url, --name, --icon or --folder".into(),
        ));
    }
    let result = ctx.api.update_bookmark(&id, update)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, ids: Vec<String>) -> Result<()> {
    let result = ctx.api.delete_bookmarks(ids.as_slice())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_move(ctx: &mut AppContext, id: String, folder: String) -> Result<()> {
    let result = ctx.api.move_bookmark(&id, &folder)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_reorder(ctx: &mut AppContext, folder: String, ids: Vec<String>) -> Result<()> {
    let result = ctx.api.reorder_folder(&folder, ids.as_slice())?;
    print_bookmarks(&result.listed_bookmarks, false);
    print_messages(&result.messages);
    Ok(())
}

fn handle_folders(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_folders()?;
    print_folders(&result.folders);
    print_messages(&result.messages);
    Ok(())
}

fn handle_folder(ctx: &mut AppContext, cmd: FolderCommands) -> Result<()> {
    let result = match cmd {
        FolderCommands::Add { name } => ctx.api.add_folder(&name)?,
        FolderCommands::Delete { name } => ctx.api.delete_folder(&name)?,
        FolderCommands::Rename { from, to } => ctx.api.rename_folder(&from, &to)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_settings(ctx: &mut AppContext, cmd: SettingsCommands) -> Result<()> {
    match cmd {
        SettingsCommands::Show => {
            let result = ctx.api.show_settings()?;
            if let Some(settings) = &result.settings {
                print_settings(settings);
            }
            print_messages(&result.messages);
        }
        SettingsCommands::Get { category, key } => {
            let value = ctx.api.settings().get(&category, &key).ok_or_else(|| {
                NewtabError::InvalidSetting(format!("Unknown setting {}.{}", category, key))
            })?;
            println!("{}", value);
        }
        SettingsCommands::Set {
            category,
            key,
            value,
        } => {
            let result = ctx.api.set_setting(&category, &key, &value)?;
            print_messages(&result.messages);
        }
        SettingsCommands::Reset => {
            let result = ctx.api.reset_settings()?;
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn handle_wallpaper(ctx: &mut AppContext, cmd: WallpaperCommands) -> Result<()> {
    let mut blobs = FsBlobStore::new(ctx.data_dir.join(BLOB_DIR));
    let result = match cmd {
        WallpaperCommands::Video { file } => {
            let bytes = std::fs::read(&file)?;
            ctx.api.set_video_wallpaper(&mut blobs, &bytes)?
        }
        WallpaperCommands::Clear => ctx.api.clear_video_wallpaper(&mut blobs)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_todo(ctx: &mut AppContext, cmd: TodoCommands) -> Result<()> {
    let result = match cmd {
        TodoCommands::Add { text } => ctx.api.add_todo(&text.join(" "))?,
        TodoCommands::List { active, completed } => {
            let filter = match (active, completed) {
                (true, _) => TodoFilter::Active,
                (_, true) => TodoFilter::Completed,
                _ => TodoFilter::All,
            };
            let result = ctx.api.list_todos(filter)?;
            print_todos(&result.todos);
            result
        }
        TodoCommands::Done { id } => ctx.api.toggle_todo(&id)?,
        TodoCommands::Edit { id, text } => ctx.api.update_todo(&id, &text.join(" "))?,
        TodoCommands::Delete { id } => ctx.api.delete_todo(&id)?,
        TodoCommands::Clear => ctx.api.clear_completed_todos()?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, output: Option<PathBuf>, gzip: bool) -> Result<()> {
    let config = NewtabConfig::load(&ctx.data_dir)?;
    let path = output.unwrap_or_else(|| {
        PathBuf::from(backup::default_filename(
            &config.backup_prefix,
            Utc::now().date_naive(),
            gzip || config.compress_backups,
        ))
    });
    let compress = gzip
        || config.compress_backups
        || path.extension().is_some_and(|ext| ext == "gz");

    let result = ctx.api.export()?;
    let Some(backup) = &result.backup else {
        return Err(NewtabError::Api("Export produced no backup".into()));
    };
    backup::write_file(&path, backup, compress)?;

    print_messages(&result.messages);
    println!("{}", format!("Backup written to {}", path.display()).green());
    Ok(())
}

fn handle_import(ctx: &mut AppContext, file: PathBuf, merge: bool) -> Result<()> {
    let backup = backup::read_file(&file)?;
    let mode = if merge {
        ImportMode::Merge
    } else {
        ImportMode::Replace
    };
    let result = ctx.api.import(&backup, mode)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_inspect(ctx: &AppContext, file: PathBuf) -> Result<()> {
    let backup = backup::read_file(&file)?;
    let result = ctx.api.inspect(&backup)?;
    print_backup_header(&backup);
    print_messages(&result.messages);
    Ok(())
}

fn handle_search(ctx: &AppContext, query: Vec<String>) -> Result<()> {
    let url = ctx.api.search_url(&query.join(" "))?;
    println!("{}", url);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if result.messages.is_empty() {
        if let Some(config) = &result.config {
            for key in NewtabConfig::KEYS {
                if let Some(val) = config.get(key) {
                    println!("{} = {}", key, val);
                }
            }
        }
    }
    print_messages(&result.messages);
    Ok(())
}

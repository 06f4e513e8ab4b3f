//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every operation, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns the live state**: the store, the [`Library`], the
//!   [`SettingsStore`] and the todo list, loaded and repaired once at
//!   [`NewtabApi::open`]
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (e.g., resolving id prefixes to full bookmark ids)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O operations**: No stdout, stderr, or file formatting
//!
//! ## Generic Over DataStore
//!
//! `NewtabApi<S: DataStore>` is generic over the storage backend:
//! - Production: `NewtabApi<FileStore>`
//! - Testing: `NewtabApi<InMemoryStore>`
//!
//! Mutations take `&mut self`, so one mutation finishes before the next starts.

use crate::backup::Backup;
use crate::commands::{self, helpers};
use crate::error::{NewtabError, Result};
use crate::model::{BookmarkId, Library};
use crate::settings::SettingsStore;
use crate::store::blob::BlobStore;
use crate::store::DataStore;
use crate::todos::{Todo, TodoFilter};
use log::debug;
use std::path::{Path, PathBuf};

/// The main API facade.
///
/// All UI clients should interact through this API.
pub struct NewtabApi<S: DataStore> {
    store: S,
    library: Library,
    settings: SettingsStore,
    todos: Vec<Todo>,
    config_dir: PathBuf,
}

impl<S: DataStore> NewtabApi<S> {
    /// Loads and repairs the stored library and settings.
    pub fn open(store: S, config_dir: PathBuf) -> Result<Self> {
        let library = helpers::load_library(&store)?;
        let settings = SettingsStore::open(&store)?;
        let todos = commands::todos::load_todos(&store)?;
        debug!(
            "opened library with {} bookmarks and {} todos",
            library.bookmarks.len(),
            todos.len()
        );
        Ok(Self {
            store,
            library,
            settings,
            todos,
            config_dir,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// For subscribing to settings changes.
    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    fn favicon_size(&self) -> Result<u32> {
        Ok(crate::config::NewtabConfig::load(&self.config_dir)?.favicon_size)
    }

    pub fn add_bookmark(&mut self, input: NewBookmark) -> Result<CmdResult> {
        let size = self.favicon_size()?;
        commands::add::run(&mut self.store, &mut self.library, input, size)
    }

    pub fn update_bookmark(&mut self, id: &str, update: BookmarkUpdate) -> Result<CmdResult> {
        let id = helpers::resolve_id(&self.library, id)?;
        let size = self.favicon_size()?;
        commands::update::run(&mut self.store, &mut self.library, &id, update, size)
    }

    pub fn delete_bookmarks<I: AsRef<str>>(&mut self, ids: &[I]) -> Result<CmdResult> {
        let ids = self.resolve_ids(ids)?;
        commands::delete::run(&mut self.store, &mut self.library, &ids)
    }

    pub fn list_bookmarks(&self, folder: Option<&str>) -> Result<CmdResult> {
        commands::list::run(&self.library, folder)
    }

    pub fn list_folders(&self) -> Result<CmdResult> {
        commands::list::folders(&self.library)
    }

    pub fn reorder_folder<I: AsRef<str>>(&mut self, folder: &str, ids: &[I]) -> Result<CmdResult> {
        let ids = self.resolve_ids(ids)?;
        commands::reorder::reorder(&mut self.store, &mut self.library, folder, &ids)
    }

    pub fn move_bookmark(&mut self, id: &str, folder: &str) -> Result<CmdResult> {
        let id = helpers::resolve_id(&self.library, id)?;
        commands::reorder::move_to(&mut self.store, &mut self.library, &id, folder)
    }

    pub fn add_folder(&mut self, name: &str) -> Result<CmdResult> {
        commands::folders::add(&mut self.store, &mut self.library, name)
    }

    pub fn delete_folder(&mut self, name: &str) -> Result<CmdResult> {
        commands::folders::delete(&mut self.store, &mut self.library, name)
    }

    pub fn rename_folder(&mut self, from: &str, to: &str) -> Result<CmdResult> {
        commands::folders::rename(&mut self.store, &mut self.library, from, to)
    }

    pub fn show_settings(&self) -> Result<CmdResult> {
        commands::settings::show(&self.settings)
    }

    pub fn set_setting(&mut self, category: &str, key: &str, value: &str) -> Result<CmdResult> {
        commands::settings::set(&mut self.store, &mut self.settings, category, key, value)
    }

    pub fn reset_settings(&mut self) -> Result<CmdResult> {
        commands::settings::reset(&mut self.store, &mut self.settings)
    }

    pub fn set_video_wallpaper<B: BlobStore>(&mut self, blobs: &mut B, bytes: &[u8]) -> Result<CmdResult> {
        commands::wallpaper::set_video(&mut self.store, &mut self.settings, blobs, bytes)
    }

    pub fn clear_video_wallpaper<B: BlobStore>(&mut self, blobs: &mut B) -> Result<CmdResult> {
        commands::wallpaper::clear_video(&mut self.store, &mut self.settings, blobs)
    }

    pub fn add_todo(&mut self, text: &str) -> Result<CmdResult> {
        commands::todos::add(&mut self.store, &mut self.todos, text)
    }

    pub fn toggle_todo(&mut self, id: &str) -> Result<CmdResult> {
        let id = commands::todos::resolve_id(&self.todos, id)?;
        commands::todos::toggle(&mut self.store, &mut self.todos, &id)
    }

    pub fn update_todo(&mut self, id: &str, text: &str) -> Result<CmdResult> {
        let id = commands::todos::resolve_id(&self.todos, id)?;
        commands::todos::update(&mut self.store, &mut self.todos, &id, text)
    }

    pub fn delete_todo(&mut self, id: &str) -> Result<CmdResult> {
        let id = commands::todos::resolve_id(&self.todos, id)?;
        commands::todos::delete(&mut self.store, &mut self.todos, &id)
    }

    pub fn list_todos(&self, filter: TodoFilter) -> Result<CmdResult> {
        commands::todos::list(&self.todos, filter)
    }

    pub fn clear_completed_todos(&mut self) -> Result<CmdResult> {
        commands::todos::clear_completed(&mut self.store, &mut self.todos)
    }

    pub fn export(&self) -> Result<CmdResult> {
        commands::export::run(
            &self.store,
            &self.library,
            self.settings.current(),
            &self.todos,
        )
    }

    pub fn import(&mut self, backup: &Backup, mode: ImportMode) -> Result<CmdResult> {
        commands::import::run(
            &mut self.store,
            &mut self.library,
            &mut self.settings,
            &mut self.todos,
            backup,
            mode,
        )
    }

    pub fn inspect(&self, backup: &Backup) -> Result<CmdResult> {
        commands::inspect::run(backup)
    }

    /// Query URL for the configured search engine.
    pub fn search_url(&self, query: &str) -> Result<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(NewtabError::Contract("Search query cannot be empty".to_string()));
        }
        Ok(self
            .settings
            .current()
            .layout
            .search_engine
            .search_url(query))
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.config_dir, action)
    }

    fn resolve_ids<I: AsRef<str>>(&self, ids: &[I]) -> Result<Vec<BookmarkId>> {
        ids.iter()
            .map(|id| helpers::resolve_id(&self.library, id.as_ref()))
            .collect()
    }
}

pub use crate::commands::add::NewBookmark;
pub use crate::commands::config::ConfigAction;
pub use crate::commands::import::ImportMode;
pub use commands::{BookmarkUpdate, CmdMessage, CmdResult, FolderEntry, ImportReport, MessageLevel};

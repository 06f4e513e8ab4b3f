use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "newtab")]
#[command(about = "Bookmarks, folders and settings of a new-tab page", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $NEWTAB_DATA_DIR, then the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List bookmarks
    #[command(alias = "ls")]
    List {
        /// Only this folder
        #[arg(short, long)]
        folder: Option<String>,
    },

    /// Add a bookmark
    #[command(alias = "a")]
    Add {
        url: String,

        /// Display name (defaults to the host name)
        #[arg(short, long)]
        name: Option<String>,

        /// Icon URL (defaults to the favicon service)
        #[arg(long)]
        icon: Option<String>,

        /// Folder (defaults to All)
        #[arg(short, long)]
        folder: Option<String>,
    },

    /// Edit a bookmark
    #[command(alias = "e")]
    Edit {
        /// Bookmark id or a unique prefix of it
        id: String,

        #[arg(long)]
        url: Option<String>,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(long)]
        icon: Option<String>,

        #[arg(short, long)]
        folder: Option<String>,
    },

    /// Delete one or more bookmarks
    #[command(alias = "rm")]
    Delete {
        /// Bookmark ids or unique prefixes
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Move a bookmark to the end of another folder
    #[command(alias = "mv")]
    Move { id: String, folder: String },

    /// Set the order of every bookmark in a folder
    Reorder {
        folder: String,

        /// All of the folder's bookmark ids, in the new order
        #[arg(num_args = 0..)]
        ids: Vec<String>,
    },

    /// List folders
    Folders,

    /// Manage folders
    #[command(subcommand)]
    Folder(FolderCommands),

    /// Show or change page settings
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Manage the video wallpaper
    #[command(subcommand)]
    Wallpaper(WallpaperCommands),

    /// Manage the todo list
    #[command(subcommand)]
    Todo(TodoCommands),

    /// Write a backup file
    Export {
        /// Output file (defaults to <backup_prefix>-YYYY-MM-DD.json in the current dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Gzip the backup
        #[arg(long)]
        gzip: bool,
    },

    /// Restore from a backup file
    Import {
        file: PathBuf,

        /// Add to the current bookmarks instead of replacing everything
        #[arg(long)]
        merge: bool,
    },

    /// Describe a backup file without importing it
    Inspect { file: PathBuf },

    /// Print the search URL for a query
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., backup_prefix)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum FolderCommands {
    /// Create an empty folder
    Add { name: String },

    /// Delete a folder; its bookmarks move to All
    #[command(alias = "rm")]
    Delete { name: String },

    /// Rename a folder
    Rename { from: String, to: String },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show all settings
    Show,

    /// Print one value
    Get { category: String, key: String },

    /// Set one value (JSON literals such as true or 12 are accepted)
    Set {
        category: String,
        key: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Restore defaults
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum TodoCommands {
    /// Add a todo
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List todos
    #[command(alias = "ls")]
    List {
        /// Only open todos
        #[arg(long, conflicts_with = "completed")]
        active: bool,

        /// Only done todos
        #[arg(long)]
        completed: bool,
    },

    /// Mark a todo done, or open again
    #[command(alias = "toggle")]
    Done {
        /// Todo id or a unique prefix of it
        id: String,
    },

    /// Change a todo's text
    Edit {
        id: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Delete a todo
    #[command(alias = "rm")]
    Delete { id: String },

    /// Remove every done todo
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum WallpaperCommands {
    /// Use a local video file as wallpaper
    Video { file: PathBuf },

    /// Remove the video and go back to the gradient
    Clear,
}

//! # Newtab Architecture
//!
//! Newtab is the **data core of a browser new-tab page**: bookmarks filed in
//! folders, page settings, and backups of both. The page itself (clock,
//! wallpaper rendering, drag and drop) is somebody else's problem; this crate
//! keeps the data correct no matter what the synchronized store hands back.
//!
//! It is a library first. The `newtab` binary is one client of it.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the live library and settings                       │
//! │  - Normalizes inputs (id prefixes → bookmark ids)           │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Computes the next state, persists it, then commits it    │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (urls, sanitize, folders, reorder, settings, backup)  │
//! │  - Pure transformations over bookmarks and settings         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract DataStore trait                                 │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Repair on Every Load
//!
//! Stored data can be old, hand-edited, or the result of two devices' copies
//! being merged by the sync layer. Every load therefore runs the sanitize,
//! dedup and order passes again. They are idempotent, so running them on
//! clean data changes nothing.
//!
//! ## Provisional State
//!
//! A command never changes the live state before the store has acknowledged
//! the write. It builds the next state on a copy, writes it, and only then
//! swaps it in (and, for settings, notifies listeners). A failed write
//! returns the error and leaves everything as it was.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per operation
//! - [`model`]: `Bookmark`, `BookmarkDraft`, `BookmarkId`, `Library`
//! - [`urls`]: URL normalization, canonical keys, favicons
//! - [`sanitize`]: Repair and merge passes over bookmark lists
//! - [`folders`]: The folder registry
//! - [`reorder`]: Reordering within and between folders
//! - [`settings`]: Settings types, defaults merge, the settings store
//! - [`search`]: Search engines
//! - [`todos`]: The todo list
//! - [`backup`]: The backup envelope and backup files
//! - [`store`]: Storage abstraction and implementations
//! - [`config`]: Tool configuration
//! - [`error`]: Error types

pub mod api;
pub mod backup;
pub mod commands;
pub mod config;
pub mod error;
pub mod folders;
pub mod model;
pub mod reorder;
pub mod sanitize;
pub mod search;
pub mod settings;
pub mod store;
pub mod todos;
pub mod urls;

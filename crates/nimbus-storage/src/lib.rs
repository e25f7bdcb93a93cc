//! Nimbus Storage Layer
//!
//! Browser state (settings, bookmarks, history, finished downloads) is kept as
//! a single versioned record. The record lives in SQLite and every save
//! replaces it inside a transaction, so an interrupted write leaves the
//! previous version in place.

mod database;
mod error;
mod migrations;
mod settings;
mod state;
mod store;

pub use database::Database;
pub use error::StorageError;
pub use settings::{
    SearchEngine, Settings, Theme, DEFAULT_SUSPEND_MINUTES, MAX_SUSPEND_MINUTES,
};
pub use state::{
    Bookmark, BrowserState, DownloadEntry, DownloadOutcome, HistoryEntry, HISTORY_LIMIT,
    STATE_VERSION,
};
pub use store::StateStore;

pub type Result<T> = std::result::Result<T, StorageError>;

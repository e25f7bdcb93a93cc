//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] nimbus_storage::StorageError),

    #[error("Tab error: {0}")]
    Tab(#[from] nimbus_tabs::TabError),

    #[error("Session error: {0}")]
    Session(#[from] nimbus_session::SessionError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] nimbus_navigation::NavigationError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] nimbus_memory::SchedulerError),

    #[error("Privacy error: {0}")]
    Privacy(#[from] nimbus_privacy::PrivacyError),

    #[error("Download error: {0}")]
    Download(#[from] nimbus_download::DownloadError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(i64),

    #[error("Invalid bookmark: {0}")]
    InvalidBookmark(String),
}

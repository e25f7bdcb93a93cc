//! Nimbus Core
//!
//! Central coordination layer for the Nimbus browser. The core owns all
//! browser state; page views only render and report events back.

mod bookmarks;
mod browser;
mod config;
mod error;

pub use bookmarks::{default_favicon, BookmarkUpdate};
pub use browser::{Browser, Embedder};
pub use config::{Config, DATA_DIR_ENV};
pub use error::CoreError;

// Re-export core components
pub use nimbus_assistant::{
    summarize_prompt, AssistantError, ChatCompletion, ChatMessage, ChatSession, ModelSelection,
    OllamaClient, Role,
};
pub use nimbus_download::{
    Download, DownloadAction, DownloadError, DownloadEvent, DownloadItem, DownloadState,
    FailureReason, OpenKind, PathOpener,
};
pub use nimbus_memory::{CycleReport, MemoryMetrics, SchedulerError, SchedulerHandle};
pub use nimbus_navigation::{InputResolution, NavigationError};
pub use nimbus_privacy::{NetworkConfigurator, PrivacyError, ProxyMode, RequestDecision};
pub use nimbus_session::{SessionError, Toolbar, WindowId, WindowViews};
pub use nimbus_storage::{
    Bookmark, DownloadEntry, DownloadOutcome, HistoryEntry, SearchEngine, Settings, StorageError,
    Theme,
};
pub use nimbus_tabs::{
    EventOutcome, NavigationState, PageEvent, PageView, PageViewFactory, Partition, TabError,
    TabId, TabInfo, TabOptions, TabState,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging. Later calls leave the first subscriber in place.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_err()
    {
        tracing::debug!("Logging already initialized");
    }
}

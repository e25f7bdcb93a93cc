//! Nimbus Download Coordinator
//!
//! Downloads are performed by the embedding layer. The coordinator tracks
//! each one from its start notification to a terminal state, forwards
//! pause/resume/cancel commands to the live download item, and relays
//! lifecycle events to the UI.

mod coordinator;
mod download;
mod error;
mod opener;

pub use coordinator::{DownloadCoordinator, DownloadItem};
pub use download::{
    Download, DownloadAction, DownloadEvent, DownloadState, FailureReason,
};
pub use error::DownloadError;
pub use opener::{open_path, OpenKind, PathOpener};

pub type Result<T> = std::result::Result<T, DownloadError>;

//! Download data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DownloadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadState {
    /// Start notification received, no bytes yet
    Starting,
    Progressing,
    Completed,
    Interrupted,
    Cancelled,
}

impl DownloadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadState::Starting => "starting",
            DownloadState::Progressing => "progressing",
            DownloadState::Completed => "completed",
            DownloadState::Interrupted => "interrupted",
            DownloadState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DownloadState::Completed | DownloadState::Interrupted | DownloadState::Cancelled
        )
    }
}

impl std::fmt::Display for DownloadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a download did not complete, as reported by the embedding layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureReason {
    Interrupted,
    Cancelled,
    Other(String),
}

impl FailureReason {
    pub fn parse(state: &str) -> Self {
        match state.trim().to_lowercase().as_str() {
            "interrupted" => FailureReason::Interrupted,
            "cancelled" | "canceled" => FailureReason::Cancelled,
            other => FailureReason::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FailureReason::Interrupted => "interrupted",
            FailureReason::Cancelled => "cancelled",
            FailureReason::Other(reason) => reason,
        }
    }

    /// Terminal state for this reason. Anything but a cancel is an interruption.
    pub fn terminal_state(&self) -> DownloadState {
        match self {
            FailureReason::Cancelled => DownloadState::Cancelled,
            _ => DownloadState::Interrupted,
        }
    }
}

/// Command from the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadAction {
    Pause,
    Resume,
    Cancel,
}

impl std::str::FromStr for DownloadAction {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pause" => Ok(DownloadAction::Pause),
            "resume" => Ok(DownloadAction::Resume),
            "cancel" => Ok(DownloadAction::Cancel),
            _ => Err(DownloadError::UnknownAction(s.to_string())),
        }
    }
}

/// Lifecycle notification relayed to the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DownloadEvent {
    #[serde(rename_all = "camelCase")]
    Started {
        id: String,
        filename: String,
        total_bytes: u64,
    },
    #[serde(rename_all = "camelCase")]
    Progress {
        id: String,
        filename: String,
        received_bytes: u64,
        total_bytes: u64,
    },
    Completed {
        id: String,
        filename: String,
        path: String,
    },
    Failed {
        id: String,
        filename: String,
        state: String,
    },
}

impl DownloadEvent {
    pub fn id(&self) -> &str {
        match self {
            DownloadEvent::Started { id, .. }
            | DownloadEvent::Progress { id, .. }
            | DownloadEvent::Completed { id, .. }
            | DownloadEvent::Failed { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Download {
    pub id: String,
    pub filename: String,
    pub received_bytes: u64,
    /// 0 when the size is unknown
    pub total_bytes: u64,
    pub state: DownloadState,
    pub paused: bool,
    pub path: Option<String>,
    pub reason: Option<FailureReason>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Download {
    pub fn new(id: String, filename: &str, total_bytes: u64) -> Self {
        Self {
            id,
            filename: sanitize_file_name(filename),
            received_bytes: 0,
            total_bytes,
            state: DownloadState::Starting,
            paused: false,
            path: None,
            reason: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Get download progress as percentage (0-100)
    pub fn progress(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        (self.received_bytes as f64 / self.total_bytes as f64 * 100.0).min(100.0)
    }

    pub(crate) fn finish(&mut self, state: DownloadState) {
        self.state = state;
        self.paused = false;
        self.finished_at = Some(Utc::now());
    }
}

fn sanitize_file_name(file_name: &str) -> String {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("download")
        .trim();

    if name.is_empty() {
        "download".to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_download() {
        let download = Download::new("1".to_string(), "../../etc/report.pdf", 1000);

        assert_eq!(download.state, DownloadState::Starting);
        assert_eq!(download.filename, "report.pdf");
        assert_eq!(download.received_bytes, 0);
        assert!(download.finished_at.is_none());
    }

    #[test]
    fn test_progress() {
        let mut download = Download::new("1".to_string(), "file.zip", 1000);
        download.received_bytes = 500;
        assert!((download.progress() - 50.0).abs() < 0.01);

        download.total_bytes = 0;
        assert_eq!(download.progress(), 0.0);
    }

    #[test]
    fn test_failure_reason() {
        assert_eq!(FailureReason::parse("interrupted").terminal_state(), DownloadState::Interrupted);
        assert_eq!(FailureReason::parse("cancelled").terminal_state(), DownloadState::Cancelled);

        let other = FailureReason::parse("network_failed");
        assert_eq!(other.as_str(), "network_failed");
        assert_eq!(other.terminal_state(), DownloadState::Interrupted);
    }

    #[test]
    fn test_action_parse() {
        assert_eq!("PAUSE".parse::<DownloadAction>().unwrap(), DownloadAction::Pause);
        assert!("clear".parse::<DownloadAction>().is_err());
    }

    #[test]
    fn test_event_wire_shape() {
        let event = DownloadEvent::Progress {
            id: "7".to_string(),
            filename: "a.bin".to_string(),
            received_bytes: 10,
            total_bytes: 20,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["receivedBytes"], 10);
        assert_eq!(json["totalBytes"], 20);
    }
}

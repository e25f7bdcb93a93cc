//! Download coordinator

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::download::{Download, DownloadAction, DownloadEvent, DownloadState, FailureReason};

/// Live download owned by the embedding layer
pub trait DownloadItem: Send + Sync {
    fn pause(&self);
    fn resume(&self);
    fn cancel(&self);
    fn is_paused(&self) -> bool;
}

struct Tracked {
    download: Download,
    item: Arc<dyn DownloadItem>,
}

/// Tracks in-flight downloads. Records leave tracking once a terminal
/// state has been delivered.
#[derive(Clone)]
pub struct DownloadCoordinator {
    downloads: Arc<RwLock<HashMap<String, Tracked>>>,
    events: mpsc::UnboundedSender<DownloadEvent>,
}

impl DownloadCoordinator {
    pub fn new(events: mpsc::UnboundedSender<DownloadEvent>) -> Self {
        Self {
            downloads: Arc::new(RwLock::new(HashMap::new())),
            events,
        }
    }

    fn emit(&self, event: DownloadEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("No listener for download events");
        }
    }

    /// Start tracking a download and return its id
    pub fn on_started(&self, filename: &str, total_bytes: u64, item: Arc<dyn DownloadItem>) -> String {
        let id = Uuid::new_v4().to_string();
        let download = Download::new(id.clone(), filename, total_bytes);

        tracing::info!(
            download_id = %id,
            filename = %download.filename,
            total_bytes,
            "Started download"
        );

        self.emit(DownloadEvent::Started {
            id: id.clone(),
            filename: download.filename.clone(),
            total_bytes,
        });
        self.downloads
            .write()
            .insert(id.clone(), Tracked { download, item });

        id
    }

    /// Byte counters update. Ignored while paused or for unknown ids.
    pub fn on_progress(&self, id: &str, received_bytes: u64, total_bytes: u64) -> Option<Download> {
        let mut downloads = self.downloads.write();
        let tracked = downloads.get_mut(id)?;

        if tracked.item.is_paused() || tracked.download.paused {
            return None;
        }

        let download = &mut tracked.download;
        download.state = DownloadState::Progressing;
        download.received_bytes = received_bytes;
        download.total_bytes = total_bytes;
        let snapshot = download.clone();
        drop(downloads);

        self.emit(DownloadEvent::Progress {
            id: snapshot.id.clone(),
            filename: snapshot.filename.clone(),
            received_bytes,
            total_bytes,
        });
        Some(snapshot)
    }

    /// Download finished and was saved to `path`
    pub fn on_completed(&self, id: &str, path: &str) -> Option<Download> {
        let Tracked { mut download, .. } = self.downloads.write().remove(id)?;

        download.path = Some(path.to_string());
        if download.total_bytes > 0 {
            download.received_bytes = download.total_bytes;
        }
        download.finish(DownloadState::Completed);

        tracing::info!(download_id = %id, path = %path, "Completed download");

        self.emit(DownloadEvent::Completed {
            id: id.to_string(),
            filename: download.filename.clone(),
            path: path.to_string(),
        });
        Some(download)
    }

    /// Download ended without completing. Never retried.
    pub fn on_failed(&self, id: &str, state: &str) -> Option<Download> {
        let Tracked { mut download, .. } = self.downloads.write().remove(id)?;

        let reason = FailureReason::parse(state);
        download.finish(reason.terminal_state());

        tracing::warn!(download_id = %id, reason = %reason.as_str(), "Download failed");

        self.emit(DownloadEvent::Failed {
            id: id.to_string(),
            filename: download.filename.clone(),
            state: reason.as_str().to_string(),
        });
        download.reason = Some(reason);
        Some(download)
    }

    /// Forward a command to a tracked download. Returns false for unknown
    /// ids and for actions that do not apply to the current state.
    pub fn control(&self, id: &str, action: DownloadAction) -> bool {
        let mut downloads = self.downloads.write();
        let Some(tracked) = downloads.get_mut(id) else {
            tracing::debug!(download_id = %id, "Ignoring command for unknown download");
            return false;
        };

        let paused = tracked.item.is_paused();
        let forwarded = match action {
            DownloadAction::Pause if !paused => {
                tracked.item.pause();
                tracked.download.paused = true;
                true
            }
            DownloadAction::Resume if paused => {
                tracked.item.resume();
                tracked.download.paused = false;
                true
            }
            DownloadAction::Cancel => {
                tracked.item.cancel();
                true
            }
            _ => false,
        };

        if forwarded {
            tracing::info!(download_id = %id, action = ?action, "Forwarded download command");
        }
        forwarded
    }

    pub fn get(&self, id: &str) -> Option<Download> {
        self.downloads.read().get(id).map(|t| t.download.clone())
    }

    /// Downloads still in flight, oldest first
    pub fn active(&self) -> Vec<Download> {
        let mut downloads: Vec<Download> = self
            .downloads
            .read()
            .values()
            .map(|t| t.download.clone())
            .collect();
        downloads.sort_by_key(|d| d.started_at);
        downloads
    }

    pub fn is_tracked(&self, id: &str) -> bool {
        self.downloads.read().contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeItem {
        paused: AtomicBool,
        pauses: AtomicUsize,
        resumes: AtomicUsize,
        cancels: AtomicUsize,
    }

    impl DownloadItem for FakeItem {
        fn pause(&self) {
            self.paused.store(true, Ordering::SeqCst);
            self.pauses.fetch_add(1, Ordering::SeqCst);
        }

        fn resume(&self) {
            self.paused.store(false, Ordering::SeqCst);
            self.resumes.fetch_add(1, Ordering::SeqCst);
        }

        fn cancel(&self) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
        }

        fn is_paused(&self) -> bool {
            self.paused.load(Ordering::SeqCst)
        }
    }

    fn coordinator() -> (DownloadCoordinator, mpsc::UnboundedReceiver<DownloadEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (DownloadCoordinator::new(tx), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<DownloadEvent>) -> Vec<DownloadEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_download_lifecycle() {
        let (coordinator, mut rx) = coordinator();
        let item = Arc::new(FakeItem::default());

        let id = coordinator.on_started("report.pdf", 1000, item.clone());
        assert_eq!(coordinator.get(&id).unwrap().state, DownloadState::Starting);

        let progressed = coordinator.on_progress(&id, 400, 1000).unwrap();
        assert_eq!(progressed.state, DownloadState::Progressing);
        assert_eq!(progressed.received_bytes, 400);

        let done = coordinator.on_completed(&id, "/downloads/report.pdf").unwrap();
        assert_eq!(done.state, DownloadState::Completed);
        assert_eq!(done.path.as_deref(), Some("/downloads/report.pdf"));
        assert!(done.finished_at.is_some());
        assert!(!coordinator.is_tracked(&id));

        let events = drain(&mut rx);
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], DownloadEvent::Started { total_bytes: 1000, .. }));
        assert!(matches!(events[2], DownloadEvent::Completed { .. }));
    }

    #[test]
    fn test_progress_ignored_while_paused() {
        let (coordinator, mut rx) = coordinator();
        let item = Arc::new(FakeItem::default());
        let id = coordinator.on_started("a.bin", 100, item.clone());

        assert!(coordinator.control(&id, DownloadAction::Pause));
        assert!(coordinator.on_progress(&id, 50, 100).is_none());
        assert_eq!(coordinator.get(&id).unwrap().received_bytes, 0);

        assert!(coordinator.control(&id, DownloadAction::Resume));
        assert!(coordinator.on_progress(&id, 60, 100).is_some());

        let progress_events = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, DownloadEvent::Progress { .. }))
            .count();
        assert_eq!(progress_events, 1);
    }

    #[test]
    fn test_commands_only_apply_in_valid_states() {
        let (coordinator, _rx) = coordinator();
        let item = Arc::new(FakeItem::default());
        let id = coordinator.on_started("a.bin", 100, item.clone());

        assert!(!coordinator.control(&id, DownloadAction::Resume));
        assert!(coordinator.control(&id, DownloadAction::Pause));
        assert!(!coordinator.control(&id, DownloadAction::Pause));
        assert!(coordinator.control(&id, DownloadAction::Cancel));

        assert_eq!(item.pauses.load(Ordering::SeqCst), 1);
        assert_eq!(item.resumes.load(Ordering::SeqCst), 0);
        assert_eq!(item.cancels.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let (coordinator, mut rx) = coordinator();

        assert!(!coordinator.control("missing", DownloadAction::Cancel));
        assert!(coordinator.on_progress("missing", 1, 2).is_none());
        assert!(coordinator.on_completed("missing", "/x").is_none());
        assert!(coordinator.on_failed("missing", "interrupted").is_none());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_failure_is_terminal() {
        let (coordinator, mut rx) = coordinator();
        let item = Arc::new(FakeItem::default());

        let interrupted = coordinator.on_started("a.bin", 100, item.clone());
        let failed = coordinator.on_failed(&interrupted, "interrupted").unwrap();
        assert_eq!(failed.state, DownloadState::Interrupted);
        assert_eq!(failed.reason, Some(FailureReason::Interrupted));

        let cancelled = coordinator.on_started("b.bin", 100, item);
        coordinator.control(&cancelled, DownloadAction::Cancel);
        let failed = coordinator.on_failed(&cancelled, "cancelled").unwrap();
        assert_eq!(failed.state, DownloadState::Cancelled);

        assert!(coordinator.active().is_empty());
        let last = drain(&mut rx).pop().unwrap();
        assert_eq!(
            last,
            DownloadEvent::Failed {
                id: cancelled,
                filename: "b.bin".to_string(),
                state: "cancelled".to_string(),
            }
        );
    }

    #[test]
    fn test_events_without_listener() {
        let (coordinator, rx) = coordinator();
        drop(rx);

        let id = coordinator.on_started("a.bin", 0, Arc::new(FakeItem::default()));
        assert!(coordinator.on_completed(&id, "/a.bin").is_some());
    }
}

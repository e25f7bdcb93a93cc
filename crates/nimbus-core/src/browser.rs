//! Main browser state container
//!
//! The browser owns every window, the persisted state record and the
//! network-level filter. The embedding layer renders pages and performs
//! downloads; it reports back through the `handle_*` and `download_*`
//! entry points and receives side effects through the traits in
//! [`Embedder`].

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;

use nimbus_download::{
    open_path, Download, DownloadAction, DownloadCoordinator, DownloadEvent, DownloadItem,
    DownloadState, OpenKind, PathOpener,
};
use nimbus_memory::{
    spawn_scheduler, CycleReport, MemoryMetrics, MemoryScheduler, ProcessMetrics, SchedulerHandle,
};
use nimbus_navigation::{HistoryExclusions, HistoryManager, InputResolution};
use nimbus_privacy::{FilterEngine, NetworkConfigurator, ProxyConfig, RequestDecision};
use nimbus_session::{SessionManager, Toolbar, WindowId, WindowViews};
use nimbus_storage::{
    Bookmark, Database, DownloadEntry, DownloadOutcome, HistoryEntry, Settings, StateStore,
};
use nimbus_tabs::{
    Clock, EventOutcome, NavigationState, PageEvent, SystemClock, TabId, TabInfo, TabOptions,
};

use crate::bookmarks::{self, BookmarkUpdate};
use crate::config::Config;
use crate::error::CoreError;
use crate::Result;

/// Integration points provided by the embedding layer
pub struct Embedder {
    /// Creates page views for the tabs of each window
    pub views: Box<dyn WindowViews>,
    pub network: Arc<dyn NetworkConfigurator>,
    pub opener: Arc<dyn PathOpener>,
}

/// Window sessions and the scheduler that suspends their tabs
struct Windows {
    sessions: SessionManager,
    scheduler: MemoryScheduler,
}

/// Main browser instance
///
/// Cloning is cheap and every clone refers to the same browser.
#[derive(Clone)]
pub struct Browser {
    config: Arc<Config>,
    store: StateStore,
    history: HistoryManager,
    filter: Arc<RwLock<FilterEngine>>,
    downloads: DownloadCoordinator,
    windows: Arc<Mutex<Windows>>,
    network: Arc<dyn NetworkConfigurator>,
    opener: Arc<dyn PathOpener>,
    clock: Arc<dyn Clock>,
}

impl Browser {
    /// Open the browser on the database at `config.database_path`.
    /// Download lifecycle events for the UI arrive on the returned receiver.
    pub fn open(
        config: Config,
        embedder: Embedder,
    ) -> Result<(Self, mpsc::UnboundedReceiver<DownloadEvent>)> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let store = StateStore::open(Database::open(&config.database_path)?)?;
        let metrics = ProcessMetrics::new()?;

        Ok(Self::with_parts(
            config,
            store,
            embedder,
            Box::new(metrics),
            Arc::new(SystemClock),
        ))
    }

    /// Assemble a browser from explicit parts
    pub fn with_parts(
        config: Config,
        store: StateStore,
        embedder: Embedder,
        metrics: Box<dyn MemoryMetrics>,
        clock: Arc<dyn Clock>,
    ) -> (Self, mpsc::UnboundedReceiver<DownloadEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let history = HistoryManager::new(
            store.clone(),
            HistoryExclusions {
                default_url: config.default_url.clone(),
                placeholder_url: config.suspended_page_url.clone(),
            },
            Arc::clone(&clock),
        );
        let sessions = SessionManager::new(
            embedder.views,
            Arc::clone(&clock),
            config.default_url.clone(),
            config.suspended_page_url.clone(),
        );
        let scheduler = MemoryScheduler::new(metrics);

        let browser = Self {
            config: Arc::new(config),
            store,
            history,
            filter: Arc::new(RwLock::new(FilterEngine::new())),
            downloads: DownloadCoordinator::new(events_tx),
            windows: Arc::new(Mutex::new(Windows {
                sessions,
                scheduler,
            })),
            network: embedder.network,
            opener: embedder.opener,
            clock,
        };

        browser.apply_settings(&browser.store.settings());
        tracing::info!("Browser initialized");

        (browser, events_rx)
    }

    /// Push settings side effects to the filter, the network and new tabs
    fn apply_settings(&self, settings: &Settings) {
        self.filter.write().set_enabled(settings.ad_block_enabled);

        let proxy = ProxyConfig::new(settings.proxy_enabled, settings.proxy_url.clone());
        self.network.set_proxy(&proxy.mode());

        self.windows
            .lock()
            .sessions
            .set_privacy_mode(settings.privacy_mode);
    }

    fn start_url(&self, settings: &Settings) -> String {
        if settings.homepage.trim().is_empty() {
            self.config.default_url.clone()
        } else {
            settings.homepage.clone()
        }
    }

    /// Run `f` against an open window
    fn with_window<F, T>(&self, window: WindowId, f: F) -> Result<T>
    where
        F: FnOnce(&mut nimbus_session::Session) -> Result<T>,
    {
        let mut windows = self.windows.lock();
        let session = windows.sessions.window_mut(window)?;
        f(session)
    }

    // === Window operations ===

    /// Open a window with one tab at the homepage
    pub fn open_window(&self, incognito: bool) -> WindowId {
        let start_url = self.start_url(&self.store.settings());
        self.windows.lock().sessions.open_window(incognito, &start_url)
    }

    pub fn close_window(&self, window: WindowId) -> Result<()> {
        Ok(self.windows.lock().sessions.close_window(window)?)
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.windows
            .lock()
            .sessions
            .windows()
            .iter()
            .map(|w| w.id())
            .collect()
    }

    pub fn is_incognito(&self, window: WindowId) -> Result<bool> {
        self.with_window(window, |session| Ok(session.is_incognito()))
    }

    pub fn toolbar(&self, window: WindowId) -> Result<Toolbar> {
        self.with_window(window, |session| Ok(session.toolbar().clone()))
    }

    // === Tab operations ===

    /// Open a tab and make it active. Without a URL the homepage is loaded.
    pub fn create_tab(
        &self,
        window: WindowId,
        url: Option<&str>,
        options: TabOptions,
    ) -> Result<TabId> {
        let url = match url {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => self.start_url(&self.store.settings()),
        };
        self.with_window(window, |session| Ok(session.create_tab(&url, options)))
    }

    pub fn switch_tab(&self, window: WindowId, tab_id: TabId) -> Result<()> {
        self.with_window(window, |session| Ok(session.switch_tab(tab_id)?))
    }

    pub fn close_tab(&self, window: WindowId, tab_id: TabId) -> Result<()> {
        self.with_window(window, |session| Ok(session.close_tab(tab_id)?))
    }

    pub fn tabs(&self, window: WindowId) -> Result<Vec<TabInfo>> {
        self.with_window(window, |session| Ok(session.registry().infos()))
    }

    pub fn active_tab(&self, window: WindowId) -> Result<Option<TabInfo>> {
        self.with_window(window, |session| {
            Ok(session.registry().active_tab().map(|tab| tab.info()))
        })
    }

    /// Deliver a page view notification. Events for closed windows or tabs
    /// are dropped.
    pub fn handle_page_event(
        &self,
        window: WindowId,
        tab_id: TabId,
        event: &PageEvent,
    ) -> Result<Option<EventOutcome>> {
        let mut windows = self.windows.lock();
        let Ok(session) = windows.sessions.window_mut(window) else {
            tracing::debug!(window_id = %window, tab_id = %tab_id, "Ignoring event for closed window");
            return Ok(None);
        };
        Ok(session.handle_event(tab_id, event, &self.history)?)
    }

    // === Navigation operations ===

    pub fn navigate(&self, window: WindowId, input: &str) -> Result<Option<InputResolution>> {
        let settings = self.store.settings();
        self.with_window(window, |session| Ok(session.navigate(input, &settings)?))
    }

    pub fn go_back(&self, window: WindowId) -> Result<bool> {
        let settings = self.store.settings();
        self.with_window(window, |session| Ok(session.go_back(&settings)?))
    }

    pub fn go_forward(&self, window: WindowId) -> Result<bool> {
        let settings = self.store.settings();
        self.with_window(window, |session| Ok(session.go_forward(&settings)?))
    }

    pub fn refresh(&self, window: WindowId) -> Result<()> {
        let settings = self.store.settings();
        self.with_window(window, |session| Ok(session.refresh(&settings)?))
    }

    pub fn go_home(&self, window: WindowId) -> Result<Option<InputResolution>> {
        let settings = self.store.settings();
        self.with_window(window, |session| Ok(session.go_home(&settings)?))
    }

    /// Back/forward availability of the window's active tab
    pub fn navigation_state(&self, window: WindowId) -> Result<NavigationState> {
        self.with_window(window, |session| Ok(session.toolbar().navigation))
    }

    // === History operations ===

    /// History as listed in `window`, optionally filtered
    pub fn history(&self, window: WindowId, query: Option<&str>) -> Result<Vec<HistoryEntry>> {
        self.with_window(window, |session| Ok(session.history(&self.history, query)))
    }

    pub fn recent_history(&self, limit: usize) -> Vec<HistoryEntry> {
        self.history.recent(limit)
    }

    pub fn clear_history(&self) -> Result<()> {
        Ok(self.history.clear()?)
    }

    // === Request filtering ===

    /// Decision for one outgoing request
    pub fn check_request(&self, url: &str) -> RequestDecision {
        self.filter.read().check_request(url)
    }

    pub fn add_filter(&self, filter: &str) -> bool {
        self.filter.write().add_filter(filter)
    }

    pub fn blocked_count(&self) -> u64 {
        self.filter.read().blocked_count()
    }

    // === Settings operations ===

    pub fn settings(&self) -> Settings {
        self.store.settings()
    }

    /// Merge a partial settings object, persist it and apply it
    pub fn update_settings(&self, patch: &Value) -> Result<Settings> {
        let current = self.store.settings();
        let mut next = current.merged(patch);

        let engine_chosen = patch.get("searchEngine").is_some() && patch.get("homepage").is_none();
        if engine_chosen {
            if let Some(home) = next.search_engine.home_page() {
                next.homepage = home.to_string();
            }
        }

        ProxyConfig::new(next.proxy_enabled, next.proxy_url.clone()).validate()?;

        let saved = next.clone();
        self.store.update(move |state| state.settings = saved)?;
        self.apply_settings(&next);

        tracing::info!("Updated settings");
        Ok(next)
    }

    /// Clear cache and site storage of the persistent partition
    pub fn clear_browsing_data(&self) {
        self.network.clear_browsing_data();
        tracing::info!("Cleared browsing data");
    }

    // === Memory scheduler ===

    /// Run one suspension cycle over every open window
    pub fn run_memory_cycle(&self) -> CycleReport {
        let settings = self.store.settings();
        let mut windows = self.windows.lock();
        let Windows {
            sessions,
            scheduler,
        } = &mut *windows;

        scheduler.run_cycle(&settings, sessions.registries_mut())
    }

    /// Run [`Browser::run_memory_cycle`] every `scheduler_interval_secs`.
    /// Must be called from within a tokio runtime.
    pub fn start_scheduler(&self) -> SchedulerHandle {
        let browser = self.clone();
        spawn_scheduler(self.config.scheduler_interval(), move || {
            browser.run_memory_cycle();
        })
    }

    // === Download operations ===

    pub fn download_started(
        &self,
        filename: &str,
        total_bytes: u64,
        item: Arc<dyn DownloadItem>,
    ) -> String {
        self.downloads.on_started(filename, total_bytes, item)
    }

    /// Returns false for unknown or paused downloads
    pub fn download_progress(&self, id: &str, received_bytes: u64, total_bytes: u64) -> bool {
        self.downloads
            .on_progress(id, received_bytes, total_bytes)
            .is_some()
    }

    pub fn download_completed(&self, id: &str, path: &str) -> Result<bool> {
        match self.downloads.on_completed(id, path) {
            Some(download) => self.keep_finished(download).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn download_failed(&self, id: &str, state: &str) -> Result<bool> {
        match self.downloads.on_failed(id, state) {
            Some(download) => self.keep_finished(download).map(|_| true),
            None => Ok(false),
        }
    }

    /// Persist a terminal download so it stays listed until dismissed
    fn keep_finished(&self, download: Download) -> Result<()> {
        let entry = finished_entry(download);
        self.store.update(|state| state.downloads.insert(0, entry))?;
        Ok(())
    }

    /// Forward pause/resume/cancel. Unknown ids are ignored.
    pub fn control_download(&self, id: &str, action: DownloadAction) -> bool {
        self.downloads.control(id, action)
    }

    /// Downloads in flight, oldest first
    pub fn active_downloads(&self) -> Vec<Download> {
        self.downloads.active()
    }

    /// Terminal downloads not yet dismissed, newest first
    pub fn finished_downloads(&self) -> Vec<DownloadEntry> {
        self.store.read(|state| state.downloads.clone())
    }

    pub fn dismiss_download(&self, id: &str) -> Result<bool> {
        let removed = self.store.update(|state| {
            let before = state.downloads.len();
            state.downloads.retain(|d| d.id != id);
            state.downloads.len() != before
        })?;
        Ok(removed)
    }

    pub fn open_download_path(&self, path: &str, kind: OpenKind) -> bool {
        open_path(self.opener.as_ref(), path, kind)
    }

    // === Bookmark operations ===

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        bookmarks::list(&self.store)
    }

    pub fn add_bookmark(&self, title: &str, url: &str, favicon: Option<&str>) -> Result<Bookmark> {
        bookmarks::add(&self.store, title, url, favicon, self.clock.now())
    }

    pub fn remove_bookmark(&self, id: i64) -> Result<bool> {
        bookmarks::remove(&self.store, id)
    }

    pub fn update_bookmark(&self, id: i64, changes: BookmarkUpdate) -> Result<Bookmark> {
        bookmarks::update(&self.store, id, changes)
    }

    /// Bookmark the active tab of `window`
    pub fn bookmark_active_tab(&self, window: WindowId) -> Result<Bookmark> {
        let (title, url) = self.with_window(window, |session| {
            let tab = session
                .registry()
                .active_tab()
                .ok_or(CoreError::InvalidBookmark("No active tab".to_string()))?;
            Ok((tab.display_title().to_string(), tab.url().to_string()))
        })?;
        self.add_bookmark(&title, &url, None)
    }

    // === State import/export ===

    pub fn export_state(&self) -> Result<String> {
        Ok(self.store.export_json()?)
    }

    /// Replace the state record and apply the imported settings
    pub fn import_state(&self, json: &str) -> Result<()> {
        self.store.import_json(json)?;
        self.apply_settings(&self.store.settings());
        Ok(())
    }

    // === Lifecycle ===

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Close every window
    pub fn shutdown(&self) {
        self.windows.lock().sessions.shutdown();
        tracing::info!("Browser shut down");
    }
}

fn finished_entry(download: Download) -> DownloadEntry {
    let outcome = match download.state {
        DownloadState::Completed => DownloadOutcome::Completed,
        DownloadState::Cancelled => DownloadOutcome::Cancelled,
        _ => DownloadOutcome::Interrupted,
    };

    DownloadEntry {
        id: download.id,
        filename: download.filename,
        outcome,
        received_bytes: download.received_bytes,
        total_bytes: download.total_bytes,
        path: download.path,
        reason: download.reason.map(|r| r.as_str().to_string()),
        finished_at: download.finished_at.unwrap_or_else(Utc::now),
    }
}

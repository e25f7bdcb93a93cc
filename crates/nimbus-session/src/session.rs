//! Browser window session
//!
//! A session is one open window: its incognito flag, its tab registry and
//! the toolbar state reflecting the active tab.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use nimbus_navigation::{HistoryManager, InputResolution, NavigationController};
use nimbus_storage::{HistoryEntry, Settings};
use nimbus_tabs::{
    EventOutcome, NavigationState, PageEvent, TabId, TabOptions, TabRegistry,
};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address bar and back/forward buttons
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolbar {
    pub address: String,
    pub navigation: NavigationState,
}

pub struct Session {
    id: WindowId,
    incognito: bool,
    registry: TabRegistry,
    toolbar: Toolbar,
    created_at: DateTime<Utc>,
}

impl Session {
    /// Open a window with one tab at `start_url`
    pub(crate) fn open(id: WindowId, incognito: bool, mut registry: TabRegistry, start_url: &str) -> Self {
        let created_at = registry.clock().now();
        registry.create_tab(start_url, TabOptions::default());

        let mut session = Self {
            id,
            incognito,
            registry,
            toolbar: Toolbar::default(),
            created_at,
        };
        session.sync_toolbar();
        session
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn is_incognito(&self) -> bool {
        self.incognito
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn registry(&self) -> &TabRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TabRegistry {
        &mut self.registry
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    pub fn active_tab_id(&self) -> Option<TabId> {
        self.registry.active_id()
    }

    /// Reflect the active tab in the toolbar
    fn sync_toolbar(&mut self) {
        match self.registry.active_tab() {
            Some(tab) => {
                self.toolbar.address = tab.url().to_string();
                self.toolbar.navigation = tab.navigation_state();
            }
            None => self.toolbar = Toolbar::default(),
        }
    }

    pub fn create_tab(&mut self, url: &str, options: TabOptions) -> TabId {
        let tab_id = self.registry.create_tab(url, options);
        self.sync_toolbar();
        tab_id
    }

    pub fn switch_tab(&mut self, tab_id: TabId) -> Result<()> {
        self.registry.switch_tab(tab_id)?;
        self.sync_toolbar();
        Ok(())
    }

    pub fn close_tab(&mut self, tab_id: TabId) -> Result<()> {
        self.registry.close_tab(tab_id)?;
        self.sync_toolbar();
        Ok(())
    }

    /// Route a page event. Stale tab ids are ignored.
    pub fn handle_event(
        &mut self,
        tab_id: TabId,
        event: &PageEvent,
        history: &HistoryManager,
    ) -> Result<Option<EventOutcome>> {
        let Some(outcome) = self.registry.apply_event(tab_id, event) else {
            tracing::debug!(window_id = %self.id, tab_id = %tab_id, "Ignoring event for closed tab");
            return Ok(None);
        };

        if let Some(address) = &outcome.address {
            self.toolbar.address = address.clone();
        }
        if outcome.is_active {
            self.toolbar.navigation = self.registry.navigation_state_of(tab_id);
        }

        if let Some(visit) = &outcome.visit {
            history.record_visit(&visit.title, &visit.url, self.incognito)?;
        }

        Ok(Some(outcome))
    }

    fn navigation<'a>(&'a mut self, settings: &'a Settings) -> NavigationController<'a> {
        NavigationController::new(&mut self.registry, settings)
    }

    pub fn navigate(&mut self, input: &str, settings: &Settings) -> Result<Option<InputResolution>> {
        let resolution = self.navigation(settings).navigate_to_url(input)?;
        self.sync_toolbar();
        Ok(resolution)
    }

    pub fn go_back(&mut self, settings: &Settings) -> Result<bool> {
        let moved = self.navigation(settings).go_back()?;
        self.sync_toolbar();
        Ok(moved)
    }

    pub fn go_forward(&mut self, settings: &Settings) -> Result<bool> {
        let moved = self.navigation(settings).go_forward()?;
        self.sync_toolbar();
        Ok(moved)
    }

    pub fn refresh(&mut self, settings: &Settings) -> Result<()> {
        self.navigation(settings).refresh()?;
        Ok(())
    }

    pub fn go_home(&mut self, settings: &Settings) -> Result<Option<InputResolution>> {
        let resolution = self.navigation(settings).go_home()?;
        self.sync_toolbar();
        Ok(resolution)
    }

    /// History as shown in this window. Incognito windows show none.
    pub fn history(&self, history: &HistoryManager, query: Option<&str>) -> Vec<HistoryEntry> {
        if self.incognito {
            return Vec::new();
        }
        match query {
            Some(query) => history.search(query),
            None => history.entries(),
        }
    }

    /// Detach every tab before the window goes away
    pub(crate) fn close(&mut self) {
        self.registry.shutdown();
        self.toolbar = Toolbar::default();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("incognito", &self.incognito)
            .field("tabs", &self.registry.len())
            .field("toolbar", &self.toolbar)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_navigation::HistoryExclusions;
    use nimbus_storage::StateStore;
    use nimbus_tabs::testing::RecordingFactory;
    use nimbus_tabs::{ManualClock, RegistryConfig};
    use std::sync::Arc;

    fn session(incognito: bool) -> (Session, RecordingFactory, HistoryManager) {
        let factory = RecordingFactory::new();
        let clock = Arc::new(ManualClock::default());
        let registry = TabRegistry::new(
            RegistryConfig {
                incognito_window: incognito,
                default_url: "https://www.google.com".to_string(),
                privacy_partition: "test".to_string(),
                placeholder_url: "about:blank#suspended".to_string(),
            },
            Box::new(factory.clone()),
            clock.clone(),
        );
        let history = HistoryManager::new(
            StateStore::open_in_memory().unwrap(),
            HistoryExclusions {
                default_url: "https://www.google.com".to_string(),
                placeholder_url: "about:blank#suspended".to_string(),
            },
            clock,
        );
        (
            Session::open(WindowId(0), incognito, registry, "https://start.example"),
            factory,
            history,
        )
    }

    fn navigated(url: &str) -> PageEvent {
        PageEvent::Navigated {
            url: url.to_string(),
        }
    }

    #[test]
    fn test_navigation_event_records_history() {
        let (mut session, factory, history) = session(false);
        let tab_id = session.active_tab_id().unwrap();
        {
            let log = factory.log(tab_id).unwrap();
            let mut log = log.lock();
            log.title = Some("Docs".to_string());
            log.can_go_back = true;
        }

        session
            .handle_event(tab_id, &navigated("https://docs.example"), &history)
            .unwrap();

        assert_eq!(session.toolbar().address, "https://docs.example");
        assert!(session.toolbar().navigation.can_go_back);
        let entries = history.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Docs");
        assert_eq!(session.history(&history, Some("docs")).len(), 1);
    }

    #[test]
    fn test_background_event_keeps_address_bar() {
        let (mut session, _factory, history) = session(false);
        let background = session.active_tab_id().unwrap();
        session.create_tab("https://front.example", TabOptions::default());

        session
            .handle_event(background, &navigated("https://moved.example"), &history)
            .unwrap();

        assert_eq!(session.toolbar().address, "https://front.example");
        assert_eq!(history.entries().len(), 1);
    }

    #[test]
    fn test_incognito_window_records_nothing() {
        let (mut session, _factory, history) = session(true);
        let tab_id = session.active_tab_id().unwrap();

        for url in ["https://a.example", "https://b.example/x"] {
            session.handle_event(tab_id, &navigated(url), &history).unwrap();
        }

        assert!(history.entries().is_empty());
        history.record_visit("x", "https://c.example", false).unwrap();
        assert!(session.history(&history, None).is_empty());
    }

    #[test]
    fn test_stale_event_is_ignored() {
        let (mut session, _factory, history) = session(false);
        let closed = session.active_tab_id().unwrap();
        session.create_tab("https://b.example", TabOptions::default());
        session.close_tab(closed).unwrap();

        let outcome = session
            .handle_event(closed, &navigated("https://late.example"), &history)
            .unwrap();
        assert!(outcome.is_none());
        assert!(history.entries().is_empty());
    }

    #[test]
    fn test_in_page_navigation_updates_address_only() {
        let (mut session, _factory, history) = session(false);
        let tab_id = session.active_tab_id().unwrap();

        session
            .handle_event(
                tab_id,
                &PageEvent::NavigatedInPage {
                    url: "https://start.example/#section".to_string(),
                },
                &history,
            )
            .unwrap();

        assert_eq!(session.toolbar().address, "https://start.example/#section");
        assert!(history.entries().is_empty());
    }

    #[test]
    fn test_navigate_and_close_update_toolbar() {
        let (mut session, _factory, _history) = session(false);
        let settings = Settings::default();
        let first = session.active_tab_id().unwrap();

        session.navigate("example.com", &settings).unwrap();
        assert_eq!(session.toolbar().address, "https://example.com");

        session.create_tab("https://second.example", TabOptions::default());
        assert_eq!(session.toolbar().address, "https://second.example");

        let second = session.active_tab_id().unwrap();
        session.close_tab(second).unwrap();
        assert_eq!(session.active_tab_id(), Some(first));
        assert_eq!(session.toolbar().address, "https://example.com");
    }
}

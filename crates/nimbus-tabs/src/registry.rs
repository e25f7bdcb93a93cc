//! Tab Registry
//!
//! Ordered tabs of one window. The registry is never empty while it is in
//! use: closing the last tab opens a fresh default tab.

use std::sync::Arc;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::TabError;
use crate::state::TabState;
use crate::tab::{NavigationState, Tab, TabId, TabInfo};
use crate::view::{PageEvent, PageViewFactory, Partition};
use crate::Result;

const UNTITLED: &str = "New Tab";

#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Every tab of an incognito window is incognito
    pub incognito_window: bool,
    /// URL opened when no URL is given or the last tab is closed
    pub default_url: String,
    /// Partition id shared by privacy-mode tabs
    pub privacy_partition: String,
    /// Page loaded into suspended tabs
    pub placeholder_url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabOptions {
    pub incognito: bool,
}

/// A committed navigation eligible for history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub title: String,
    pub url: String,
}

/// What a page event changed, for the caller to reflect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOutcome {
    pub tab_id: TabId,
    pub is_active: bool,
    /// URL to show in the address bar, only set for the active tab
    pub address: Option<String>,
    /// Navigation to record, never set for incognito or suspended tabs
    pub visit: Option<Visit>,
    pub title: Option<String>,
}

pub struct TabRegistry {
    config: RegistryConfig,
    tabs: Vec<Tab>,
    active: Option<TabId>,
    next_id: u64,
    privacy_mode: bool,
    factory: Box<dyn PageViewFactory>,
    clock: Arc<dyn Clock>,
}

impl TabRegistry {
    pub fn new(
        config: RegistryConfig,
        factory: Box<dyn PageViewFactory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            tabs: Vec::new(),
            active: None,
            next_id: 0,
            privacy_mode: false,
            factory,
            clock,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Applies to tabs created afterwards
    pub fn set_privacy_mode(&mut self, enabled: bool) {
        self.privacy_mode = enabled;
    }

    pub fn privacy_mode(&self) -> bool {
        self.privacy_mode
    }

    /// Create a tab and make it the active one
    pub fn create_tab(&mut self, url: &str, options: TabOptions) -> TabId {
        let id = TabId(self.next_id);
        self.next_id += 1;

        let incognito = options.incognito || self.config.incognito_window;
        let url = if url.trim().is_empty() {
            self.config.default_url.clone()
        } else {
            url.trim().to_string()
        };

        let partition = if incognito {
            Partition::Incognito(Uuid::new_v4().to_string())
        } else if self.privacy_mode {
            Partition::Privacy(self.config.privacy_partition.clone())
        } else {
            Partition::Persistent
        };

        let view = self.factory.create_view(id, &partition, &url);
        let tab = Tab::new(id, url, incognito, partition, view, self.clock.now());

        tracing::info!(
            tab_id = %id,
            url = %tab.url,
            partition = %tab.partition,
            "Created new tab"
        );

        self.tabs.push(tab);
        // The tab was just inserted, activation cannot miss
        if let Err(e) = self.switch_tab(id) {
            tracing::error!(tab_id = %id, error = %e, "Failed to activate new tab");
        }
        id
    }

    /// Reset a tab's idle clock and restore it if suspended.
    /// Returns true if the tab was restored.
    pub fn record_activity(&mut self, tab_id: TabId) -> Result<bool> {
        let now = self.clock.now();
        let tab = self.get_mut(tab_id)?;
        tab.touch(now);
        tab.restore(now)
    }

    /// Activity update, then activation of `tab_id`
    pub fn switch_tab(&mut self, tab_id: TabId) -> Result<NavigationState> {
        self.record_activity(tab_id)?;

        for tab in self.tabs.iter_mut().filter(|t| t.id != tab_id && t.is_active()) {
            tab.transition_to(TabState::Background)?;
        }

        let tab = self.get_mut(tab_id)?;
        tab.transition_to(TabState::Active)?;
        let navigation = tab.navigation_state();
        self.active = Some(tab_id);

        Ok(navigation)
    }

    /// Close a tab, stopping its load and detaching its view
    pub fn close_tab(&mut self, tab_id: TabId) -> Result<()> {
        let index = self
            .index_of(tab_id)
            .ok_or(TabError::NotFound(tab_id))?;

        let mut tab = self.tabs.remove(index);
        if tab.view.is_loading() {
            tab.view.stop();
        }
        tab.view.detach();

        tracing::info!(tab_id = %tab_id, "Closed tab");

        let was_active = self.active == Some(tab_id);
        if was_active {
            self.active = None;
        }

        if self.tabs.is_empty() {
            let url = self.config.default_url.clone();
            self.create_tab(&url, TabOptions::default());
        } else if was_active {
            let next = self.tabs[index.saturating_sub(1)].id;
            self.switch_tab(next)?;
        }

        Ok(())
    }

    /// Suspend a background tab. Suspending the active tab is an error.
    pub fn suspend_tab(&mut self, tab_id: TabId) -> Result<bool> {
        if self.active == Some(tab_id) {
            return Err(TabError::InvalidTransition {
                from: TabState::Active.to_string(),
                to: TabState::Suspended.to_string(),
            });
        }
        let placeholder_url = self.config.placeholder_url.clone();
        self.get_mut(tab_id)?.suspend(&placeholder_url)
    }

    /// Apply a page event. Events for tabs that no longer exist are ignored.
    pub fn apply_event(&mut self, tab_id: TabId, event: &PageEvent) -> Option<EventOutcome> {
        let is_active = self.active == Some(tab_id);
        let tab = self.tabs.iter_mut().find(|t| t.id == tab_id)?;

        let mut outcome = EventOutcome {
            tab_id,
            is_active,
            address: None,
            visit: None,
            title: None,
        };

        match event {
            PageEvent::LoadStarted => {}
            PageEvent::LoadStopped => {
                let title = tab
                    .view
                    .title()
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| UNTITLED.to_string());
                tab.set_title(title.clone());
                outcome.title = Some(title);
            }
            PageEvent::TitleChanged { title } => {
                tab.set_title(title.clone());
                outcome.title = Some(title.clone());
            }
            PageEvent::Navigated { url } => {
                // The placeholder commit may arrive after the tab was restored
                if tab.is_suspended() || *url == self.config.placeholder_url {
                    return Some(outcome);
                }
                tab.url = url.clone();
                if is_active {
                    outcome.address = Some(url.clone());
                }
                if !tab.incognito {
                    outcome.visit = Some(Visit {
                        title: tab.view.title().unwrap_or_default(),
                        url: url.clone(),
                    });
                }
            }
            PageEvent::NavigatedInPage { url } => {
                if is_active && !tab.is_suspended() && *url != self.config.placeholder_url {
                    outcome.address = Some(url.clone());
                }
            }
        }

        Some(outcome)
    }

    pub fn get(&self, tab_id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    pub fn get_mut(&mut self, tab_id: TabId) -> Result<&mut Tab> {
        self.tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or(TabError::NotFound(tab_id))
    }

    pub fn contains(&self, tab_id: TabId) -> bool {
        self.index_of(tab_id).is_some()
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn active_tab_mut(&mut self) -> Result<&mut Tab> {
        let id = self.active.ok_or(TabError::NoActiveTab)?;
        self.get_mut(id)
    }

    /// Tabs in display order
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Back/forward enablement, both false for unknown tabs
    pub fn navigation_state_of(&self, tab_id: TabId) -> NavigationState {
        self.get(tab_id)
            .map(Tab::navigation_state)
            .unwrap_or_default()
    }

    pub fn infos(&self) -> Vec<TabInfo> {
        self.tabs.iter().map(Tab::info).collect()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Tabs whose page view is live
    pub fn unsuspended_count(&self) -> usize {
        self.tabs.iter().filter(|t| !t.is_suspended()).count()
    }

    /// Detach every page view, used when the owning window closes
    pub fn shutdown(&mut self) {
        for mut tab in self.tabs.drain(..) {
            if tab.view.is_loading() {
                tab.view.stop();
            }
            tab.view.detach();
        }
        self.active = None;
    }

    fn index_of(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }
}

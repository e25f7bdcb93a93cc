//! Tab data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TabError;
use crate::state::TabState;
use crate::view::{PageView, Partition};
use crate::Result;

/// Monotonically increasing tab identity, never reused within a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Back/forward availability reported by the active page view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

/// Plain snapshot of a tab, detached from its page view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: TabId,
    pub url: String,
    pub title: String,
    pub incognito: bool,
    pub state: TabState,
    pub last_active: DateTime<Utc>,
}

pub struct Tab {
    pub(crate) id: TabId,
    pub(crate) url: String,
    pub(crate) title: String,
    pub(crate) incognito: bool,
    pub(crate) partition: Partition,
    pub(crate) state: TabState,
    pub(crate) last_active: DateTime<Utc>,
    /// URL to reload when a suspended tab is restored
    pub(crate) original_url: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) view: Box<dyn PageView>,
}

impl Tab {
    pub(crate) fn new(
        id: TabId,
        url: String,
        incognito: bool,
        partition: Partition,
        view: Box<dyn PageView>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            url,
            title: String::new(),
            incognito,
            partition,
            state: TabState::Background,
            last_active: now,
            original_url: None,
            created_at: now,
            view,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn incognito(&self) -> bool {
        self.incognito
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn state(&self) -> TabState {
        self.state
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    pub fn original_url(&self) -> Option<&str> {
        self.original_url.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_active(&self) -> bool {
        self.state == TabState::Active
    }

    pub fn is_suspended(&self) -> bool {
        self.state.is_suspended()
    }

    pub fn view(&self) -> &dyn PageView {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> &mut dyn PageView {
        self.view.as_mut()
    }

    pub fn info(&self) -> TabInfo {
        TabInfo {
            id: self.id,
            url: self.url.clone(),
            title: self.title.clone(),
            incognito: self.incognito,
            state: self.state,
            last_active: self.last_active,
        }
    }

    pub fn navigation_state(&self) -> NavigationState {
        NavigationState {
            can_go_back: self.view.can_go_back(),
            can_go_forward: self.view.can_go_forward(),
        }
    }

    /// Attempt to transition to a new state
    pub(crate) fn transition_to(&mut self, new_state: TabState) -> Result<()> {
        if !self.state.can_transition_to(new_state) {
            return Err(TabError::InvalidTransition {
                from: self.state.to_string(),
                to: new_state.to_string(),
            });
        }

        if self.state != new_state {
            tracing::debug!(
                tab_id = %self.id,
                from = %self.state,
                to = %new_state,
                "Tab state transition"
            );
        }

        self.state = new_state;
        Ok(())
    }

    /// Reset the idle clock
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_active = now;
    }

    /// Point the page view at a placeholder, keeping the URL for restore.
    /// Returns false if the tab was already suspended.
    pub(crate) fn suspend(&mut self, placeholder_url: &str) -> Result<bool> {
        if self.is_suspended() {
            return Ok(false);
        }

        self.transition_to(TabState::Suspended)?;
        // A tab already showing the placeholder keeps its saved URL
        if self.url != placeholder_url {
            self.original_url = Some(self.url.clone());
        }
        self.view.load_url(placeholder_url);

        tracing::info!(tab_id = %self.id, url = %self.url, "Suspended tab");
        Ok(true)
    }

    /// Reload the saved URL. Returns false if the tab was not suspended.
    pub(crate) fn restore(&mut self, now: DateTime<Utc>) -> Result<bool> {
        if !self.is_suspended() {
            return Ok(false);
        }

        self.transition_to(TabState::Background)?;
        if let Some(url) = self.original_url.take() {
            self.url = url;
        }
        self.view.load_url(&self.url);
        self.last_active = now;

        tracing::info!(tab_id = %self.id, url = %self.url, "Restored tab");
        Ok(true)
    }

    /// Load a URL in this tab's page view
    pub fn navigate(&mut self, url: String, now: DateTime<Utc>) {
        self.view.load_url(&url);
        self.url = url;
        self.last_active = now;
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    /// Get display title (with fallback to URL)
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

impl fmt::Debug for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tab")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("state", &self.state)
            .field("incognito", &self.incognito)
            .field("partition", &self.partition)
            .field("last_active", &self.last_active)
            .finish_non_exhaustive()
    }
}

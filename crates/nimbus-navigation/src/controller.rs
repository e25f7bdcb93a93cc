//! Navigation controller
//!
//! Borrowed per call over a window's tab registry. Every action first counts
//! as activity on the active tab, which resets its idle clock and restores it
//! if it was suspended.

use nimbus_storage::Settings;
use nimbus_tabs::{NavigationState, TabId, TabRegistry};

use crate::error::NavigationError;
use crate::input::{InputResolution, InputResolver};
use crate::Result;

pub struct NavigationController<'a> {
    registry: &'a mut TabRegistry,
    settings: &'a Settings,
}

impl<'a> NavigationController<'a> {
    pub fn new(registry: &'a mut TabRegistry, settings: &'a Settings) -> Self {
        Self { registry, settings }
    }

    fn touch_active(&mut self) -> Result<TabId> {
        let tab_id = self
            .registry
            .active_id()
            .ok_or(NavigationError::NoActiveTab)?;
        self.registry.record_activity(tab_id)?;
        Ok(tab_id)
    }

    /// Resolve `input` and load it in the active tab.
    /// Returns `None` for blank input.
    pub fn navigate_to_url(&mut self, input: &str) -> Result<Option<InputResolution>> {
        if input.trim().is_empty() {
            return Ok(None);
        }

        let tab_id = self.touch_active()?;
        let Some(resolution) = InputResolver::from_settings(self.settings).resolve(input) else {
            return Ok(None);
        };

        let now = self.registry.clock().now();
        let tab = self.registry.get_mut(tab_id)?;
        tab.navigate(resolution.url().to_string(), now);

        tracing::debug!(tab_id = %tab_id, url = %resolution.url(), "Navigating");
        Ok(Some(resolution))
    }

    /// Returns false when there is no history to go back to
    pub fn go_back(&mut self) -> Result<bool> {
        let tab_id = self.touch_active()?;
        let view = self.registry.get_mut(tab_id)?.view_mut();
        if !view.can_go_back() {
            return Ok(false);
        }
        view.go_back();
        Ok(true)
    }

    /// Returns false when there is no forward history
    pub fn go_forward(&mut self) -> Result<bool> {
        let tab_id = self.touch_active()?;
        let view = self.registry.get_mut(tab_id)?.view_mut();
        if !view.can_go_forward() {
            return Ok(false);
        }
        view.go_forward();
        Ok(true)
    }

    pub fn refresh(&mut self) -> Result<()> {
        let tab_id = self.touch_active()?;
        self.registry.get_mut(tab_id)?.view_mut().reload();
        Ok(())
    }

    pub fn go_home(&mut self) -> Result<Option<InputResolution>> {
        let homepage = self.settings.homepage.clone();
        self.navigate_to_url(&homepage)
    }

    /// Back/forward enablement of the active tab
    pub fn navigation_state(&self) -> NavigationState {
        self.registry
            .active_tab()
            .map(|tab| tab.navigation_state())
            .unwrap_or_default()
    }
}

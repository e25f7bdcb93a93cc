//! Session Manager
//!
//! Owns every open window. Closing a window detaches all of its tabs.

use std::sync::Arc;
use uuid::Uuid;

use nimbus_tabs::{Clock, PageViewFactory, RegistryConfig, TabRegistry};

use crate::error::SessionError;
use crate::session::{Session, WindowId};
use crate::Result;

/// Supplies a page view factory for each new window
pub trait WindowViews: Send {
    fn view_factory(&mut self, window: WindowId, incognito: bool) -> Box<dyn PageViewFactory>;
}

impl<F> WindowViews for F
where
    F: PageViewFactory + Clone + 'static,
{
    fn view_factory(&mut self, _window: WindowId, _incognito: bool) -> Box<dyn PageViewFactory> {
        Box::new(self.clone())
    }
}

pub struct SessionManager {
    windows: Vec<Session>,
    next_id: u64,
    views: Box<dyn WindowViews>,
    clock: Arc<dyn Clock>,
    default_url: String,
    placeholder_url: String,
    /// Shared by privacy-mode tabs of this run
    privacy_partition: String,
    privacy_mode: bool,
}

impl SessionManager {
    pub fn new(
        views: Box<dyn WindowViews>,
        clock: Arc<dyn Clock>,
        default_url: impl Into<String>,
        placeholder_url: impl Into<String>,
    ) -> Self {
        Self {
            windows: Vec::new(),
            next_id: 0,
            views,
            clock,
            default_url: default_url.into(),
            placeholder_url: placeholder_url.into(),
            privacy_partition: Uuid::new_v4().to_string(),
            privacy_mode: false,
        }
    }

    /// Open a window with a single tab at `start_url`, or the default URL
    pub fn open_window(&mut self, incognito: bool, start_url: &str) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id += 1;

        let mut registry = TabRegistry::new(
            RegistryConfig {
                incognito_window: incognito,
                default_url: self.default_url.clone(),
                privacy_partition: self.privacy_partition.clone(),
                placeholder_url: self.placeholder_url.clone(),
            },
            self.views.view_factory(id, incognito),
            Arc::clone(&self.clock),
        );
        registry.set_privacy_mode(self.privacy_mode);

        let start_url = if start_url.trim().is_empty() {
            self.default_url.clone()
        } else {
            start_url.to_string()
        };

        self.windows
            .push(Session::open(id, incognito, registry, &start_url));

        tracing::info!(window_id = %id, incognito, "Opened window");
        id
    }

    pub fn close_window(&mut self, id: WindowId) -> Result<()> {
        let index = self
            .windows
            .iter()
            .position(|w| w.id() == id)
            .ok_or(SessionError::NotFound(id))?;

        let mut session = self.windows.remove(index);
        session.close();

        tracing::info!(window_id = %id, "Closed window");
        Ok(())
    }

    pub fn window(&self, id: WindowId) -> Result<&Session> {
        self.windows
            .iter()
            .find(|w| w.id() == id)
            .ok_or(SessionError::NotFound(id))
    }

    pub fn window_mut(&mut self, id: WindowId) -> Result<&mut Session> {
        self.windows
            .iter_mut()
            .find(|w| w.id() == id)
            .ok_or(SessionError::NotFound(id))
    }

    pub fn windows(&self) -> &[Session] {
        &self.windows
    }

    /// Tab registries of every open window
    pub fn registries_mut(&mut self) -> impl Iterator<Item = &mut TabRegistry> {
        self.windows.iter_mut().map(Session::registry_mut)
    }

    /// Applies to tabs created afterwards, in every window
    pub fn set_privacy_mode(&mut self, enabled: bool) {
        self.privacy_mode = enabled;
        for registry in self.registries_mut() {
            registry.set_privacy_mode(enabled);
        }
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Close every window
    pub fn shutdown(&mut self) {
        for session in &mut self.windows {
            session.close();
        }
        self.windows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_tabs::testing::RecordingFactory;
    use nimbus_tabs::{ManualClock, Partition, TabOptions};

    fn manager() -> (SessionManager, RecordingFactory) {
        let factory = RecordingFactory::new();
        let manager = SessionManager::new(
            Box::new(factory.clone()),
            Arc::new(ManualClock::default()),
            "https://www.google.com",
            "about:blank#suspended",
        );
        (manager, factory)
    }

    #[test]
    fn test_open_window_starts_with_one_tab() {
        let (mut manager, _factory) = manager();
        let id = manager.open_window(false, "https://home.example");

        let window = manager.window(id).unwrap();
        assert_eq!(window.registry().len(), 1);
        assert_eq!(window.toolbar().address, "https://home.example");
        assert!(window.registry().active_tab().unwrap().is_active());
    }

    #[test]
    fn test_blank_start_url_uses_default() {
        let (mut manager, _factory) = manager();
        let id = manager.open_window(false, "");
        assert_eq!(
            manager.window(id).unwrap().toolbar().address,
            "https://www.google.com"
        );
    }

    #[test]
    fn test_incognito_window_tabs() {
        let (mut manager, factory) = manager();
        let id = manager.open_window(true, "https://a.example");
        let window = manager.window_mut(id).unwrap();
        let tab_id = window.create_tab("https://b.example", TabOptions::default());

        assert!(window.is_incognito());
        assert!(window.registry().get(tab_id).unwrap().incognito());
        assert!(matches!(
            factory.log(tab_id).unwrap().lock().partition,
            Some(Partition::Incognito(_))
        ));
    }

    #[test]
    fn test_privacy_mode_shares_partition_across_windows() {
        let (mut manager, _factory) = manager();
        manager.set_privacy_mode(true);
        let first = manager.open_window(false, "https://a.example");
        let second = manager.open_window(false, "https://b.example");

        let partition = |id| {
            manager
                .window(id)
                .unwrap()
                .registry()
                .active_tab()
                .unwrap()
                .partition()
                .clone()
        };
        assert!(matches!(partition(first), Partition::Privacy(_)));
        assert_eq!(partition(first), partition(second));
    }

    #[test]
    fn test_close_window_detaches_tabs() {
        let (mut manager, factory) = manager();
        let id = manager.open_window(false, "https://a.example");
        let tab_id = manager.window(id).unwrap().active_tab_id().unwrap();

        manager.close_window(id).unwrap();

        assert!(manager.is_empty());
        assert!(factory.log(tab_id).unwrap().lock().detached);
        assert!(matches!(
            manager.close_window(id),
            Err(SessionError::NotFound(_))
        ));
    }

    #[test]
    fn test_registries_cover_all_windows() {
        let (mut manager, _factory) = manager();
        manager.open_window(false, "https://a.example");
        manager.open_window(true, "https://b.example");

        assert_eq!(manager.registries_mut().count(), 2);
    }
}

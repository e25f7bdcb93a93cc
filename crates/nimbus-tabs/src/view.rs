//! Page view seam
//!
//! The embedding layer renders content in its own processes. This core only
//! drives a page view through [`PageView`] and observes it through
//! [`PageEvent`]s that may arrive at any later point, including after the
//! owning tab was closed.

use std::fmt;

use crate::tab::TabId;

/// Storage/cookie isolation boundary of a page view
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Partition {
    /// Shared, persisted default partition
    Persistent,
    /// Ephemeral partition shared by privacy-mode tabs of one browser run
    Privacy(String),
    /// Ephemeral partition owned by a single incognito tab
    Incognito(String),
}

impl Partition {
    pub fn name(&self) -> String {
        match self {
            Partition::Persistent => "persist:main".to_string(),
            Partition::Privacy(id) => format!("privacy-{}", id),
            Partition::Incognito(id) => format!("incognito-tab-{}", id),
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, Partition::Persistent)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Notifications delivered by a page view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    LoadStarted,
    LoadStopped,
    /// Top-level navigation committed
    Navigated { url: String },
    /// Fragment or history-API navigation within the same document
    NavigatedInPage { url: String },
    TitleChanged { title: String },
}

/// An embedded web content surface owned by one tab
pub trait PageView: Send {
    fn load_url(&mut self, url: &str);

    fn title(&self) -> Option<String>;

    fn can_go_back(&self) -> bool;

    fn can_go_forward(&self) -> bool;

    fn go_back(&mut self);

    fn go_forward(&mut self);

    fn reload(&mut self);

    fn is_loading(&self) -> bool;

    /// Halt any in-flight load
    fn stop(&mut self);

    /// Release the view. No events are processed for it afterwards.
    fn detach(&mut self);
}

/// Creates page views for new tabs. Events from the created view must be
/// tagged with `tab_id`.
pub trait PageViewFactory: Send {
    fn create_view(&mut self, tab_id: TabId, partition: &Partition, url: &str)
        -> Box<dyn PageView>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_names() {
        assert_eq!(Partition::Persistent.name(), "persist:main");
        assert_eq!(Partition::Privacy("a".into()).name(), "privacy-a");
        assert_eq!(Partition::Incognito("b".into()).to_string(), "incognito-tab-b");
        assert!(!Partition::Incognito("b".into()).is_persistent());
    }
}

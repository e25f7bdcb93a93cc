//! Tab State Machine
//!
//! ```text
//! Active
//!   ↓ blur        ↑ focus
//! Background
//!   ↓ suspend     ↑ restore
//! Suspended ──────→ Active (restore on activation)
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabState {
    /// Tab is currently visible and active
    Active,
    /// Tab is loaded but not visible
    Background,
    /// Page view shows the placeholder, only the URL is kept
    Suspended,
}

impl TabState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: TabState) -> bool {
        match (self, target) {
            (TabState::Active, TabState::Background) => true,
            (TabState::Background, TabState::Active) => true,
            (TabState::Background, TabState::Suspended) => true,
            (TabState::Suspended, TabState::Background) => true,
            (TabState::Suspended, TabState::Active) => true,
            // Same state is always valid (no-op)
            (a, b) if *a == b => true,
            // The active tab is never suspended
            _ => false,
        }
    }

    pub fn is_suspended(&self) -> bool {
        matches!(self, TabState::Suspended)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TabState::Active => "active",
            TabState::Background => "background",
            TabState::Suspended => "suspended",
        }
    }
}

impl std::fmt::Display for TabState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TabState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(TabState::Active),
            "background" => Ok(TabState::Background),
            "suspended" => Ok(TabState::Suspended),
            _ => Err(format!("Unknown tab state: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(TabState::Active.can_transition_to(TabState::Background));
        assert!(TabState::Background.can_transition_to(TabState::Active));
        assert!(TabState::Background.can_transition_to(TabState::Suspended));
        assert!(TabState::Suspended.can_transition_to(TabState::Active));
        assert!(TabState::Suspended.can_transition_to(TabState::Background));
    }

    #[test]
    fn test_active_cannot_be_suspended() {
        assert!(!TabState::Active.can_transition_to(TabState::Suspended));
    }

    #[test]
    fn test_parse_roundtrip() {
        for state in [TabState::Active, TabState::Background, TabState::Suspended] {
            assert_eq!(state.as_str().parse::<TabState>().unwrap(), state);
        }
        assert!("frozen".parse::<TabState>().is_err());
    }
}

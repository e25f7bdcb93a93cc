//! Suspension policies
//!
//! Pure functions over tab snapshots. Every policy ignores the active tab and
//! tabs that are already suspended.

use chrono::{DateTime, Duration, Utc};
use nimbus_storage::{Settings, DEFAULT_SUSPEND_MINUTES};
use nimbus_tabs::{TabId, TabInfo};

/// Number of live tabs the smart limit keeps
pub const SMART_TAB_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyThresholds {
    /// Background tabs idle for longer than this are suspended
    pub idle_limit: Duration,
    pub smart_limit: bool,
    pub max_ram_mb: Option<u64>,
}

impl PolicyThresholds {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            idle_limit: idle_limit(settings.suspend_minutes()),
            smart_limit: settings.smart_limit,
            max_ram_mb: settings.max_ram_mb(),
        }
    }
}

/// Out-of-range values fall back to the default threshold
fn idle_limit(minutes: u64) -> Duration {
    i64::try_from(minutes)
        .ok()
        .and_then(Duration::try_minutes)
        .unwrap_or_else(|| Duration::minutes(DEFAULT_SUSPEND_MINUTES as i64))
}

fn eligible<'a>(
    tabs: &'a [TabInfo],
    active: Option<TabId>,
) -> impl Iterator<Item = &'a TabInfo> + 'a {
    tabs.iter()
        .filter(move |t| Some(t.id) != active && !t.state.is_suspended())
}

/// Eligible tabs ordered by last activity, oldest first
fn oldest_first(tabs: &[TabInfo], active: Option<TabId>) -> Vec<&TabInfo> {
    let mut candidates: Vec<&TabInfo> = eligible(tabs, active).collect();
    candidates.sort_by_key(|t| t.last_active);
    candidates
}

/// Tabs idle for strictly longer than `idle_limit`
pub fn idle_candidates(
    tabs: &[TabInfo],
    active: Option<TabId>,
    idle_limit: Duration,
    now: DateTime<Utc>,
) -> Vec<TabId> {
    eligible(tabs, active)
        .filter(|t| now - t.last_active > idle_limit)
        .map(|t| t.id)
        .collect()
}

/// Every eligible tab, oldest first, once resident memory exceeds the limit
pub fn ram_candidates(
    tabs: &[TabInfo],
    active: Option<TabId>,
    resident_mb: u64,
    limit_mb: u64,
) -> Vec<TabId> {
    if resident_mb <= limit_mb {
        return Vec::new();
    }
    oldest_first(tabs, active).into_iter().map(|t| t.id).collect()
}

/// Oldest tabs beyond [`SMART_TAB_LIMIT`] live tabs. The active tab counts
/// towards the limit but is never selected.
pub fn smart_limit_candidates(tabs: &[TabInfo], active: Option<TabId>) -> Vec<TabId> {
    let live = tabs.iter().filter(|t| !t.state.is_suspended()).count();
    if live <= SMART_TAB_LIMIT {
        return Vec::new();
    }

    oldest_first(tabs, active)
        .into_iter()
        .take(live - SMART_TAB_LIMIT)
        .map(|t| t.id)
        .collect()
}

/// Union of all enabled policies, each tab at most once.
/// `resident_mb` is `None` when no reading is available or no ceiling is set.
pub fn select_for_suspension(
    tabs: &[TabInfo],
    active: Option<TabId>,
    thresholds: &PolicyThresholds,
    resident_mb: Option<u64>,
    now: DateTime<Utc>,
) -> Vec<TabId> {
    let mut selected = idle_candidates(tabs, active, thresholds.idle_limit, now);

    let mut extend = |ids: Vec<TabId>| {
        for id in ids {
            if !selected.contains(&id) {
                selected.push(id);
            }
        }
    };

    if let (Some(limit), Some(current)) = (thresholds.max_ram_mb, resident_mb) {
        extend(ram_candidates(tabs, active, current, limit));
    }

    if thresholds.smart_limit {
        extend(smart_limit_candidates(tabs, active));
    }

    selected
}

//! Bookmark operations over the state record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nimbus_storage::{Bookmark, StateStore};

use crate::error::CoreError;
use crate::Result;

/// Fields to change on an existing bookmark. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkUpdate {
    pub title: Option<String>,
    pub url: Option<String>,
    pub favicon: Option<String>,
}

/// Favicon service reference used when none is supplied
pub fn default_favicon(url: &str) -> String {
    format!("https://www.google.com/s2/favicons?domain={}", url)
}

fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(CoreError::InvalidBookmark(
            "Bookmark URL cannot be empty".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn list(store: &StateStore) -> Vec<Bookmark> {
    store.read(|state| state.bookmarks.clone())
}

pub(crate) fn add(
    store: &StateStore,
    title: &str,
    url: &str,
    favicon: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Bookmark> {
    validate_url(url)?;

    let title = if title.trim().is_empty() { url } else { title };
    let favicon = match favicon.filter(|f| !f.trim().is_empty()) {
        Some(favicon) => favicon.to_string(),
        None => default_favicon(url),
    };

    let bookmark = store.update(|state| {
        let bookmark = Bookmark {
            id: state.next_bookmark_id(now.timestamp_millis()),
            title: title.to_string(),
            url: url.to_string(),
            favicon,
            created_at: now,
        };
        state.bookmarks.push(bookmark.clone());
        bookmark
    })?;

    tracing::info!(bookmark_id = bookmark.id, url = %bookmark.url, "Added bookmark");
    Ok(bookmark)
}

/// Returns false when no bookmark has `id`
pub(crate) fn remove(store: &StateStore, id: i64) -> Result<bool> {
    let removed = store.update(|state| {
        let before = state.bookmarks.len();
        state.bookmarks.retain(|b| b.id != id);
        state.bookmarks.len() != before
    })?;

    if removed {
        tracing::info!(bookmark_id = id, "Removed bookmark");
    }
    Ok(removed)
}

pub(crate) fn update(store: &StateStore, id: i64, changes: BookmarkUpdate) -> Result<Bookmark> {
    if let Some(url) = &changes.url {
        validate_url(url)?;
    }

    let updated = store.update(|state| {
        let bookmark = state.bookmarks.iter_mut().find(|b| b.id == id)?;
        if let Some(title) = changes.title {
            bookmark.title = title;
        }
        if let Some(url) = changes.url {
            bookmark.url = url;
        }
        if let Some(favicon) = changes.favicon {
            bookmark.favicon = favicon;
        }
        Some(bookmark.clone())
    })?;

    updated.ok_or(CoreError::BookmarkNotFound(id))
}

//! State store
//!
//! Owns the in-memory copy of the state record and writes it through to the
//! database on every mutation.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::database::Database;
use crate::error::StorageError;
use crate::settings::Settings;
use crate::state::{BrowserState, STATE_VERSION};
use crate::Result;

const STATE_KEY: &str = "browser";

pub struct StateStore {
    db: Database,
    state: Arc<RwLock<BrowserState>>,
}

impl StateStore {
    /// Load the record, replacing it with defaults if it cannot be parsed
    pub fn open(db: Database) -> Result<Self> {
        let state = match db.get_record(STATE_KEY)? {
            Some(raw) => match serde_json::from_str::<BrowserState>(&raw) {
                Ok(state) => {
                    if state.version != STATE_VERSION {
                        tracing::debug!(
                            stored = %state.version,
                            current = STATE_VERSION,
                            "Merged state record from another version"
                        );
                    }
                    state
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Stored state is corrupt, using defaults");
                    BrowserState::default()
                }
            },
            None => BrowserState::default(),
        };

        tracing::info!(
            bookmarks = state.bookmarks.len(),
            history = state.history.len(),
            "Loaded browser state"
        );

        Ok(Self {
            db,
            state: Arc::new(RwLock::new(state)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(Database::open_in_memory()?)
    }

    pub fn snapshot(&self) -> BrowserState {
        self.state.read().clone()
    }

    pub fn settings(&self) -> Settings {
        self.state.read().settings.clone()
    }

    pub fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&BrowserState) -> T,
    {
        f(&self.state.read())
    }

    /// Apply a mutation and persist it. The in-memory record only changes
    /// once the new version has been written.
    pub fn update<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut BrowserState) -> T,
    {
        let mut state = self.state.write();
        let mut next = state.clone();
        let result = f(&mut next);

        if let Err(e) = self.persist(&next) {
            tracing::error!(error = %e, "Failed to save browser state");
            return Err(e);
        }

        *state = next;
        Ok(result)
    }

    /// Write the current record again
    pub fn save(&self) -> Result<()> {
        let state = self.state.read();
        self.persist(&state)
    }

    /// Complete snapshot suitable for [`StateStore::import_json`]
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&*self.state.read())?)
    }

    /// Replace the record with an imported one, merged onto defaults.
    /// Malformed input leaves the current record untouched.
    pub fn import_json(&self, json: &str) -> Result<()> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(StorageError::InvalidImport(
                "expected a JSON object".to_string(),
            ));
        }

        let mut imported: BrowserState = serde_json::from_value(value)?;
        imported.version = STATE_VERSION.to_string();

        self.update(|state| *state = imported)?;
        tracing::info!("Imported browser state");
        Ok(())
    }

    fn persist(&self, state: &BrowserState) -> Result<()> {
        let serialized = serde_json::to_string(state)?;
        self.db.put_record(STATE_KEY, &state.version, &serialized)
    }
}

impl Clone for StateStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

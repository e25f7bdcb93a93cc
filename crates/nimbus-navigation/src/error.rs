//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("No active tab")]
    NoActiveTab,

    #[error("Tab error: {0}")]
    Tab(#[from] nimbus_tabs::TabError),

    #[error("Storage error: {0}")]
    Storage(#[from] nimbus_storage::StorageError),
}

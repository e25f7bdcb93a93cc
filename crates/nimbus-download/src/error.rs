//! Download error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Unknown download action: {0}")]
    UnknownAction(String),

    #[error("Unknown open type: {0}")]
    UnknownOpenKind(String),
}

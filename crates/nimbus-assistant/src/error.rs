//! Assistant error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Could not reach the model server: {0}")]
    Unavailable(String),

    #[error("Message is empty")]
    EmptyMessage,
}

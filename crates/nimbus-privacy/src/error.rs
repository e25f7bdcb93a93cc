//! Privacy error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrivacyError {
    #[error("Invalid proxy URL: {0}")]
    InvalidProxy(String),
}

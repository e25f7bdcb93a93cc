//! Scheduler error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Memory metrics unavailable: {0}")]
    Metrics(String),
}

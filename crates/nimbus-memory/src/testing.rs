//! Scripted memory readings for tests

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::SchedulerError;
use crate::metrics::MemoryMetrics;
use crate::Result;

/// Returns queued readings in order, then repeats the last one.
/// `None` entries simulate a failed query.
#[derive(Clone, Default)]
pub struct ScriptedMetrics {
    readings: Arc<Mutex<VecDeque<Option<u64>>>>,
    last: Arc<Mutex<Option<u64>>>,
    queries: Arc<Mutex<usize>>,
}

impl ScriptedMetrics {
    pub fn new<I>(readings: I) -> Self
    where
        I: IntoIterator<Item = Option<u64>>,
    {
        Self {
            readings: Arc::new(Mutex::new(readings.into_iter().collect())),
            ..Self::default()
        }
    }

    pub fn push(&self, reading: Option<u64>) {
        self.readings.lock().push_back(reading);
    }

    /// Number of times the reading was requested
    pub fn queries(&self) -> usize {
        *self.queries.lock()
    }
}

impl MemoryMetrics for ScriptedMetrics {
    fn resident_mb(&mut self) -> Result<u64> {
        *self.queries.lock() += 1;

        let next = match self.readings.lock().pop_front() {
            Some(reading) => {
                *self.last.lock() = reading;
                reading
            }
            None => *self.last.lock(),
        };

        next.ok_or_else(|| SchedulerError::Metrics("scripted failure".to_string()))
    }
}

//! Nimbus Memory Scheduler
//!
//! Periodically selects background tabs to suspend. Three independent
//! policies (idle timeout, process memory ceiling and the smart tab limit)
//! each flag candidates; the union is suspended once per cycle. Restoring a
//! tab is never done here, it happens when the tab is used again.

mod driver;
mod error;
mod metrics;
mod policy;
mod scheduler;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use driver::{spawn_scheduler, SchedulerHandle};
pub use error::SchedulerError;
pub use metrics::{MemoryMetrics, ProcessMetrics};
pub use policy::{
    idle_candidates, ram_candidates, select_for_suspension, smart_limit_candidates,
    PolicyThresholds, SMART_TAB_LIMIT,
};
pub use scheduler::{CycleReport, MemoryScheduler};

pub type Result<T> = std::result::Result<T, SchedulerError>;

//! Process memory readings

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

use crate::error::SchedulerError;
use crate::Result;

/// Aggregate resident memory of the browser, queried once per cycle
pub trait MemoryMetrics: Send {
    fn resident_mb(&mut self) -> Result<u64>;
}

/// Resident memory of this process plus its direct child processes
pub struct ProcessMetrics {
    system: System,
    pid: Pid,
}

impl ProcessMetrics {
    pub fn new() -> Result<Self> {
        let pid = sysinfo::get_current_pid().map_err(|e| SchedulerError::Metrics(e.to_string()))?;
        Ok(Self {
            system: System::new(),
            pid,
        })
    }
}

impl MemoryMetrics for ProcessMetrics {
    fn resident_mb(&mut self) -> Result<u64> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );

        let Some(own) = self.system.process(self.pid) else {
            return Err(SchedulerError::Metrics(format!(
                "process {} not found",
                self.pid
            )));
        };

        let children: u64 = self
            .system
            .processes()
            .values()
            .filter(|p| p.parent() == Some(self.pid))
            .map(|p| p.memory())
            .sum();

        // bytes
        Ok((own.memory() + children) / (1024 * 1024))
    }
}

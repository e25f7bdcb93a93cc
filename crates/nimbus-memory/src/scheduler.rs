//! One scheduler cycle over the open tab registries

use nimbus_storage::Settings;
use nimbus_tabs::{TabId, TabRegistry};

use crate::metrics::MemoryMetrics;
use crate::policy::{select_for_suspension, PolicyThresholds};

/// Outcome of a single cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Memory saver was off, nothing was evaluated
    pub skipped: bool,
    pub resident_mb: Option<u64>,
    /// Suspended tabs, grouped by registry in iteration order
    pub suspended: Vec<Vec<TabId>>,
}

impl CycleReport {
    pub fn suspended_count(&self) -> usize {
        self.suspended.iter().map(Vec::len).sum()
    }
}

pub struct MemoryScheduler {
    metrics: Box<dyn MemoryMetrics>,
}

impl MemoryScheduler {
    pub fn new(metrics: Box<dyn MemoryMetrics>) -> Self {
        Self { metrics }
    }

    /// Evaluate every policy against each registry and suspend the union.
    /// Thresholds are read from `settings` on every call.
    pub fn run_cycle<'a, I>(&mut self, settings: &Settings, registries: I) -> CycleReport
    where
        I: IntoIterator<Item = &'a mut TabRegistry>,
    {
        if !settings.memory_saver {
            tracing::debug!("Memory saver disabled, skipping cycle");
            return CycleReport {
                skipped: true,
                ..CycleReport::default()
            };
        }

        let thresholds = PolicyThresholds::from_settings(settings);
        let resident_mb = thresholds.max_ram_mb.and_then(|limit_mb| self.sample(limit_mb));

        let suspended = registries
            .into_iter()
            .map(|registry| self.suspend_in(registry, &thresholds, resident_mb))
            .collect();

        let report = CycleReport {
            skipped: false,
            resident_mb,
            suspended,
        };

        tracing::debug!(
            suspended = report.suspended_count(),
            current_mb = ?report.resident_mb,
            "Memory cycle finished"
        );

        report
    }

    /// A failed reading counts as no breach for this cycle
    fn sample(&mut self, limit_mb: u64) -> Option<u64> {
        match self.metrics.resident_mb() {
            Ok(current_mb) => {
                if current_mb > limit_mb {
                    tracing::info!(current_mb, limit_mb, "Memory ceiling exceeded");
                }
                Some(current_mb)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read memory usage");
                None
            }
        }
    }

    fn suspend_in(
        &self,
        registry: &mut TabRegistry,
        thresholds: &PolicyThresholds,
        resident_mb: Option<u64>,
    ) -> Vec<TabId> {
        let now = registry.clock().now();
        let candidates = select_for_suspension(
            &registry.infos(),
            registry.active_id(),
            thresholds,
            resident_mb,
            now,
        );

        let mut suspended = Vec::with_capacity(candidates.len());
        for tab_id in candidates {
            match registry.suspend_tab(tab_id) {
                Ok(true) => suspended.push(tab_id),
                Ok(false) => {}
                Err(e) => tracing::warn!(tab_id = %tab_id, error = %e, "Failed to suspend tab"),
            }
        }
        suspended
    }
}

//! Statistics derived from job history

use serde::{Deserialize, Serialize};

use crate::domain::{JobRecord, JobStatus};

/// Point-in-time counts over the full job history
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStats {
    pub pending: usize,
    pub processing: usize,
    pub done: usize,
    pub cancelled: usize,

    /// Mean `duration_ms` over done jobs, rounded; 0 when nothing is done
    pub avg_duration_ms: u64,

    /// Physical queue nodes, including cancelled jobs not yet skipped
    pub queue_depth: usize,
}

impl SchedulerStats {
    /// Aggregate over `history`
    pub fn from_history(history: &[JobRecord], queue_depth: usize) -> Self {
        let mut stats = Self {
            queue_depth,
            ..Default::default()
        };
        let mut total_ms: u64 = 0;

        for job in history {
            match job.status() {
                JobStatus::Pending => stats.pending += 1,
                JobStatus::Processing => stats.processing += 1,
                JobStatus::Cancelled => stats.cancelled += 1,
                JobStatus::Done => {
                    stats.done += 1;
                    total_ms += job.duration_ms().unwrap_or_default();
                }
            }
        }

        if stats.done > 0 {
            stats.avg_duration_ms = (total_ms as f64 / stats.done as f64).round() as u64;
        }
        stats
    }

    /// Number of jobs ever created
    pub fn total(&self) -> usize {
        self.pending + self.processing + self.done + self.cancelled
    }
}

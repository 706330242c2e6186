//! Render job scheduler
//!
//! Accepts per-segment render jobs, supersedes stale pending work for the
//! same segment, and drains the queue with a single background worker.

mod config;
mod core;
mod error;
mod stats;

pub use config::{PriorityOrdering, SchedulerConfig};
pub use core::RenderScheduler;
pub use error::SchedulerError;
pub use stats::SchedulerStats;

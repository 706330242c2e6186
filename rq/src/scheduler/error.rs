//! Scheduler error types

use thiserror::Error;

use crate::domain::Effect;

/// Errors returned to submitters
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("No duration policy entry for effect {0}")]
    InvalidEffect(Effect),

    #[error("Segment id must not be empty")]
    InvalidSegment,

    #[error("Queue full ({depth} jobs queued)")]
    QueueFull { depth: usize },

    #[error("Scheduler has been shut down")]
    ShutDown,
}

//! Scheduler configuration

use serde::{Deserialize, Serialize};

/// Whether declared priority affects queue position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PriorityOrdering {
    /// Strict arrival order; priority is recorded but ignored
    #[default]
    Arrival,

    /// High-priority jobs queue behind earlier high jobs but ahead of
    /// everything else; normal and low stay in arrival order
    HighFirst,
}

impl std::fmt::Display for PriorityOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arrival => write!(f, "arrival"),
            Self::HighFirst => write!(f, "high-first"),
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Reject submissions once this many nodes are queued (unbounded if unset)
    #[serde(rename = "max-queue-depth")]
    pub max_queue_depth: Option<usize>,

    /// How declared priority is treated when queuing
    #[serde(rename = "priority-ordering")]
    pub priority_ordering: PriorityOrdering,
}

impl SchedulerConfig {
    /// Validate configuration before use
    pub fn validate(&self) -> eyre::Result<()> {
        if self.max_queue_depth == Some(0) {
            return Err(eyre::eyre!(
                "scheduler.max-queue-depth must be at least 1 (omit it for an unbounded queue)"
            ));
        }
        Ok(())
    }
}

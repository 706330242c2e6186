//! RenderQueue - single-worker render job scheduler
//!
//! Submitters post per-segment effect jobs; one background worker drains
//! them in arrival order. Resubmitting a segment that still has a pending
//! job cancels the stale job in place, and the worker skips it when it
//! reaches it in the queue.
//!
//! # Modules
//!
//! - [`domain`] - Job records, effects, priorities
//! - [`fifo`] - Arena-backed FIFO queue
//! - [`policy`] - Effect duration policy
//! - [`scheduler`] - The render scheduler and its statistics
//! - [`config`] - Configuration types and loading
//! - [`report`] - Text rendering of history and stats
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod fifo;
pub mod policy;
pub mod report;
pub mod scheduler;

// Re-export commonly used types
pub use config::Config;
pub use domain::{Effect, JobError, JobId, JobRecord, JobStatus, Priority};
pub use fifo::{FifoQueue, NodeId};
pub use policy::{DurationPolicy, EffectDurations};
pub use scheduler::{PriorityOrdering, RenderScheduler, SchedulerConfig, SchedulerError, SchedulerStats};

//! Domain types for render jobs
//!
//! - Priority: declared urgency attached to a submission
//! - Effect: closed set of renderable effects
//! - JobRecord: one unit of render work and its lifecycle

mod effect;
mod job;
mod priority;

pub use effect::Effect;
pub use job::{JobError, JobId, JobRecord, JobStatus};
pub use priority::Priority;

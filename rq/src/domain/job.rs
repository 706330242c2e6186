//! Render job record and its state machine
//!
//! A job only ever moves forward: `pending -> processing -> done`, or
//! `pending -> cancelled`. `duration_ms` is present exactly when the job is
//! `done`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::{Effect, Priority};

/// Errors from job state transitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobError {
    #[error("Job {id}: invalid transition {from} -> {to}")]
    InvalidTransition { id: JobId, from: JobStatus, to: JobStatus },
}

/// Unique job identifier
///
/// Format: `job-{uuid-v7}`. The v7 UUID is time ordered, so ids sort in
/// creation order within a process.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(String);

impl JobId {
    /// Generate a fresh id
    pub fn generate() -> Self {
        Self(format!("job-{}", uuid::Uuid::now_v7()))
    }

    /// Get the full ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for JobId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// Lifecycle state of a render job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Done,
    Cancelled,
}

impl JobStatus {
    /// `done` and `cancelled` are never left
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Done => write!(f, "done"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One unit of deferred render work for a segment
///
/// Serialize only: status and timings are set through the transition
/// methods, never read back from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRecord {
    pub id: JobId,

    /// Timeline segment this job renders; several jobs may share one
    pub segment_id: String,

    pub effect: Effect,

    pub priority: Priority,

    pub created_at: DateTime<Utc>,

    status: JobStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    started_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    duration_ms: Option<u64>,
}

impl JobRecord {
    /// Create a new pending job
    pub fn new(segment_id: impl Into<String>, effect: Effect, priority: Priority) -> Self {
        let segment_id = segment_id.into();
        let id = JobId::generate();
        debug!(%id, %segment_id, %effect, %priority, "JobRecord::new: called");
        Self {
            id,
            segment_id,
            effect,
            priority,
            created_at: Utc::now(),
            status: JobStatus::Pending,
            started_at: None,
            completed_at: None,
            duration_ms: None,
        }
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Measured processing time, set only once the job is done
    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_pending(&self) -> bool {
        self.status == JobStatus::Pending
    }

    /// pending -> processing
    pub fn start(&mut self) -> Result<(), JobError> {
        debug!(id = %self.id, status = %self.status, "JobRecord::start: called");
        self.transition(JobStatus::Pending, JobStatus::Processing)?;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// processing -> done, recording how long the render took
    pub fn complete(&mut self, elapsed: Duration) -> Result<(), JobError> {
        debug!(id = %self.id, status = %self.status, ?elapsed, "JobRecord::complete: called");
        self.transition(JobStatus::Processing, JobStatus::Done)?;
        self.completed_at = Some(Utc::now());
        self.duration_ms = Some(elapsed.as_millis() as u64);
        Ok(())
    }

    /// pending -> cancelled
    ///
    /// Returns false and leaves the job untouched if it is not pending; an
    /// active or finished render is never cancelled.
    pub fn cancel(&mut self) -> bool {
        debug!(id = %self.id, status = %self.status, "JobRecord::cancel: called");
        if self.status != JobStatus::Pending {
            debug!(id = %self.id, "JobRecord::cancel: not pending, ignoring");
            return false;
        }
        self.status = JobStatus::Cancelled;
        true
    }

    fn transition(&mut self, from: JobStatus, to: JobStatus) -> Result<(), JobError> {
        if self.status != from {
            return Err(JobError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> JobRecord {
        JobRecord::new("seg_001", Effect::Blur, Priority::Normal)
    }

    #[test]
    fn test_new_job_is_pending() {
        let job = job();
        assert_eq!(job.status(), JobStatus::Pending);
        assert!(job.duration_ms().is_none());
        assert!(job.started_at().is_none());
        assert!(job.id.as_str().starts_with("job-"));
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(job().id, job().id);
    }

    #[test]
    fn test_full_lifecycle() {
        let mut job = job();
        job.start().unwrap();
        assert_eq!(job.status(), JobStatus::Processing);
        assert!(job.duration_ms().is_none());

        job.complete(Duration::from_millis(1500)).unwrap();
        assert_eq!(job.status(), JobStatus::Done);
        assert_eq!(job.duration_ms(), Some(1500));
        assert!(job.completed_at().is_some());
    }

    #[test]
    fn test_cancel_pending() {
        let mut job = job();
        assert!(job.cancel());
        assert_eq!(job.status(), JobStatus::Cancelled);
        assert!(job.duration_ms().is_none());

        // Second cancel is a no-op
        assert!(!job.cancel());
    }

    #[test]
    fn test_cancelled_job_cannot_start() {
        let mut job = job();
        job.cancel();
        let err = job.start().unwrap_err();
        assert!(matches!(
            err,
            JobError::InvalidTransition {
                from: JobStatus::Cancelled,
                to: JobStatus::Processing,
                ..
            }
        ));
        assert_eq!(job.status(), JobStatus::Cancelled);
    }

    #[test]
    fn test_processing_job_is_not_cancelled() {
        let mut job = job();
        job.start().unwrap();
        assert!(!job.cancel());
        assert_eq!(job.status(), JobStatus::Processing);
    }

    #[test]
    fn test_done_is_never_revisited() {
        let mut job = job();
        job.start().unwrap();
        job.complete(Duration::from_millis(10)).unwrap();

        assert!(job.start().is_err());
        assert!(job.complete(Duration::from_millis(20)).is_err());
        assert!(!job.cancel());
        assert_eq!(job.duration_ms(), Some(10));
    }

    #[test]
    fn test_complete_requires_processing() {
        let mut job = job();
        assert!(job.complete(Duration::from_millis(10)).is_err());
        assert!(job.duration_ms().is_none());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Done.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_serde_omits_unset_fields() {
        let json = serde_json::to_value(job()).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["effect"], "blur");
        assert!(json.get("duration_ms").is_none());
    }

    #[test]
    fn test_serde_done_job_carries_duration() {
        let mut job = job();
        job.start().unwrap();
        job.complete(Duration::from_millis(750)).unwrap();

        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["status"], "done");
        assert_eq!(json["duration_ms"], 750);
        assert_eq!(json["id"], job.id.as_str());
        assert!(json.get("started_at").is_some());
    }
}

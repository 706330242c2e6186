//! Scheduler implementation

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{Mutex, Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::{Effect, JobId, JobRecord, JobStatus, Priority};
use crate::fifo::{FifoQueue, NodeId};
use crate::policy::DurationPolicy;

use super::config::{PriorityOrdering, SchedulerConfig};
use super::error::SchedulerError;
use super::stats::SchedulerStats;

/// Internal state protected by mutex
///
/// The queue holds indices into `history`. Cancelling a job flips its status
/// in `history` only; the worker skips cancelled entries when it reaches them.
struct SchedulerInner {
    queue: FifoQueue<usize>,

    /// Every job ever accepted, in creation order
    history: Vec<JobRecord>,

    /// Last queued high-priority node (high-first ordering only)
    high_tail: Option<(NodeId, usize)>,

    worker_idle: bool,
    shutdown: bool,
}

/// A job the worker has moved to processing
struct ActiveJob {
    index: usize,
    id: JobId,
    duration: Duration,
}

impl SchedulerInner {
    fn new() -> Self {
        Self {
            queue: FifoQueue::new(),
            history: Vec::new(),
            high_tail: None,
            worker_idle: true,
            shutdown: false,
        }
    }

    /// Flip every pending job for `segment_id` to cancelled
    fn cancel_pending(&mut self, segment_id: &str) -> Vec<JobId> {
        self.history
            .iter_mut()
            .filter(|job| job.segment_id == segment_id && job.is_pending())
            .filter_map(|job| job.cancel().then(|| job.id.clone()))
            .collect()
    }

    fn enqueue(&mut self, index: usize, priority: Priority, ordering: PriorityOrdering) {
        if ordering == PriorityOrdering::Arrival || priority != Priority::High {
            self.queue.enqueue(index);
            return;
        }

        let node = match self.high_tail {
            Some((after, _)) => match self.queue.insert_after(after, index) {
                Ok(node) => node,
                Err(index) => self.queue.push_front(index),
            },
            None => self.queue.push_front(index),
        };
        self.high_tail = Some((node, index));
    }

    /// Pop until a runnable job is found and move it to processing
    fn next_job(&mut self, policy: &dyn DurationPolicy) -> Option<ActiveJob> {
        while let Some(index) = self.queue.dequeue() {
            if self.high_tail.is_some_and(|(_, high)| high == index) {
                self.high_tail = None;
            }

            let job = &mut self.history[index];
            if job.status() == JobStatus::Cancelled {
                debug!(id = %job.id, segment_id = %job.segment_id, "next_job: skipping cancelled job");
                continue;
            }

            let duration = match policy.duration_for(job.effect) {
                Some(duration) => duration,
                None => {
                    warn!(id = %job.id, effect = %job.effect, "No duration policy entry, rendering instantly");
                    Duration::ZERO
                }
            };

            if let Err(e) = job.start() {
                warn!(error = %e, "next_job: job not startable, skipping");
                continue;
            }

            return Some(ActiveJob {
                index,
                id: job.id.clone(),
                duration,
            });
        }
        None
    }

    fn stats(&self) -> SchedulerStats {
        SchedulerStats::from_history(&self.history, self.queue.len())
    }
}

struct Shared {
    config: SchedulerConfig,
    policy: Arc<dyn DurationPolicy>,
    inner: Mutex<SchedulerInner>,

    /// Wakes the parked worker
    wake: Arc<Notify>,

    /// Published worker idle state
    idle_tx: watch::Sender<bool>,
}

impl Shared {
    /// Take the next runnable job, or mark the worker idle
    async fn claim_next(&self) -> Option<ActiveJob> {
        let mut inner = self.inner.lock().await;
        if inner.shutdown {
            debug!("claim_next: shutdown requested");
            self.mark_idle(&mut inner);
            return None;
        }

        let next = inner.next_job(self.policy.as_ref());
        if next.is_none() {
            debug!("claim_next: queue drained, worker idle");
            self.mark_idle(&mut inner);
        }
        next
    }

    fn mark_idle(&self, inner: &mut SchedulerInner) {
        inner.worker_idle = true;
        self.idle_tx.send_replace(true);
    }

    async fn render(&self, job: ActiveJob) {
        debug!(id = %job.id, duration = ?job.duration, "render: called");
        let started = Instant::now();
        tokio::time::sleep(job.duration).await;
        let elapsed = started.elapsed();

        let mut inner = self.inner.lock().await;
        match inner.history[job.index].complete(elapsed) {
            Ok(()) => info!(id = %job.id, elapsed_ms = elapsed.as_millis() as u64, "Render done"),
            Err(e) => warn!(error = %e, "render: completion rejected"),
        }
    }
}

/// Single worker loop; parks on `wake` whenever the queue is empty
///
/// Holds only a weak reference while parked, so dropping every
/// [`RenderScheduler`] handle frees the scheduler and ends the loop.
async fn worker_loop(weak: Weak<Shared>, wake: Arc<Notify>) {
    info!("Render worker started");
    loop {
        let Some(shared) = weak.upgrade() else {
            debug!("worker_loop: scheduler dropped");
            break;
        };
        match shared.claim_next().await {
            Some(job) => shared.render(job).await,
            None => {
                if shared.inner.lock().await.shutdown {
                    break;
                }
                drop(shared);
                wake.notified().await;
            }
        }
    }
    info!("Render worker stopped");
}

/// Wakes the worker when the last scheduler handle is dropped
struct WorkerGuard {
    wake: Arc<Notify>,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        debug!("WorkerGuard::drop: last handle gone, waking worker");
        self.wake.notify_one();
    }
}

/// Render job scheduler
///
/// Cloning yields another handle to the same scheduler. Submissions and the
/// worker's dequeue are serialized through one mutex, so a segment never
/// has two pending jobs and the job being rendered is never touched by a
/// submission.
#[derive(Clone)]
pub struct RenderScheduler {
    shared: Arc<Shared>,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
    // Declared after `shared` so the strong count is gone before the wake
    _guard: Arc<WorkerGuard>,
}

impl RenderScheduler {
    /// Create a scheduler and spawn its worker on the current runtime
    pub fn spawn(config: SchedulerConfig, policy: Arc<dyn DurationPolicy>) -> Self {
        debug!(?config, "RenderScheduler::spawn: called");
        let (idle_tx, _) = watch::channel(true);
        let wake = Arc::new(Notify::new());
        let shared = Arc::new(Shared {
            config,
            policy,
            inner: Mutex::new(SchedulerInner::new()),
            wake: Arc::clone(&wake),
            idle_tx,
        });

        let handle = tokio::spawn(worker_loop(Arc::downgrade(&shared), Arc::clone(&wake)));

        Self {
            shared,
            worker: Arc::new(Mutex::new(Some(handle))),
            _guard: Arc::new(WorkerGuard { wake }),
        }
    }

    /// Queue a render job for `segment_id`
    ///
    /// Any job still pending for the segment is cancelled first. Returns the
    /// new pending job without waiting for it to run.
    pub async fn submit(
        &self,
        segment_id: impl Into<String>,
        effect: Effect,
        priority: Priority,
    ) -> Result<JobRecord, SchedulerError> {
        let segment_id = segment_id.into();
        debug!(%segment_id, %effect, %priority, "RenderScheduler::submit: called");

        if segment_id.trim().is_empty() {
            return Err(SchedulerError::InvalidSegment);
        }
        if self.shared.policy.duration_for(effect).is_none() {
            warn!(%effect, "Rejecting submission for effect without duration");
            return Err(SchedulerError::InvalidEffect(effect));
        }

        let mut inner = self.shared.inner.lock().await;

        if inner.shutdown {
            return Err(SchedulerError::ShutDown);
        }
        if let Some(max) = self.shared.config.max_queue_depth.filter(|max| inner.queue.len() >= *max) {
            warn!(%segment_id, depth = max, "Queue full, rejecting submission");
            return Err(SchedulerError::QueueFull { depth: max });
        }

        let superseded = inner.cancel_pending(&segment_id);
        if !superseded.is_empty() {
            info!(%segment_id, ?superseded, "Superseded pending jobs");
        }

        let job = JobRecord::new(segment_id, effect, priority);
        let index = inner.history.len();
        inner.history.push(job.clone());
        inner.enqueue(index, priority, self.shared.config.priority_ordering);

        if inner.worker_idle {
            debug!("RenderScheduler::submit: waking idle worker");
            inner.worker_idle = false;
            self.shared.idle_tx.send_replace(false);
            self.shared.wake.notify_one();
        }

        debug!(id = %job.id, queue_depth = inner.queue.len(), "Queued");
        Ok(job)
    }

    /// Cancel whatever is still pending for `segment_id`
    ///
    /// Returns the ids that were cancelled; empty when nothing was pending.
    /// A job already processing is left alone.
    pub async fn cancel_pending_for_segment(&self, segment_id: &str) -> Vec<JobId> {
        debug!(%segment_id, "RenderScheduler::cancel_pending_for_segment: called");
        let cancelled = self.shared.inner.lock().await.cancel_pending(segment_id);
        if !cancelled.is_empty() {
            info!(%segment_id, ?cancelled, "Cancelled pending jobs");
        }
        cancelled
    }

    /// Counts by status plus mean render time
    pub async fn stats(&self) -> SchedulerStats {
        debug!("RenderScheduler::stats: called");
        self.shared.inner.lock().await.stats()
    }

    /// Snapshot of every job in creation order
    pub async fn history(&self) -> Vec<JobRecord> {
        debug!("RenderScheduler::history: called");
        self.shared.inner.lock().await.history.clone()
    }

    /// Snapshot of a single job
    pub async fn job(&self, id: &JobId) -> Option<JobRecord> {
        debug!(%id, "RenderScheduler::job: called");
        let inner = self.shared.inner.lock().await;
        inner.history.iter().find(|job| &job.id == id).cloned()
    }

    pub fn is_idle(&self) -> bool {
        *self.shared.idle_tx.borrow()
    }

    /// Resolve once the worker has drained the queue
    pub async fn wait_idle(&self) {
        debug!("RenderScheduler::wait_idle: called");
        let mut rx = self.shared.idle_tx.subscribe();
        // The sender lives in `shared`, so this cannot observe a closed channel
        let _ = rx.wait_for(|idle| *idle).await;
    }

    /// Stop accepting work and stop the worker
    ///
    /// The job being rendered finishes first; jobs still queued stay pending.
    /// Every caller waits for that, not only the one that joins the worker.
    pub async fn shutdown(&self) {
        debug!("RenderScheduler::shutdown: called");
        self.shared.inner.lock().await.shutdown = true;
        self.shared.wake.notify_one();

        let handle = self.worker.lock().await.take();
        match handle {
            Some(handle) => {
                if let Err(e) = handle.await {
                    warn!(error = %e, "Render worker task failed");
                }
                info!("Scheduler shut down");
            }
            None => {
                debug!("RenderScheduler::shutdown: worker already joined elsewhere, waiting for idle");
                self.wait_idle().await;
            }
        }
    }
}

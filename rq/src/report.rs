//! Plain-text rendering of job history and statistics

use colored::Colorize;

use crate::domain::{JobRecord, JobStatus};
use crate::scheduler::SchedulerStats;

fn status_label(status: JobStatus) -> colored::ColoredString {
    let label = status.to_string();
    match status {
        JobStatus::Pending => label.yellow(),
        JobStatus::Processing => label.cyan(),
        JobStatus::Done => label.green(),
        JobStatus::Cancelled => label.red(),
    }
}

/// One line per job, in creation order
pub fn render_history(history: &[JobRecord]) -> String {
    history
        .iter()
        .enumerate()
        .map(|(n, job)| {
            let duration = job
                .duration_ms()
                .map(|ms| format!("{}ms", ms))
                .unwrap_or_else(|| "-".to_string());
            format!(
                "{:>3}. {:<12} {:<13} {:<7} {:<11} {:>8}  {}\n",
                n + 1,
                job.segment_id,
                job.effect.to_string(),
                job.priority.to_string(),
                status_label(job.status()),
                duration,
                job.id.as_str().dimmed(),
            )
        })
        .collect()
}

pub fn render_stats(stats: &SchedulerStats) -> String {
    format!(
        "Render Queue Stats\n\
         ------------------\n\
         Total jobs: {}\n  \
         Pending:    {}\n  \
         Processing: {}\n  \
         Done:       {}\n  \
         Cancelled:  {}\n\
         \n\
         Average render time: {}ms\n\
         Queue depth: {}\n",
        stats.total(),
        stats.pending,
        stats.processing,
        stats.done,
        stats.cancelled,
        stats.avg_duration_ms,
        stats.queue_depth,
    )
}

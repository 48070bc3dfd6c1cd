use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::provider::GenerationProvider;
use crate::types::{JobSnapshot, JobStatus};

/// Cosmetic progress phrases, cycled one per poll tick. They do not track
/// real provider progress.
pub const PROGRESS_PHRASES: [&str; 5] = [
    "Crafting cinematic motion...",
    "Refining fabric textures...",
    "Adjusting lighting and shadows...",
    "Finalizing render frames...",
    "Polishing the visual masterpiece...",
];

/// Phrase shown for the given zero-based tick.
pub fn progress_message(tick: u64) -> &'static str {
    PROGRESS_PHRASES[(tick % PROGRESS_PHRASES.len() as u64) as usize]
}

/// Re-queries a job at a fixed interval until it is done or cancelled.
#[derive(Debug, Clone)]
pub struct JobPoller {
    interval: Duration,
}

impl Default for JobPoller {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl JobPoller {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Drive `handle` to a terminal status.
    ///
    /// Every non-terminal iteration emits one `Running` tick, waits for the
    /// interval, then issues one query. Queries never overlap. A provider
    /// fault ends the loop with `Faulted`; cancellation ends it with
    /// `Cancelled` and nothing further is emitted or queried.
    pub async fn poll_until_done<P, F>(
        &self,
        provider: &P,
        handle: JobSnapshot,
        cancel: &CancellationToken,
        mut on_tick: F,
    ) -> JobStatus
    where
        P: GenerationProvider,
        F: FnMut(&JobStatus),
    {
        let mut snapshot = handle;
        let mut tick: u64 = 0;

        loop {
            if cancel.is_cancelled() {
                return JobStatus::Cancelled;
            }
            if snapshot.done {
                return snapshot.terminal_status();
            }

            on_tick(&JobStatus::Running {
                progress_message: progress_message(tick).to_string(),
            });
            tracing::debug!(job = %snapshot.name, tick, "Job still running");
            tick += 1;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(job = %snapshot.name, "Polling cancelled during wait");
                    return JobStatus::Cancelled;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }

            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(job = %snapshot.name, "Polling cancelled during status query");
                    return JobStatus::Cancelled;
                }
                result = provider.poll(&snapshot) => result,
            };

            snapshot = match next {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(job = %snapshot.name, error = %e, "Status query failed");
                    return JobStatus::Faulted {
                        reason: e.to_string(),
                    };
                }
            };
        }
    }
}

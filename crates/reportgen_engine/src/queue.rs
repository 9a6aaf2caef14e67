use std::collections::VecDeque;
use std::time::Duration;

use reportgen_logging::{report_info, report_warn};

use crate::{EngineEvent, FileIndex, ReportApi, UploadFile};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Decides how long the queue waits before starting the next upload.
pub trait PacingPolicy: Send + Sync {
    /// Called after `completed` of `total` jobs finished; `succeeded` is the
    /// outcome of the job that just finished.
    fn pause_after(&self, completed: usize, total: usize, succeeded: bool) -> Option<Duration>;
}

/// Same pause after every successful upload that has more work behind it.
/// Failures move straight on to the next file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelayPacing {
    delay: Duration,
}

impl FixedDelayPacing {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelayPacing {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl PacingPolicy for FixedDelayPacing {
    fn pause_after(&self, completed: usize, total: usize, succeeded: bool) -> Option<Duration> {
        (succeeded && completed < total && !self.delay.is_zero()).then_some(self.delay)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUpload {
    pub index: FileIndex,
    pub file: UploadFile,
}

/// FIFO of pending uploads with completion bookkeeping.
#[derive(Debug, Default)]
pub struct UploadQueue {
    pending: VecDeque<QueuedUpload>,
    total: usize,
    completed: usize,
}

impl UploadQueue {
    pub fn new(jobs: Vec<QueuedUpload>) -> Self {
        Self {
            total: jobs.len(),
            pending: jobs.into(),
            completed: 0,
        }
    }

    pub fn next_job(&mut self) -> Option<QueuedUpload> {
        self.pending.pop_front()
    }

    pub fn mark_completed(&mut self) {
        self.completed += 1;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
}

/// Uploads every job one after the other. A failed job is reported and skipped;
/// it never stops the batch.
pub async fn run_batch(
    api: &dyn ReportApi,
    mut queue: UploadQueue,
    pacing: &dyn PacingPolicy,
    sink: &dyn ProgressSink,
) -> BatchReport {
    let mut report = BatchReport::default();
    report_info!("Starting batch of {} file(s)", queue.total());

    while let Some(QueuedUpload { index, file }) = queue.next_job() {
        sink.emit(EngineEvent::UploadStarted { index });
        let succeeded = match api.generate(&file).await {
            Ok(document) => {
                report_info!(
                    "Generated {} from {} ({} bytes)",
                    document.filename,
                    file.name,
                    document.size()
                );
                report.succeeded += 1;
                sink.emit(EngineEvent::UploadSucceeded {
                    index,
                    original_name: file.name,
                    document,
                });
                true
            }
            Err(error) => {
                report_warn!("Error processing {}: {}", file.name, error);
                report.failed += 1;
                sink.emit(EngineEvent::UploadFailed { index, error });
                false
            }
        };
        queue.mark_completed();

        if let Some(pause) = pacing.pause_after(queue.completed(), queue.total(), succeeded) {
            tokio::time::sleep(pause).await;
        }
    }

    sink.emit(EngineEvent::BatchFinished {
        succeeded: report.succeeded,
        failed: report.failed,
    });
    report
}

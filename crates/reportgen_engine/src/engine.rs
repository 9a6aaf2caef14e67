use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::thread;

use reportgen_logging::{report_debug, report_error, report_info};

use crate::health::check_health;
use crate::queue::{run_batch, PacingPolicy, ProgressSink, QueuedUpload, UploadQueue};
use crate::{ApiError, EngineEvent, FailureKind, FileIndex, HealthProbe, ReportApi, UploadFile};

enum EngineCommand {
    CheckHealth { probe: HealthProbe },
    RunBatch { jobs: Vec<QueuedUpload> },
    Validate { index: FileIndex, file: UploadFile },
}

/// Handle to the background worker. Commands run one at a time, in the order
/// they were sent, so no two requests are ever in flight together.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn spawn(
        api: Arc<dyn ReportApi>,
        pacing: Arc<dyn PacingPolicy>,
        sink: Box<dyn ProgressSink>,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::Builder::new()
            .name("reportgen-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let pending = PendingReply::of(&command);
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                        runtime.block_on(handle_command(
                            api.as_ref(),
                            pacing.as_ref(),
                            sink.as_ref(),
                            command,
                        ))
                    }));
                    if let Err(payload) = outcome {
                        let reason = panic_message(payload.as_ref());
                        report_error!("Engine command panicked: {}", reason);
                        sink.emit(pending.interrupted(reason));
                    }
                }
                report_info!("Engine worker stopped");
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn check_health(&self, probe: HealthProbe) -> Result<(), ApiError> {
        self.send(EngineCommand::CheckHealth { probe })
    }

    pub fn run_batch(&self, jobs: Vec<QueuedUpload>) -> Result<(), ApiError> {
        self.send(EngineCommand::RunBatch { jobs })
    }

    pub fn validate(&self, index: FileIndex, file: UploadFile) -> Result<(), ApiError> {
        self.send(EngineCommand::Validate { index, file })
    }

    fn send(&self, command: EngineCommand) -> Result<(), ApiError> {
        self.cmd_tx
            .send(command)
            .map_err(|_| ApiError::new(FailureKind::EngineUnavailable, "engine worker stopped"))
    }
}

/// What a command owes its caller when it cannot run to completion.
#[derive(Clone, Copy)]
enum PendingReply {
    Health(HealthProbe),
    Batch,
    Validation(FileIndex),
}

impl PendingReply {
    fn of(command: &EngineCommand) -> Self {
        match command {
            EngineCommand::CheckHealth { probe } => PendingReply::Health(*probe),
            EngineCommand::RunBatch { .. } => PendingReply::Batch,
            EngineCommand::Validate { index, .. } => PendingReply::Validation(*index),
        }
    }

    fn interrupted(self, reason: String) -> EngineEvent {
        match self {
            PendingReply::Health(probe) => EngineEvent::HealthChecked {
                probe,
                healthy: false,
            },
            PendingReply::Batch => EngineEvent::BatchAborted { message: reason },
            PendingReply::Validation(index) => EngineEvent::ValidationCompleted {
                index,
                result: Err(ApiError::new(FailureKind::EngineUnavailable, reason)),
            },
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("engine worker failed: {detail}")
}

async fn handle_command(
    api: &dyn ReportApi,
    pacing: &dyn PacingPolicy,
    sink: &dyn ProgressSink,
    command: EngineCommand,
) {
    match command {
        EngineCommand::CheckHealth { probe } => {
            let healthy = check_health(api).await;
            sink.emit(EngineEvent::HealthChecked { probe, healthy });
        }
        EngineCommand::RunBatch { jobs } => {
            let report = run_batch(api, UploadQueue::new(jobs), pacing, sink).await;
            report_debug!(
                "Batch finished: {} ok, {} failed",
                report.succeeded,
                report.failed
            );
        }
        EngineCommand::Validate { index, file } => {
            let result = api.validate(&file).await;
            sink.emit(EngineEvent::ValidationCompleted { index, result });
        }
    }
}

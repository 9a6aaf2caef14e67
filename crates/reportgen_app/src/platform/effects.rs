use std::path::PathBuf;
use std::sync::mpsc;

use reportgen_core::{Effect, GeneratedArtifact, HealthPurpose, Msg, Severity, ValidationSummary};
use reportgen_engine::{
    sanitize_filename, AtomicFileWriter, EngineEvent, EngineHandle, HealthProbe, ProgressSink,
    QueuedUpload, UploadFile, ValidationReport,
};
use reportgen_logging::{report_error, report_info, report_warn};

use super::app::AppEvent;
use super::ui::render::UiCommand;

/// Executes core effects: network work goes to the engine, saves and
/// notifications come back as UI commands.
pub struct EffectRunner {
    engine: EngineHandle,
    writer: AtomicFileWriter,
    msg_tx: mpsc::Sender<AppEvent>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, output_dir: PathBuf, msg_tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            engine,
            writer: AtomicFileWriter::new(output_dir),
            msg_tx,
        }
    }

    pub fn run(&self, effects: Vec<Effect>) -> Vec<UiCommand> {
        let mut commands = Vec::new();
        for effect in effects {
            match effect {
                Effect::CheckHealth { purpose } => {
                    if let Err(err) = self.engine.check_health(map_purpose(purpose)) {
                        report_error!("Health check not dispatched: {}", err);
                        self.feed_back(Msg::HealthChecked {
                            purpose,
                            healthy: false,
                        });
                    }
                }
                Effect::StartBatch { jobs } => {
                    report_info!("StartBatch files={}", jobs.len());
                    let jobs = jobs
                        .into_iter()
                        .map(|job| QueuedUpload {
                            index: job.index,
                            file: UploadFile::new(job.name, job.content),
                        })
                        .collect();
                    if let Err(err) = self.engine.run_batch(jobs) {
                        report_error!("Batch not dispatched: {}", err);
                        self.feed_back(Msg::BatchAborted {
                            message: err.message,
                        });
                    }
                }
                Effect::ValidateFile {
                    index,
                    name,
                    content,
                } => {
                    if let Err(err) = self.engine.validate(index, UploadFile::new(name, content)) {
                        self.feed_back(Msg::ValidationCompleted {
                            index,
                            result: Err(err.message),
                        });
                    }
                }
                Effect::SaveArtifact { filename, content } => {
                    commands.push(self.save(&filename, &content));
                }
                Effect::Notify { severity, message } => {
                    commands.push(UiCommand::Notify { severity, message });
                }
            }
        }
        commands
    }

    fn save(&self, filename: &str, content: &[u8]) -> UiCommand {
        let safe_name = sanitize_filename(filename);
        match self.writer.write(&safe_name, content) {
            Ok(path) => {
                report_info!("Saved {} ({} bytes)", path.display(), content.len());
                UiCommand::ArtifactSaved { path }
            }
            Err(err) => {
                report_error!(
                    "Failed to save {} into {:?}: {}",
                    safe_name,
                    self.writer.dir(),
                    err
                );
                UiCommand::Notify {
                    severity: Severity::Error,
                    message: format!("Could not save {safe_name}: {err}"),
                }
            }
        }
    }

    fn feed_back(&self, msg: Msg) {
        if self.msg_tx.send(AppEvent::Msg(msg)).is_err() {
            report_warn!("Controller channel closed");
        }
    }
}

/// Turns engine events into core messages on the controller channel.
pub struct EventBridge {
    msg_tx: mpsc::Sender<AppEvent>,
}

impl EventBridge {
    pub fn new(msg_tx: mpsc::Sender<AppEvent>) -> Self {
        Self { msg_tx }
    }
}

impl ProgressSink for EventBridge {
    fn emit(&self, event: EngineEvent) {
        let _ = self.msg_tx.send(AppEvent::Msg(map_event(event)));
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::HealthChecked { probe, healthy } => Msg::HealthChecked {
            purpose: map_probe(probe),
            healthy,
        },
        EngineEvent::UploadStarted { index } => Msg::UploadStarted { index },
        EngineEvent::UploadSucceeded {
            index,
            original_name,
            document,
        } => Msg::UploadSucceeded {
            index,
            artifact: GeneratedArtifact {
                size: document.size(),
                filename: document.filename,
                content: document.content,
                original_name,
            },
        },
        EngineEvent::UploadFailed { index, error } => Msg::UploadFailed {
            index,
            message: error.message,
        },
        EngineEvent::BatchFinished { .. } => Msg::BatchFinished,
        EngineEvent::BatchAborted { message } => Msg::BatchAborted { message },
        EngineEvent::ValidationCompleted { index, result } => Msg::ValidationCompleted {
            index,
            result: result.map(map_validation).map_err(|err| err.message),
        },
    }
}

fn map_validation(report: ValidationReport) -> ValidationSummary {
    ValidationSummary {
        valid: report.valid,
        responses: report.responses,
        columns: report.columns,
        column_names: report.column_names,
        detected_unit_name: report.detected_unit_name,
    }
}

fn map_purpose(purpose: HealthPurpose) -> HealthProbe {
    match purpose {
        HealthPurpose::Informational => HealthProbe::Informational,
        HealthPurpose::Submission => HealthProbe::Preflight,
    }
}

fn map_probe(probe: HealthProbe) -> HealthPurpose {
    match probe {
        HealthProbe::Informational => HealthPurpose::Informational,
        HealthProbe::Preflight => HealthPurpose::Submission,
    }
}

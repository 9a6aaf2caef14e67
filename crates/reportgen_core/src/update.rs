use crate::{
    AppState, BackendStatus, Effect, FileStatus, HealthPurpose, Msg, Phase, Severity, UploadJob,
    ValidationSummary,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::AppStarted | Msg::HealthRequested => vec![Effect::CheckHealth {
            purpose: HealthPurpose::Informational,
        }],
        Msg::FilesSelected(files) => {
            // Indices are frozen while a batch references them.
            if state.is_idle() {
                state.replace_selection(files);
            }
            Vec::new()
        }
        Msg::RemoveFileClicked(index) => {
            if state.is_idle() {
                state.remove_selected(index);
            }
            Vec::new()
        }
        Msg::ClearClicked => {
            if state.is_idle() {
                state.clear_all();
            }
            Vec::new()
        }
        Msg::SubmitClicked => {
            if state.selection_len() == 0 {
                vec![notify(
                    Severity::Warning,
                    "Please select at least one Excel file",
                )]
            } else if state.is_idle() {
                state.set_phase(Phase::CheckingHealth);
                vec![Effect::CheckHealth {
                    purpose: HealthPurpose::Submission,
                }]
            } else {
                Vec::new()
            }
        }
        Msg::HealthChecked { purpose, healthy } => {
            state.set_backend(if healthy {
                BackendStatus::Healthy
            } else {
                BackendStatus::Unavailable
            });
            match purpose {
                HealthPurpose::Informational => Vec::new(),
                HealthPurpose::Submission => start_batch(&mut state, healthy),
            }
        }
        Msg::UploadStarted { index } => {
            state.set_file_status(index, FileStatus::Processing);
            Vec::new()
        }
        Msg::UploadSucceeded { index, artifact } => {
            state.push_artifact(artifact);
            state.set_file_status(index, FileStatus::Completed);
            Vec::new()
        }
        Msg::UploadFailed { index, message: _ } => {
            state.record_failure();
            state.set_file_status(index, FileStatus::Error);
            Vec::new()
        }
        Msg::BatchFinished => {
            if state.phase() != Phase::Uploading {
                return (state, Vec::new());
            }
            state.set_phase(Phase::Idle);
            vec![batch_summary(&state)]
        }
        Msg::BatchAborted { message } => {
            for index in 0..state.selection_len() {
                if state.file_status(index) == Some(FileStatus::Processing) {
                    state.set_file_status(index, FileStatus::Error);
                }
            }
            state.set_phase(Phase::Idle);
            vec![notify(Severity::Error, format!("Error: {message}"))]
        }
        Msg::DownloadClicked(index) => match state.artifact(index) {
            Some(artifact) => vec![Effect::SaveArtifact {
                filename: artifact.filename.clone(),
                content: artifact.content.clone(),
            }],
            None => vec![notify(Severity::Warning, "No file to download")],
        },
        Msg::ValidateClicked(index) => match state.selected_file(index) {
            Some(_) if !state.is_idle() => vec![notify(
                Severity::Warning,
                "Validation is unavailable while reports are being generated",
            )],
            Some(file) => vec![Effect::ValidateFile {
                index,
                name: file.name.clone(),
                content: file.content.clone(),
            }],
            None => vec![notify(Severity::Warning, "No file to validate")],
        },
        Msg::ValidationCompleted { index, result } => {
            let name = state
                .selected_file(index)
                .map(|file| file.name.clone())
                .unwrap_or_else(|| format!("file #{}", index + 1));
            vec![validation_notice(&name, result)]
        }
    };

    (state, effects)
}

fn start_batch(state: &mut AppState, healthy: bool) -> Vec<Effect> {
    if state.phase() != Phase::CheckingHealth {
        return Vec::new();
    }
    if !healthy {
        state.set_phase(Phase::Idle);
        return vec![notify(
            Severity::Error,
            "The backend server is not available. Try again.",
        )];
    }
    state.begin_batch();
    let jobs = state
        .selected_files()
        .enumerate()
        .map(|(index, file)| UploadJob {
            index,
            name: file.name.clone(),
            content: file.content.clone(),
        })
        .collect();
    vec![Effect::StartBatch { jobs }]
}

fn batch_summary(state: &AppState) -> Effect {
    let generated = state.artifacts().len();
    let failed = state.failure_count();
    if generated == 0 {
        notify(
            Severity::Error,
            "No report could be generated. Check that the backend is running and the files are valid.",
        )
    } else if failed > 0 {
        notify(
            Severity::Warning,
            format!(
                "Generated {generated} of {total} reports. {failed} file(s) had errors.",
                total = state.selection_len()
            ),
        )
    } else {
        notify(
            Severity::Info,
            format!("{generated} report(s) generated successfully!"),
        )
    }
}

fn validation_notice(name: &str, result: Result<ValidationSummary, String>) -> Effect {
    match result {
        Ok(summary) if summary.valid => {
            let mut message = format!(
                "{name}: {} responses, {} columns",
                summary.responses, summary.columns
            );
            if let Some(unit) = summary.detected_unit_name.filter(|u| !u.is_empty()) {
                message.push_str(&format!(" (unit: {unit})"));
            }
            notify(Severity::Info, message)
        }
        Ok(_) => notify(Severity::Warning, format!("{name}: the backend rejected the file")),
        Err(message) => notify(Severity::Error, format!("{name}: {message}")),
    }
}

fn notify(severity: Severity, message: impl Into<String>) -> Effect {
    Effect::Notify {
        severity,
        message: message.into(),
    }
}

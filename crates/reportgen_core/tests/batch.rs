use pretty_assertions::assert_eq;
use reportgen_core::{
    update, AppState, BackendStatus, Effect, FileStatus, GeneratedArtifact, HealthPurpose, Msg,
    Phase, SelectedFile, Severity, UploadJob, ValidationSummary,
};

fn init_logging() {
    reportgen_logging::initialize_for_tests();
}

fn selected(names: &[&str]) -> AppState {
    let files = names
        .iter()
        .map(|name| SelectedFile::new(*name, name.as_bytes().to_vec()))
        .collect();
    let (state, _) = update(AppState::new(), Msg::FilesSelected(files));
    state
}

fn artifact(original: &str) -> GeneratedArtifact {
    GeneratedArtifact {
        content: format!("doc for {original}").into_bytes().into(),
        filename: format!("informe {original}.docx"),
        original_name: original.to_string(),
        size: 12,
    }
}

/// Submits and answers the pre-flight probe; returns the queued jobs.
fn start(state: AppState) -> (AppState, Vec<UploadJob>) {
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(
        effects,
        vec![Effect::CheckHealth {
            purpose: HealthPurpose::Submission
        }]
    );
    assert_eq!(state.phase(), Phase::CheckingHealth);

    let (state, effects) = update(
        state,
        Msg::HealthChecked {
            purpose: HealthPurpose::Submission,
            healthy: true,
        },
    );
    let jobs = match effects.as_slice() {
        [Effect::StartBatch { jobs }] => jobs.clone(),
        other => panic!("unexpected effects: {other:?}"),
    };
    (state, jobs)
}

fn succeed(state: AppState, index: usize, original: &str) -> AppState {
    let (state, _) = update(state, Msg::UploadStarted { index });
    let (state, _) = update(
        state,
        Msg::UploadSucceeded {
            index,
            artifact: artifact(original),
        },
    );
    state
}

fn fail(state: AppState, index: usize) -> AppState {
    let (state, _) = update(state, Msg::UploadStarted { index });
    let (state, _) = update(
        state,
        Msg::UploadFailed {
            index,
            message: "HTTP error 500".to_string(),
        },
    );
    state
}

#[test]
fn healthy_submission_queues_every_file_in_order() {
    init_logging();
    let (state, jobs) = start(selected(&["a.xlsx", "b.xlsx", "c.xlsx"]));

    let queued: Vec<_> = jobs.iter().map(|job| (job.index, job.name.as_str())).collect();
    assert_eq!(queued, vec![(0, "a.xlsx"), (1, "b.xlsx"), (2, "c.xlsx")]);
    assert_eq!(jobs[1].content.as_ref(), b"b.xlsx");

    let view = state.view();
    assert_eq!(view.phase, Phase::Uploading);
    assert!(view.busy);
    assert!(!view.submit_enabled);
    assert_eq!(view.backend, BackendStatus::Healthy);
}

#[test]
fn unhealthy_backend_aborts_before_any_upload() {
    init_logging();
    let (state, _) = update(selected(&["a.xlsx"]), Msg::SubmitClicked);
    let (state, effects) = update(
        state,
        Msg::HealthChecked {
            purpose: HealthPurpose::Submission,
            healthy: false,
        },
    );

    assert_eq!(
        effects,
        vec![Effect::Notify {
            severity: Severity::Error,
            message: "The backend server is not available. Try again.".to_string(),
        }]
    );
    let view = state.view();
    assert_eq!(view.phase, Phase::Idle);
    assert!(view.submit_enabled);
    assert_eq!(view.backend, BackendStatus::Unavailable);
}

#[test]
fn informational_probe_never_starts_a_batch() {
    init_logging();
    let (state, effects) = update(selected(&["a.xlsx"]), Msg::AppStarted);
    assert_eq!(
        effects,
        vec![Effect::CheckHealth {
            purpose: HealthPurpose::Informational
        }]
    );

    let (state, effects) = update(
        state,
        Msg::HealthChecked {
            purpose: HealthPurpose::Informational,
            healthy: true,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Idle);
    assert_eq!(state.backend(), BackendStatus::Healthy);
}

#[test]
fn all_successes_produce_artifacts_in_request_order() {
    init_logging();
    let (mut state, jobs) = start(selected(&["a.xlsx", "b.xlsx", "c.xlsx"]));
    for job in &jobs {
        state = succeed(state, job.index, &job.name);
    }
    let (state, effects) = update(state, Msg::BatchFinished);

    let originals: Vec<_> = state
        .artifacts()
        .iter()
        .map(|a| a.original_name.as_str())
        .collect();
    assert_eq!(originals, vec!["a.xlsx", "b.xlsx", "c.xlsx"]);
    assert_eq!(state.failure_count(), 0);
    assert_eq!(
        effects,
        vec![Effect::Notify {
            severity: Severity::Info,
            message: "3 report(s) generated successfully!".to_string(),
        }]
    );

    let view = state.view();
    assert_eq!(view.artifact_count_label, "3 documents");
    assert!(view
        .files
        .iter()
        .all(|row| row.status == FileStatus::Completed && row.meta == "Completed"));
    assert!(view.submit_enabled);
    assert!(!view.busy);
}

#[test]
fn mixed_results_count_failures_and_use_mixed_wording() {
    init_logging();
    let (state, _jobs) = start(selected(&["a.xlsx", "b.xlsx", "c.xlsx", "d.xlsx"]));
    let state = succeed(state, 0, "a.xlsx");
    let state = fail(state, 1);
    let state = succeed(state, 2, "c.xlsx");
    let state = fail(state, 3);
    let (state, effects) = update(state, Msg::BatchFinished);

    assert_eq!(state.failure_count(), 2);
    assert_eq!(state.artifacts().len(), 2);
    assert_eq!(
        effects,
        vec![Effect::Notify {
            severity: Severity::Warning,
            message: "Generated 2 of 4 reports. 2 file(s) had errors.".to_string(),
        }]
    );
    assert_eq!(state.file_status(1), Some(FileStatus::Error));
    assert_eq!(state.view().files[1].meta, "Error");
}

#[test]
fn total_failure_uses_failure_wording() {
    init_logging();
    let (state, _jobs) = start(selected(&["a.xlsx", "b.xlsx"]));
    let state = fail(state, 0);
    let state = fail(state, 1);
    let (state, effects) = update(state, Msg::BatchFinished);

    assert_eq!(
        effects,
        vec![Effect::Notify {
            severity: Severity::Error,
            message: "No report could be generated. Check that the backend is running and the files are valid."
                .to_string(),
        }]
    );
    assert!(state.is_idle());
}

#[test]
fn artifacts_render_incrementally() {
    init_logging();
    let (state, _jobs) = start(selected(&["a.xlsx", "b.xlsx"]));
    let (mut state, _) = update(state, Msg::UploadStarted { index: 0 });
    assert_eq!(state.file_status(0), Some(FileStatus::Processing));
    assert_eq!(state.view().files[0].meta, "Processing...");
    assert!(state.consume_dirty());

    let (mut state, _) = update(
        state,
        Msg::UploadSucceeded {
            index: 0,
            artifact: artifact("a.xlsx"),
        },
    );
    assert!(state.consume_dirty());
    let view = state.view();
    assert_eq!(view.artifacts.len(), 1);
    assert_eq!(view.artifacts[0].filename, "informe a.xlsx.docx");
    assert_eq!(view.artifact_count_label, "1 document");
    assert!(view.busy);
}

#[test]
fn new_submission_clears_previous_artifacts() {
    init_logging();
    let (state, _) = start(selected(&["a.xlsx"]));
    let state = succeed(state, 0, "a.xlsx");
    let (state, _) = update(state, Msg::BatchFinished);
    assert_eq!(state.artifacts().len(), 1);

    let (state, _) = start(state);
    assert!(state.artifacts().is_empty());
    assert_eq!(state.failure_count(), 0);
    assert_eq!(state.file_status(0), Some(FileStatus::Ready));
}

#[test]
fn selection_is_frozen_while_a_batch_runs() {
    init_logging();
    let (state, _) = start(selected(&["a.xlsx", "b.xlsx"]));

    let (state, _) = update(state, Msg::RemoveFileClicked(0));
    let (state, _) = update(state, Msg::ClearClicked);
    let (state, _) = update(
        state,
        Msg::FilesSelected(vec![SelectedFile::new("z.xlsx", Vec::new())]),
    );
    assert_eq!(state.selection_len(), 2);

    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Uploading);
}

#[test]
fn aborted_batch_restores_idle_and_notifies() {
    init_logging();
    let (state, _) = start(selected(&["a.xlsx"]));
    let (state, effects) = update(
        state,
        Msg::BatchAborted {
            message: "engine stopped".to_string(),
        },
    );

    assert!(state.is_idle());
    assert!(state.view().submit_enabled);
    assert_eq!(
        effects,
        vec![Effect::Notify {
            severity: Severity::Error,
            message: "Error: engine stopped".to_string(),
        }]
    );
}

#[test]
fn aborted_batch_marks_the_interrupted_row_as_failed() {
    init_logging();
    let (state, _) = start(selected(&["a.xlsx", "b.xlsx", "c.xlsx"]));
    let state = succeed(state, 0, "a.xlsx");
    let (state, _) = update(state, Msg::UploadStarted { index: 1 });

    let (state, _) = update(
        state,
        Msg::BatchAborted {
            message: "engine worker failed: boom".to_string(),
        },
    );

    assert!(state.is_idle());
    assert_eq!(state.file_status(0), Some(FileStatus::Completed));
    assert_eq!(state.file_status(1), Some(FileStatus::Error));
    assert_eq!(state.file_status(2), Some(FileStatus::Ready));
    assert_eq!(state.artifacts().len(), 1);
}

#[test]
fn download_emits_artifact_content() {
    init_logging();
    let (state, _) = start(selected(&["a.xlsx"]));
    let state = succeed(state, 0, "a.xlsx");
    let (state, _) = update(state, Msg::BatchFinished);

    let (_state, effects) = update(state, Msg::DownloadClicked(0));
    assert_eq!(
        effects,
        vec![Effect::SaveArtifact {
            filename: "informe a.xlsx.docx".to_string(),
            content: b"doc for a.xlsx".to_vec().into(),
        }]
    );
}

#[test]
fn validation_round_trip_reports_summary() {
    init_logging();
    let state = selected(&["ventas.xlsx"]);
    let (state, effects) = update(state, Msg::ValidateClicked(0));
    assert_eq!(
        effects,
        vec![Effect::ValidateFile {
            index: 0,
            name: "ventas.xlsx".to_string(),
            content: b"ventas.xlsx".to_vec().into(),
        }]
    );

    let (_state, effects) = update(
        state,
        Msg::ValidationCompleted {
            index: 0,
            result: Ok(ValidationSummary {
                valid: true,
                responses: 25,
                columns: 8,
                column_names: Vec::new(),
                detected_unit_name: Some("UDS Norte".to_string()),
            }),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::Notify {
            severity: Severity::Info,
            message: "ventas.xlsx: 25 responses, 8 columns (unit: UDS Norte)".to_string(),
        }]
    );
}

#[test]
fn validation_of_missing_file_notifies() {
    init_logging();
    let (_state, effects) = update(AppState::new(), Msg::ValidateClicked(3));
    assert_eq!(
        effects,
        vec![Effect::Notify {
            severity: Severity::Warning,
            message: "No file to validate".to_string(),
        }]
    );
}

use crate::{GeneratedArtifact, HealthPurpose, SelectedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Client finished starting up.
    AppStarted,
    /// User picked a new set of files; replaces the previous selection.
    FilesSelected(Vec<SelectedFile>),
    /// User removed one selected file.
    RemoveFileClicked(usize),
    /// User asked to reset everything.
    ClearClicked,
    /// User submitted the selection for conversion.
    SubmitClicked,
    /// User asked for a health probe.
    HealthRequested,
    /// Engine finished a health probe.
    HealthChecked { purpose: HealthPurpose, healthy: bool },
    /// Engine started uploading a file.
    UploadStarted { index: usize },
    /// Engine received a generated document for a file.
    UploadSucceeded {
        index: usize,
        artifact: GeneratedArtifact,
    },
    /// Engine gave up on a file.
    UploadFailed { index: usize, message: String },
    /// Engine processed every file of the batch.
    BatchFinished,
    /// The batch could not run to completion for a reason outside any file.
    BatchAborted { message: String },
    /// User asked to save a generated document.
    DownloadClicked(usize),
    /// User asked the backend to validate one selected file.
    ValidateClicked(usize),
    /// Engine finished a validation request.
    ValidationCompleted {
        index: usize,
        result: Result<ValidationSummary, String>,
    },
}

/// Backend answer of a validation request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationSummary {
    pub valid: bool,
    pub responses: u64,
    pub columns: u64,
    pub column_names: Vec<String>,
    pub detected_unit_name: Option<String>,
}

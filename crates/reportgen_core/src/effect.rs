use bytes::Bytes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CheckHealth { purpose: HealthPurpose },
    StartBatch { jobs: Vec<UploadJob> },
    ValidateFile { index: usize, name: String, content: Bytes },
    SaveArtifact { filename: String, content: Bytes },
    Notify { severity: Severity, message: String },
}

/// Why a health probe was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthPurpose {
    /// Informational probe: at startup or on request.
    Informational,
    /// Pre-flight gate of a submission.
    Submission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One file of a batch, addressed by its position in the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    pub index: usize,
    pub name: String,
    pub content: Bytes,
}

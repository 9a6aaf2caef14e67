use std::fmt;

use bytes::Bytes;
use serde::Deserialize;

/// Position of a file in the caller's selection.
pub type FileIndex = usize;

/// A spreadsheet ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A document produced by the backend for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub filename: String,
    pub content: Bytes,
    pub content_type: Option<String>,
}

impl GeneratedDocument {
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Body of `POST /validate`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ValidationReport {
    #[serde(default)]
    pub valid: bool,
    #[serde(default, rename = "total_respuestas")]
    pub responses: u64,
    #[serde(default, rename = "total_columnas")]
    pub columns: u64,
    #[serde(default, rename = "columnas")]
    pub column_names: Vec<String>,
    #[serde(default, rename = "nombre_uds_detectado")]
    pub detected_unit_name: Option<String>,
}

/// Which caller asked for a health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthProbe {
    Informational,
    Preflight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    HealthChecked {
        probe: HealthProbe,
        healthy: bool,
    },
    UploadStarted {
        index: FileIndex,
    },
    UploadSucceeded {
        index: FileIndex,
        original_name: String,
        document: GeneratedDocument,
    },
    UploadFailed {
        index: FileIndex,
        error: ApiError,
    },
    BatchFinished {
        succeeded: usize,
        failed: usize,
    },
    /// The batch stopped outside any single file's error handling.
    BatchAborted {
        message: String,
    },
    ValidationCompleted {
        index: FileIndex,
        result: Result<ValidationReport, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    MalformedBody,
    InvalidAttachment,
    EngineUnavailable,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::MalformedBody => write!(f, "malformed response body"),
            FailureKind::InvalidAttachment => write!(f, "invalid attachment"),
            FailureKind::EngineUnavailable => write!(f, "engine unavailable"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

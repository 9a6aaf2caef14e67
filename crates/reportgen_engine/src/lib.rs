//! Reportgen engine: HTTP client for the report backend and effect execution.
mod api;
mod disposition;
mod engine;
mod filename;
mod health;
mod persist;
mod queue;
mod types;

pub use api::{ApiSettings, ImageAttachment, ReportApi, ReportOptions, ReqwestReportApi, EXCEL_FIELD};
pub use disposition::filename_from_disposition;
pub use engine::EngineHandle;
pub use filename::{
    derive_output_filename, is_spreadsheet_name, sanitize_filename, synthesize_report_filename,
};
pub use health::check_health;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use queue::{
    run_batch, BatchReport, FixedDelayPacing, PacingPolicy, ProgressSink, QueuedUpload,
    UploadQueue,
};
pub use types::{
    ApiError, EngineEvent, FailureKind, FileIndex, GeneratedDocument, HealthProbe, HealthReport,
    UploadFile, ValidationReport,
};

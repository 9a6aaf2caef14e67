//! Reportgen core: pure state machine and view-model helpers.
mod effect;
mod format;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, HealthPurpose, Severity, UploadJob};
pub use format::{count_label, format_file_size, truncate_display_name, NAME_DISPLAY_WIDTH};
pub use msg::{Msg, ValidationSummary};
pub use state::{
    AppState, BackendStatus, FileStatus, GeneratedArtifact, Phase, SelectedFile,
};
pub use update::update;
pub use view_model::{AppViewModel, ArtifactRowView, EmptyState, FileRowView};

use crate::{BackendStatus, FileStatus, Phase};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub files: Vec<FileRowView>,
    pub file_count_label: String,
    /// Set when there is nothing to list.
    pub files_empty: Option<EmptyState>,
    pub artifacts: Vec<ArtifactRowView>,
    pub artifact_count_label: String,
    pub artifacts_empty: Option<EmptyState>,
    pub submit_enabled: bool,
    pub busy: bool,
    pub phase: Phase,
    pub backend: BackendStatus,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub index: usize,
    pub name: String,
    pub display_name: String,
    /// Human-readable size, or the row status once a batch touched it.
    pub meta: String,
    pub status: FileStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRowView {
    pub index: usize,
    pub filename: String,
    pub display_name: String,
    pub original_name: String,
    pub size_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyState {
    pub icon: &'static str,
    pub text: &'static str,
    pub hint: &'static str,
}

impl EmptyState {
    pub const NO_FILES: EmptyState = EmptyState {
        icon: "📭",
        text: "No files loaded",
        hint: "Add Excel files with `add <path>...`",
    };

    pub const NO_DOCUMENTS: EmptyState = EmptyState {
        icon: "📝",
        text: "No documents generated",
        hint: "Generate reports to see them here",
    };
}

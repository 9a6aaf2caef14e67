use bytes::Bytes;

use crate::format::{count_label, format_file_size, truncate_display_name};
use crate::view_model::{AppViewModel, ArtifactRowView, EmptyState, FileRowView};

/// A spreadsheet chosen by the user, held in memory until it is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub content: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size: content.len() as u64,
            content,
        }
    }
}

/// A document returned by the backend for one selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub content: Bytes,
    pub filename: String,
    pub original_name: String,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileStatus {
    #[default]
    Ready,
    Processing,
    Completed,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Healthy,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Submission is waiting for its pre-flight health probe.
    CheckingHealth,
    Uploading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectionEntry {
    file: SelectedFile,
    status: FileStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    selection: Vec<SelectionEntry>,
    artifacts: Vec<GeneratedArtifact>,
    failures: usize,
    phase: Phase,
    backend: BackendStatus,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn backend(&self) -> BackendStatus {
        self.backend
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    pub fn selected_file(&self, index: usize) -> Option<&SelectedFile> {
        self.selection.get(index).map(|entry| &entry.file)
    }

    pub fn selected_files(&self) -> impl Iterator<Item = &SelectedFile> {
        self.selection.iter().map(|entry| &entry.file)
    }

    pub fn file_status(&self, index: usize) -> Option<FileStatus> {
        self.selection.get(index).map(|entry| entry.status)
    }

    pub fn artifacts(&self) -> &[GeneratedArtifact] {
        &self.artifacts
    }

    pub fn artifact(&self, index: usize) -> Option<&GeneratedArtifact> {
        self.artifacts.get(index)
    }

    pub fn failure_count(&self) -> usize {
        self.failures
    }

    /// Returns whether the state changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let files: Vec<FileRowView> = self
            .selection
            .iter()
            .enumerate()
            .map(|(index, entry)| FileRowView {
                index,
                name: entry.file.name.clone(),
                display_name: truncate_display_name(&entry.file.name),
                meta: match entry.status {
                    FileStatus::Ready => format_file_size(entry.file.size),
                    FileStatus::Processing => "Processing...".to_string(),
                    FileStatus::Completed => "Completed".to_string(),
                    FileStatus::Error => "Error".to_string(),
                },
                status: entry.status,
            })
            .collect();

        let artifacts: Vec<ArtifactRowView> = self
            .artifacts
            .iter()
            .enumerate()
            .map(|(index, artifact)| ArtifactRowView {
                index,
                filename: artifact.filename.clone(),
                display_name: truncate_display_name(&artifact.filename),
                original_name: artifact.original_name.clone(),
                size_label: format_file_size(artifact.size),
            })
            .collect();

        AppViewModel {
            file_count_label: count_label(files.len(), "file", "files"),
            artifact_count_label: count_label(artifacts.len(), "document", "documents"),
            files_empty: files.is_empty().then_some(EmptyState::NO_FILES),
            artifacts_empty: artifacts.is_empty().then_some(EmptyState::NO_DOCUMENTS),
            submit_enabled: !files.is_empty() && self.is_idle(),
            busy: self.phase == Phase::Uploading,
            phase: self.phase,
            backend: self.backend,
            files,
            artifacts,
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            self.phase = phase;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_backend(&mut self, backend: BackendStatus) {
        if self.backend != backend {
            self.backend = backend;
            self.mark_dirty();
        }
    }

    pub(crate) fn replace_selection(&mut self, files: Vec<SelectedFile>) {
        self.selection = files
            .into_iter()
            .map(|file| SelectionEntry {
                file,
                status: FileStatus::Ready,
            })
            .collect();
        self.mark_dirty();
    }

    pub(crate) fn remove_selected(&mut self, index: usize) -> Option<SelectedFile> {
        if index >= self.selection.len() {
            return None;
        }
        let removed = self.selection.remove(index);
        self.mark_dirty();
        Some(removed.file)
    }

    pub(crate) fn clear_all(&mut self) {
        self.selection.clear();
        self.artifacts.clear();
        self.failures = 0;
        self.mark_dirty();
    }

    /// Prepares a new batch: drops previous results and resets every row.
    pub(crate) fn begin_batch(&mut self) {
        self.artifacts.clear();
        self.failures = 0;
        for entry in &mut self.selection {
            entry.status = FileStatus::Ready;
        }
        self.phase = Phase::Uploading;
        self.mark_dirty();
    }

    pub(crate) fn set_file_status(&mut self, index: usize, status: FileStatus) {
        if let Some(entry) = self.selection.get_mut(index) {
            entry.status = status;
            self.mark_dirty();
        }
    }

    pub(crate) fn push_artifact(&mut self, artifact: GeneratedArtifact) {
        self.artifacts.push(artifact);
        self.mark_dirty();
    }

    pub(crate) fn record_failure(&mut self) {
        self.failures += 1;
        self.mark_dirty();
    }
}

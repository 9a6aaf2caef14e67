use std::path::PathBuf;

use reportgen_core::{AppViewModel, BackendStatus, EmptyState, FileStatus, Severity};

/// Instructions for the console surface. One render produces a full frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    SetBackendStatus(BackendStatus),
    SetSubmitEnabled(bool),
    SetBusy(bool),
    SectionHeader {
        title: &'static str,
        count_label: String,
    },
    EmptyState(EmptyState),
    FileRow {
        number: usize,
        name: String,
        /// Set when `name` was shortened for display.
        full_name: Option<String>,
        meta: String,
        status: FileStatus,
    },
    ArtifactRow {
        number: usize,
        filename: String,
        full_name: Option<String>,
        original_name: String,
        size_label: String,
    },
    Notify {
        severity: Severity,
        message: String,
    },
    ArtifactSaved {
        path: PathBuf,
    },
}

impl UiCommand {
    /// Frame commands describe the lists; the rest are one-off messages.
    pub fn is_frame(&self) -> bool {
        !matches!(self, UiCommand::Notify { .. } | UiCommand::ArtifactSaved { .. })
    }
}

pub fn render(view: &AppViewModel) -> Vec<UiCommand> {
    let mut cmds = vec![
        UiCommand::SetBackendStatus(view.backend),
        UiCommand::SetSubmitEnabled(view.submit_enabled),
        UiCommand::SetBusy(view.busy),
        UiCommand::SectionHeader {
            title: "Files",
            count_label: view.file_count_label.clone(),
        },
    ];

    match view.files_empty {
        Some(empty) => cmds.push(UiCommand::EmptyState(empty)),
        None => cmds.extend(view.files.iter().map(|row| UiCommand::FileRow {
            number: row.index + 1,
            name: row.display_name.clone(),
            full_name: untruncated(&row.name, &row.display_name),
            meta: row.meta.clone(),
            status: row.status,
        })),
    }

    cmds.push(UiCommand::SectionHeader {
        title: "Documents",
        count_label: view.artifact_count_label.clone(),
    });

    match view.artifacts_empty {
        Some(empty) => cmds.push(UiCommand::EmptyState(empty)),
        None => cmds.extend(view.artifacts.iter().map(|row| UiCommand::ArtifactRow {
            number: row.index + 1,
            filename: row.display_name.clone(),
            full_name: untruncated(&row.filename, &row.display_name),
            original_name: row.original_name.clone(),
            size_label: row.size_label.clone(),
        })),
    }

    cmds
}

fn untruncated(name: &str, display_name: &str) -> Option<String> {
    (name != display_name).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use reportgen_core::{update, AppState, GeneratedArtifact, Msg, SelectedFile};

    #[test]
    fn empty_state_renders_both_placeholders() {
        let cmds = render(&AppState::new().view());

        assert_eq!(
            cmds,
            vec![
                UiCommand::SetBackendStatus(BackendStatus::Unknown),
                UiCommand::SetSubmitEnabled(false),
                UiCommand::SetBusy(false),
                UiCommand::SectionHeader {
                    title: "Files",
                    count_label: "0 files".to_string(),
                },
                UiCommand::EmptyState(EmptyState::NO_FILES),
                UiCommand::SectionHeader {
                    title: "Documents",
                    count_label: "0 documents".to_string(),
                },
                UiCommand::EmptyState(EmptyState::NO_DOCUMENTS),
            ]
        );
    }

    #[test]
    fn rows_are_numbered_from_one() {
        let (state, _) = update(
            AppState::new(),
            Msg::FilesSelected(vec![
                SelectedFile::new("enero.xlsx", vec![0u8; 1024]),
                SelectedFile::new("febrero.xlsx", vec![0u8; 10]),
            ]),
        );
        let (state, _) = update(
            state,
            Msg::UploadSucceeded {
                index: 0,
                artifact: GeneratedArtifact {
                    content: Bytes::from_static(b"doc"),
                    filename: "informe Enero.docx".to_string(),
                    original_name: "enero.xlsx".to_string(),
                    size: 3,
                },
            },
        );

        let cmds = render(&state.view());
        let rows: Vec<_> = cmds
            .iter()
            .filter(|cmd| matches!(cmd, UiCommand::FileRow { .. } | UiCommand::ArtifactRow { .. }))
            .cloned()
            .collect();

        assert_eq!(
            rows,
            vec![
                UiCommand::FileRow {
                    number: 1,
                    name: "enero.xlsx".to_string(),
                    full_name: None,
                    meta: "Completed".to_string(),
                    status: FileStatus::Completed,
                },
                UiCommand::FileRow {
                    number: 2,
                    name: "febrero.xlsx".to_string(),
                    full_name: None,
                    meta: "10 Bytes".to_string(),
                    status: FileStatus::Ready,
                },
                UiCommand::ArtifactRow {
                    number: 1,
                    filename: "informe Enero.docx".to_string(),
                    full_name: None,
                    original_name: "enero.xlsx".to_string(),
                    size_label: "3 Bytes".to_string(),
                },
            ]
        );
        assert!(cmds.contains(&UiCommand::SetSubmitEnabled(true)));
    }

    #[test]
    fn truncated_rows_carry_the_full_name() {
        let long = "encuesta de satisfaccion del segundo trimestre 2024.xlsx";
        let (state, _) = update(
            AppState::new(),
            Msg::FilesSelected(vec![SelectedFile::new(long, vec![0u8; 10])]),
        );

        let row = render(&state.view())
            .into_iter()
            .find(|cmd| matches!(cmd, UiCommand::FileRow { .. }));

        match row {
            Some(UiCommand::FileRow {
                name, full_name, ..
            }) => {
                assert_eq!(name.chars().count(), 40);
                assert!(name.ends_with('…'));
                assert_eq!(full_name.as_deref(), Some(long));
            }
            other => panic!("unexpected row: {other:?}"),
        }
    }

    #[test]
    fn notifications_are_not_frame_commands() {
        assert!(!UiCommand::Notify {
            severity: Severity::Info,
            message: "done".to_string(),
        }
        .is_frame());
        assert!(UiCommand::SetBusy(true).is_frame());
    }
}

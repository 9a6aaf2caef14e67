use std::sync::Once;

use pretty_assertions::assert_eq;
use reportgen_core::{update, AppState, Effect, EmptyState, Msg, SelectedFile, Severity};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(reportgen_logging::initialize_for_tests);
}

fn file(name: &str, size: usize) -> SelectedFile {
    SelectedFile::new(name, vec![0u8; size])
}

fn select(state: AppState, names: &[&str]) -> AppState {
    let files = names.iter().map(|name| file(name, 10)).collect();
    let (state, effects) = update(state, Msg::FilesSelected(files));
    assert!(effects.is_empty());
    state
}

fn names(state: &AppState) -> Vec<String> {
    state.view().files.iter().map(|row| row.name.clone()).collect()
}

#[test]
fn empty_selection_renders_empty_state_and_disables_submit() {
    init_logging();
    let view = AppState::new().view();

    assert!(view.files.is_empty());
    assert_eq!(view.files_empty, Some(EmptyState::NO_FILES));
    assert_eq!(view.file_count_label, "0 files");
    assert_eq!(view.artifact_count_label, "0 documents");
    assert!(!view.submit_enabled);
}

#[test]
fn selection_replaces_previous_set() {
    init_logging();
    let state = select(AppState::new(), &["a.xlsx", "b.xlsx"]);
    let mut state = select(state, &["c.xls"]);

    assert_eq!(names(&state), vec!["c.xls".to_string()]);
    let view = state.view();
    assert_eq!(view.file_count_label, "1 file");
    assert_eq!(view.files_empty, None);
    assert!(view.submit_enabled);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn rows_show_index_and_human_size() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::FilesSelected(vec![file("a.xlsx", 1024), file("b.xlsx", 0)]),
    );
    let rows = state.view().files;

    assert_eq!(rows[0].index, 0);
    assert_eq!(rows[0].meta, "1 KB");
    assert_eq!(rows[1].index, 1);
    assert_eq!(rows[1].meta, "0 Bytes");
}

#[test]
fn remove_keeps_relative_order_and_reindexes() {
    init_logging();
    let state = select(AppState::new(), &["a.xlsx", "b.xlsx", "c.xlsx", "d.xlsx"]);

    let (state, effects) = update(state, Msg::RemoveFileClicked(1));
    assert!(effects.is_empty());

    assert_eq!(names(&state), vec!["a.xlsx", "c.xlsx", "d.xlsx"]);
    let indices: Vec<_> = state.view().files.iter().map(|row| row.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(state.selection_len(), 3);
}

#[test]
fn remove_every_position_shrinks_by_one() {
    init_logging();
    let all = ["a.xlsx", "b.xlsx", "c.xlsx"];
    for i in 0..all.len() {
        let state = select(AppState::new(), &all);
        let (state, _) = update(state, Msg::RemoveFileClicked(i));

        let mut expected: Vec<String> = all.iter().map(|n| n.to_string()).collect();
        expected.remove(i);
        assert_eq!(names(&state), expected);
        assert_eq!(state.view().files.len(), state.selection_len());
    }
}

#[test]
fn remove_out_of_range_is_ignored() {
    init_logging();
    let mut state = select(AppState::new(), &["a.xlsx"]);
    assert!(state.consume_dirty());

    let (mut state, effects) = update(state, Msg::RemoveFileClicked(5));

    assert!(effects.is_empty());
    assert_eq!(state.selection_len(), 1);
    assert!(!state.consume_dirty());
}

#[test]
fn removing_last_file_disables_submit() {
    init_logging();
    let state = select(AppState::new(), &["a.xlsx"]);
    let (state, _) = update(state, Msg::RemoveFileClicked(0));

    let view = state.view();
    assert!(!view.submit_enabled);
    assert_eq!(view.files_empty, Some(EmptyState::NO_FILES));
}

#[test]
fn clear_empties_selection() {
    init_logging();
    let state = select(AppState::new(), &["a.xlsx", "b.xlsx"]);
    let (state, effects) = update(state, Msg::ClearClicked);

    assert!(effects.is_empty());
    assert_eq!(state.selection_len(), 0);
    assert!(state.artifacts().is_empty());
    assert_eq!(state.view().artifacts_empty, Some(EmptyState::NO_DOCUMENTS));
}

#[test]
fn submit_without_files_only_notifies() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SubmitClicked);

    assert_eq!(
        effects,
        vec![Effect::Notify {
            severity: Severity::Warning,
            message: "Please select at least one Excel file".to_string(),
        }]
    );
    assert!(state.is_idle());
}

#[test]
fn download_of_missing_artifact_notifies() {
    init_logging();
    let (_state, effects) = update(AppState::new(), Msg::DownloadClicked(0));

    assert_eq!(
        effects,
        vec![Effect::Notify {
            severity: Severity::Warning,
            message: "No file to download".to_string(),
        }]
    );
}

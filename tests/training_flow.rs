//! End-to-end flows through the session controller, the line editors, and
//! the history store, exercised the way the event loop drives them.

use std::path::PathBuf;

use gengoka::app::App;
use gengoka::editor::{DeepDiveEditor, EditorIntent};
use gengoka::history::TrainingStore;
use gengoka::session::{Phase, Session};

fn app_with_memory_store(total_seconds: u32) -> App {
    let store = TrainingStore::open_in_memory().expect("in-memory store");
    App::with_store(store, total_seconds, PathBuf::from("."))
}

fn type_theme(app: &mut App, theme: &str) {
    for c in theme.chars() {
        app.theme_input_mut().enter_char(c);
    }
}

fn type_into_active(app: &mut App, text: &str) {
    let editor = app.active_editor_mut().expect("a step editor is mounted");
    for c in text.chars() {
        editor.insert_char(c);
    }
}

#[test]
fn timed_run_reaches_review_without_explicit_transitions() {
    let mut session = Session::new(120);
    assert!(session.start("What makes a good standup?"));

    // Burn half the budget in step 1, then move on.
    for _ in 0..60 {
        session.tick();
    }
    session.advance();
    assert_eq!(session.remaining_seconds(), 60);

    // Step 2 inherits the same clock and runs it out.
    for _ in 0..60 {
        session.tick();
    }
    assert_eq!(session.phase(), Phase::Review);
    assert_eq!(session.remaining_seconds(), 0);
    assert!(!session.is_running());
}

#[test]
fn editing_sequence_builds_and_prunes_the_chain() {
    let mut editor = DeepDiveEditor::new();

    for c in "standups are too long".chars() {
        editor.insert_char(c);
    }
    editor.apply(EditorIntent::Commit);
    for c in "we report instead of plan".chars() {
        editor.insert_char(c);
    }
    editor.apply(EditorIntent::Commit);

    // The trailing empty line is removable; the content above is not.
    editor.apply(EditorIntent::DeleteBackward);
    editor.apply(EditorIntent::DeleteBackward);
    assert_eq!(
        editor.value(),
        "standups are too long\nwe report instead of plan"
    );
    assert_eq!(editor.active_index(), 1);
}

#[test]
fn full_session_is_persisted_with_joined_step_values() {
    let mut app = app_with_memory_store(120);

    type_theme(&mut app, "meetings");
    app.start_training();
    assert_eq!(app.phase(), Phase::Step1);

    type_into_active(&mut app, "a");
    app.active_editor_mut().unwrap().apply(EditorIntent::Commit);
    type_into_active(&mut app, "b");
    app.advance_step();

    type_into_active(&mut app, "c");
    app.complete_step();
    assert_eq!(app.phase(), Phase::Review);

    app.save_session();
    assert!(app.is_saved());

    app.open_history();
    let records = app.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].theme, "meetings");
    assert_eq!(records[0].step1_thought, "a\nb");
    assert_eq!(records[0].step2_reason, "c");
}

#[test]
fn saving_twice_yields_a_single_record() {
    let mut app = app_with_memory_store(120);

    type_theme(&mut app, "T");
    app.start_training();
    type_into_active(&mut app, "a");
    app.advance_step();
    app.complete_step();

    app.save_session();
    app.save_session();

    app.open_history();
    assert_eq!(app.records().len(), 1);
}

#[test]
fn failed_save_keeps_state_so_the_run_can_be_retried() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("history.db");

    let store = TrainingStore::open(&db_path).expect("open store");
    let mut app = App::with_store(store, 120, dir.path().to_path_buf());

    type_theme(&mut app, "resilience");
    app.start_training();
    type_into_active(&mut app, "the draft must survive a bad disk");
    app.advance_step();
    type_into_active(&mut app, "because retyping it defeats the exercise");
    app.complete_step();

    // Break the table behind the store's back so the insert fails.
    let raw = rusqlite::Connection::open(&db_path).expect("second connection");
    raw.execute_batch("DROP TABLE trainings").expect("drop table");

    app.save_session();
    assert!(!app.is_saved());
    assert_eq!(app.status_message(), Some("Save failed - press s to retry"));
    assert_eq!(app.phase(), Phase::Review);
    assert_eq!(app.step1().value(), "the draft must survive a bad disk");
    assert_eq!(
        app.step2().value(),
        "because retyping it defeats the exercise"
    );

    // Put the table back; the retry succeeds and latches.
    raw.execute_batch(
        "CREATE TABLE trainings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            theme TEXT NOT NULL,
            step1_thought TEXT NOT NULL,
            step2_reason TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .expect("recreate table");

    app.save_session();
    assert!(app.is_saved());

    app.open_history();
    assert_eq!(app.records().len(), 1);
    assert_eq!(app.records()[0].theme, "resilience");
}

#[test]
fn deleting_a_record_removed_elsewhere_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("history.db");

    let store = TrainingStore::open(&db_path).expect("open store");
    let mut app = App::with_store(store, 120, dir.path().to_path_buf());

    type_theme(&mut app, "stale");
    app.start_training();
    type_into_active(&mut app, "x");
    app.advance_step();
    app.complete_step();
    app.save_session();

    app.open_history();
    assert_eq!(app.records().len(), 1);

    // The row disappears after the listing was taken.
    let raw = rusqlite::Connection::open(&db_path).expect("second connection");
    raw.execute_batch("DELETE FROM trainings").expect("clear table");

    app.delete_selected();
    assert!(app.records().is_empty());
    assert_eq!(app.status_message(), Some("Record was already deleted"));
}

#[test]
fn history_survives_a_process_restart() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("history.db");

    {
        let store = TrainingStore::open(&db_path).expect("open store");
        let mut app = App::with_store(store, 120, dir.path().to_path_buf());

        type_theme(&mut app, "persistence");
        app.start_training();
        type_into_active(&mut app, "it should outlive the app");
        app.advance_step();
        type_into_active(&mut app, "because review happens later");
        app.complete_step();
        app.save_session();
        assert!(app.is_saved());
    }

    let store = TrainingStore::open(&db_path).expect("reopen store");
    let records = store.list().expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].theme, "persistence");
    assert_eq!(records[0].step2_reason, "because review happens later");
}

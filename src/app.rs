//! Application state: the hosting screen that composes the session
//! controller, the two deep-dive editors, and the history store.
//!
//! All mutation funnels through `&mut App` on the event loop thread. The
//! countdown is advanced by [`App::tick`], which converts elapsed wall-clock
//! seconds into `Session::tick` calls on that same path, so a timer tick and
//! a keystroke can never interleave mid-mutation. When the `App` is dropped
//! the clock goes with it; there is no detached timer to cancel.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;

use crate::config::GengokaConfig;
use crate::editor::{DeepDiveEditor, LineBuffer};
use crate::history::{TrainingRecord, TrainingStore};
use crate::session::{Phase, Session};
use crate::themes;

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Which top-level screen is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Training,
    History,
}

/// Application state
pub struct App {
    screen: Screen,
    session: Session,
    theme_input: LineBuffer,
    step1: DeepDiveEditor,
    step2: DeepDiveEditor,
    store: TrainingStore,
    records: Vec<TrainingRecord>,
    selected: usize,
    /// At-most-once latch for the current completed run.
    saved: bool,
    status_message: Option<String>,
    should_quit: bool,
    data_dir: PathBuf,
    last_tick: Instant,
}

impl App {
    pub fn new(config: &GengokaConfig) -> anyhow::Result<Self> {
        let data_dir = config.data_dir();
        let store = TrainingStore::open(data_dir.join("history.db"))
            .context("opening history store")?;

        Ok(Self::with_store(store, config.total_seconds(), data_dir))
    }

    /// Build an app around an existing store (tests use an in-memory one).
    #[must_use]
    pub fn with_store(store: TrainingStore, total_seconds: u32, data_dir: PathBuf) -> Self {
        Self {
            screen: Screen::default(),
            session: Session::new(total_seconds),
            theme_input: LineBuffer::default(),
            step1: DeepDiveEditor::new(),
            step2: DeepDiveEditor::new(),
            store,
            records: Vec::new(),
            selected: 0,
            saved: false,
            status_message: None,
            should_quit: false,
            data_dir,
            last_tick: Instant::now(),
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn theme_input(&self) -> &LineBuffer {
        &self.theme_input
    }

    pub fn theme_input_mut(&mut self) -> &mut LineBuffer {
        &mut self.theme_input
    }

    /// The theme as it would be recorded.
    #[must_use]
    pub fn theme(&self) -> &str {
        self.theme_input.text().trim()
    }

    #[must_use]
    pub fn step1(&self) -> &DeepDiveEditor {
        &self.step1
    }

    #[must_use]
    pub fn step2(&self) -> &DeepDiveEditor {
        &self.step2
    }

    /// The editor mounted for the current phase, if any.
    #[must_use]
    pub fn active_editor(&self) -> Option<&DeepDiveEditor> {
        match self.session.phase() {
            Phase::Step1 => Some(&self.step1),
            Phase::Step2 => Some(&self.step2),
            Phase::Setup | Phase::Review => None,
        }
    }

    pub fn active_editor_mut(&mut self) -> Option<&mut DeepDiveEditor> {
        match self.session.phase() {
            Phase::Step1 => Some(&mut self.step1),
            Phase::Step2 => Some(&mut self.step2),
            Phase::Setup | Phase::Review => None,
        }
    }

    #[must_use]
    pub fn records(&self) -> &[TrainingRecord] {
        &self.records
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Advance the countdown by however many whole seconds elapsed since the
    /// previous call.
    ///
    /// Called once per event-loop iteration. The catch-up loop means a slow
    /// frame cannot silently drop seconds, and routing through here keeps
    /// the timer on the same single-writer path as key handling.
    pub fn tick(&mut self) {
        if !self.session.is_running() {
            self.last_tick = Instant::now();
            return;
        }

        while self.last_tick.elapsed() >= ONE_SECOND {
            self.last_tick += ONE_SECOND;
            self.session.tick();
            if !self.session.is_running() {
                break;
            }
        }
    }

    /// Setup -> Step1 with fresh editors and a full clock.
    pub fn start_training(&mut self) {
        let theme = self.theme().to_string();
        if theme.is_empty() {
            self.set_status("Enter a theme to start");
            return;
        }
        if !self.session.start(&theme) {
            return;
        }

        self.step1 = DeepDiveEditor::new();
        self.step2 = DeepDiveEditor::new();
        self.saved = false;
        self.last_tick = Instant::now();
        self.clear_status();
    }

    /// Replace the theme draft with a random built-in prompt.
    pub fn shuffle_theme(&mut self) {
        self.theme_input = LineBuffer::from_text(themes::random_theme());
    }

    pub fn advance_step(&mut self) {
        self.session.advance();
    }

    pub fn complete_step(&mut self) {
        self.session.complete();
    }

    /// Discard the run and return to Setup.
    pub fn restart(&mut self) {
        self.session.restart();
        self.theme_input = LineBuffer::default();
        self.step1 = DeepDiveEditor::new();
        self.step2 = DeepDiveEditor::new();
        self.saved = false;
        self.clear_status();
    }

    /// Persist the completed run, at most once.
    ///
    /// On a store failure the session state is kept as-is and the failure is
    /// surfaced in the status bar, so the user can retry without re-entering
    /// anything.
    pub fn save_session(&mut self) {
        if self.session.phase() != Phase::Review {
            return;
        }
        if self.saved {
            self.set_status("Already saved");
            return;
        }

        let theme = self.theme().to_string();
        let step1 = self.step1.value();
        if theme.is_empty() || step1.trim().is_empty() {
            self.set_status("Nothing to save: step 1 is empty");
            return;
        }

        match self.store.save(&theme, &step1, &self.step2.value()) {
            Ok(id) => {
                self.saved = true;
                self.set_status(format!("Saved session #{id}"));
            }
            Err(err) => {
                tracing::warn!("failed to save session: {err}");
                self.set_status("Save failed - press s to retry");
            }
        }
    }

    /// Load the record list and switch to the history screen.
    pub fn open_history(&mut self) {
        match self.store.list() {
            Ok(records) => {
                self.records = records;
                self.selected = 0;
                self.screen = Screen::History;
                self.clear_status();
            }
            Err(err) => {
                tracing::warn!("failed to load history: {err}");
                self.set_status("Could not load history");
            }
        }
    }

    pub fn close_history(&mut self) {
        self.screen = Screen::Training;
        self.clear_status();
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.records.len() {
            self.selected += 1;
        }
    }

    /// Delete the highlighted record.
    pub fn delete_selected(&mut self) {
        let Some(record) = self.records.get(self.selected) else {
            return;
        };

        match self.store.delete(record.id) {
            Ok(existed) => {
                // A missing row means the listing went stale under us; drop
                // the entry either way.
                self.records.remove(self.selected);
                if self.selected >= self.records.len() {
                    self.selected = self.records.len().saturating_sub(1);
                }
                self.set_status(if existed {
                    "Record deleted"
                } else {
                    "Record was already deleted"
                });
            }
            Err(err) => {
                tracing::warn!("failed to delete record: {err}");
                self.set_status("Delete failed");
            }
        }
    }

    /// Write the full history as JSON into the data directory.
    pub fn export_history(&mut self) {
        if self.records.is_empty() {
            self.set_status("Nothing to export");
            return;
        }

        let json = match self.store.export_json() {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("failed to serialize export: {err}");
                self.set_status("Export failed");
                return;
            }
        };

        let path = self.data_dir.join("gengoka-history.json");
        match std::fs::write(&path, json) {
            Ok(()) => self.set_status(format!("Exported to {}", path.display())),
            Err(err) => {
                tracing::warn!("failed to write export to {}: {err}", path.display());
                self.set_status("Export failed");
            }
        }
    }

    /// Pretend `seconds` of wall-clock time passed (tests only).
    #[cfg(test)]
    fn rewind_clock(&mut self, seconds: u64) {
        self.last_tick -= Duration::from_secs(seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app(total_seconds: u32) -> App {
        let store = TrainingStore::open_in_memory().expect("in-memory store for tests");
        App::with_store(store, total_seconds, PathBuf::from("."))
    }

    fn type_theme(app: &mut App, theme: &str) {
        for c in theme.chars() {
            app.theme_input_mut().enter_char(c);
        }
    }

    fn type_line(app: &mut App, text: &str) {
        let editor = app.active_editor_mut().expect("an editor is mounted");
        for c in text.chars() {
            editor.insert_char(c);
        }
    }

    #[test]
    fn start_with_empty_theme_is_surfaced_not_fatal() {
        let mut app = test_app(120);
        app.start_training();

        assert_eq!(app.phase(), Phase::Setup);
        assert_eq!(app.status_message(), Some("Enter a theme to start"));
    }

    #[test]
    fn start_mounts_step1_editor() {
        let mut app = test_app(120);
        type_theme(&mut app, "T");
        app.start_training();

        assert_eq!(app.phase(), Phase::Step1);
        assert!(app.active_editor().is_some());
        assert_eq!(app.session().remaining_seconds(), 120);
    }

    #[test]
    fn wall_clock_ticks_route_through_the_session() {
        let mut app = test_app(120);
        type_theme(&mut app, "T");
        app.start_training();

        app.rewind_clock(5);
        app.tick();
        assert_eq!(app.session().remaining_seconds(), 115);

        // A stopped clock ignores elapsed time.
        app.advance_step();
        app.complete_step();
        app.rewind_clock(30);
        app.tick();
        assert_eq!(app.session().remaining_seconds(), 115);
    }

    #[test]
    fn running_out_of_time_lands_in_review() {
        let mut app = test_app(10);
        type_theme(&mut app, "T");
        app.start_training();

        app.rewind_clock(60);
        app.tick();
        assert_eq!(app.phase(), Phase::Review);
        assert_eq!(app.session().remaining_seconds(), 0);
        assert!(!app.session().is_running());
    }

    #[test]
    fn save_is_latched_to_once_per_run() {
        let mut app = test_app(120);
        type_theme(&mut app, "T");
        app.start_training();
        type_line(&mut app, "a");
        app.advance_step();
        type_line(&mut app, "c");
        app.complete_step();

        app.save_session();
        assert!(app.is_saved());
        app.save_session();
        assert_eq!(app.status_message(), Some("Already saved"));

        app.open_history();
        assert_eq!(app.records().len(), 1);
        assert_eq!(app.records()[0].theme, "T");
    }

    #[test]
    fn save_outside_review_is_ignored() {
        let mut app = test_app(120);
        type_theme(&mut app, "T");
        app.start_training();
        type_line(&mut app, "a");

        app.save_session();
        assert!(!app.is_saved());

        app.open_history();
        assert!(app.records().is_empty());
    }

    #[test]
    fn save_requires_step1_content() {
        let mut app = test_app(120);
        type_theme(&mut app, "T");
        app.start_training();
        app.advance_step();
        app.complete_step();

        app.save_session();
        assert!(!app.is_saved());
        assert_eq!(app.status_message(), Some("Nothing to save: step 1 is empty"));
    }

    #[test]
    fn restart_clears_everything_for_a_new_run() {
        let mut app = test_app(120);
        type_theme(&mut app, "T");
        app.start_training();
        type_line(&mut app, "a");
        app.advance_step();
        app.complete_step();
        app.save_session();

        app.restart();
        assert_eq!(app.phase(), Phase::Setup);
        assert!(app.theme().is_empty());
        assert_eq!(app.step1().value(), "");
        assert!(!app.is_saved());
    }

    #[test]
    fn delete_selected_clamps_the_selection() {
        let mut app = test_app(120);
        for theme in ["a", "b"] {
            type_theme(&mut app, theme);
            app.start_training();
            type_line(&mut app, "x");
            app.advance_step();
            app.complete_step();
            app.save_session();
            app.restart();
        }

        app.open_history();
        assert_eq!(app.records().len(), 2);

        app.select_next();
        app.delete_selected();
        assert_eq!(app.selected(), 0);
        app.delete_selected();
        assert!(app.records().is_empty());

        // Nothing left: a further delete is a no-op.
        app.delete_selected();
    }

    #[test]
    fn shuffle_fills_the_theme_draft() {
        let mut app = test_app(120);
        app.shuffle_theme();
        assert!(!app.theme().is_empty());
    }
}

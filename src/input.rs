use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::app::{App, Screen};
use crate::editor::EditorIntent;
use crate::session::Phase;

/// Handle terminal events
/// Returns true if the app should quit
pub fn handle_events(app: &mut App) -> Result<bool> {
    // Poll for events with a timeout
    if event::poll(Duration::from_millis(100))?
        && let Event::Key(key) = event::read()?
    {
        // Only handle key press events (not release) - important for Windows
        if key.kind != KeyEventKind::Press {
            return Ok(app.should_quit());
        }

        // Handle Ctrl+C globally
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(true);
        }

        match app.screen() {
            Screen::History => handle_history(app, key),
            Screen::Training => match app.phase() {
                Phase::Setup => handle_setup(app, key),
                Phase::Step1 | Phase::Step2 => handle_step(app, key),
                Phase::Review => handle_review(app, key),
            },
        }
    }

    Ok(app.should_quit())
}

/// Translate a raw key into an intent against the line chain.
///
/// This is the single place where keys become editor intents. While a
/// composition is in flight, Enter belongs to the input method and must not
/// commit a line, so it decodes to nothing.
#[must_use]
pub fn decode_editor_intent(code: KeyCode, composing: bool) -> Option<EditorIntent> {
    match code {
        KeyCode::Enter if composing => None,
        KeyCode::Enter => Some(EditorIntent::Commit),
        KeyCode::Backspace => Some(EditorIntent::DeleteBackward),
        KeyCode::Up => Some(EditorIntent::FocusUp),
        KeyCode::Down => Some(EditorIntent::FocusDown),
        _ => None,
    }
}

fn handle_setup(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.request_quit();
        }
        KeyCode::Enter => {
            app.start_training();
        }
        // Draw a random theme prompt
        KeyCode::Tab => {
            app.shuffle_theme();
        }
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.open_history();
        }
        KeyCode::Backspace => {
            app.theme_input_mut().delete_char();
        }
        KeyCode::Delete => {
            app.theme_input_mut().delete_char_forward();
        }
        KeyCode::Left => {
            app.theme_input_mut().move_cursor_left();
        }
        KeyCode::Right => {
            app.theme_input_mut().move_cursor_right();
        }
        KeyCode::Home => {
            app.theme_input_mut().reset_cursor();
        }
        KeyCode::End => {
            app.theme_input_mut().move_cursor_end();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.theme_input_mut().enter_char(c);
            app.clear_status();
        }
        _ => {}
    }
}

fn handle_step(app: &mut App, key: KeyEvent) {
    match key.code {
        // Finish the current step
        KeyCode::Tab => match app.phase() {
            Phase::Step1 => app.advance_step(),
            Phase::Step2 => app.complete_step(),
            Phase::Setup | Phase::Review => {}
        },
        // Abandon the run
        KeyCode::Esc => {
            app.restart();
            app.set_status("Session discarded");
        }
        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(editor) = app.active_editor_mut() {
                editor.append_line();
            }
        }
        _ => {
            let Some(editor) = app.active_editor_mut() else {
                return;
            };

            // Backspace inside a non-empty line edits the line; on an empty
            // line it becomes the chain-level intent.
            if key.code == KeyCode::Backspace && !editor.active_line().is_empty() {
                editor.delete_char();
                return;
            }

            if let Some(intent) = decode_editor_intent(key.code, editor.is_composing()) {
                editor.apply(intent);
                return;
            }

            match key.code {
                KeyCode::Delete => {
                    editor.delete_char_forward();
                }
                KeyCode::Left => {
                    editor.move_cursor_left();
                }
                KeyCode::Right => {
                    editor.move_cursor_right();
                }
                KeyCode::Home => {
                    editor.move_cursor_home();
                }
                KeyCode::End => {
                    editor.move_cursor_end();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    editor.insert_char(c);
                }
                _ => {}
            }
        }
    }
}

fn handle_review(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('s') | KeyCode::Enter => {
            app.save_session();
        }
        // Discard and start over
        KeyCode::Char('d') | KeyCode::Esc => {
            app.restart();
        }
        KeyCode::Char('l') => {
            app.open_history();
        }
        KeyCode::Char('q') => {
            app.request_quit();
        }
        _ => {}
    }
}

fn handle_history(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.close_history();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next();
        }
        KeyCode::Delete | KeyCode::Char('d') => {
            app.delete_selected();
        }
        KeyCode::Char('e') => {
            app.export_history();
        }
        _ => {}
    }
}

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Screen};
use crate::editor::DeepDiveEditor;
use crate::session::Phase;
use crate::theme::styles;

const CONNECTOR_TEXT: &str = "  ↓ what do you mean by that?";

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    // Clear with background color
    frame.render_widget(Block::default().style(styles::screen_bg()), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(1),    // Screen body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    match app.screen() {
        Screen::History => draw_history(frame, app, chunks[0]),
        Screen::Training => match app.phase() {
            Phase::Setup => draw_setup(frame, app, chunks[0]),
            Phase::Step1 | Phase::Step2 => draw_step(frame, app, chunks[0]),
            Phase::Review => draw_review(frame, app, chunks[0]),
        },
    }

    draw_status_bar(frame, app, chunks[1]);
}

/// Remaining seconds as `m:ss`.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn draw_setup(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title
            Constraint::Length(3), // Theme input
            Constraint::Min(1),    // Hints
        ])
        .split(area);

    let title = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("言語化 Gengoka", styles::title())),
        Line::from(Span::styled(
            "Put a thought into words, then ask yourself why.",
            styles::secondary(),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::active_border())
        .title(Span::styled(" Theme ", styles::secondary()));
    let inner = input_block.inner(chunks[1]);

    let input = Paragraph::new(Line::from(vec![
        Span::styled("❯ ", styles::title()),
        Span::styled(app.theme_input().text(), styles::body()),
    ]))
    .block(input_block);
    frame.render_widget(input, chunks[1]);

    let text_before_cursor: String = app
        .theme_input()
        .text()
        .chars()
        .take(app.theme_input().cursor())
        .collect();
    frame.set_cursor_position((
        inner.x + 2 + text_before_cursor.width() as u16,
        inner.y,
    ));

    let hints = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", styles::key_highlight()),
            Span::styled(" start  ", styles::key_hint()),
            Span::styled("Tab", styles::key_highlight()),
            Span::styled(" random theme  ", styles::key_hint()),
            Span::styled("Ctrl+L", styles::key_highlight()),
            Span::styled(" history  ", styles::key_hint()),
            Span::styled("Esc", styles::key_highlight()),
            Span::styled(" quit ", styles::key_hint()),
        ]),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(hints, chunks[2]);
}

fn draw_step(frame: &mut Frame, app: &App, area: Rect) {
    let Some(editor) = app.active_editor() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(34)])
        .split(area);

    draw_editor(frame, app, editor, chunks[0]);
    draw_step_sidebar(frame, app, chunks[1]);
}

fn draw_editor(frame: &mut Frame, app: &App, editor: &DeepDiveEditor, area: Rect) {
    let (step_label, question) = match app.phase() {
        Phase::Step2 => (" STEP 2 ", "Why did you think that?"),
        _ => (" STEP 1 ", "What is on your mind about this theme?"),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::active_border())
        .padding(Padding::horizontal(1))
        .title(Span::styled(step_label, styles::title()))
        .title_bottom(
            Line::from(vec![
                Span::styled("Enter", styles::key_highlight()),
                Span::styled(" commit line  ", styles::key_hint()),
                Span::styled("Tab", styles::key_highlight()),
                Span::styled(" next  ", styles::key_hint()),
                Span::styled("Esc", styles::key_highlight()),
                Span::styled(" discard ", styles::key_hint()),
            ])
            .alignment(Alignment::Right),
        );
    let inner = block.inner(area);

    // One row per line plus a connector row between lines; line i sits at
    // row 2 * i.
    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(question, styles::secondary()),
        Span::styled(format!("   ({})", app.theme()), styles::muted()),
    ]));
    lines.push(Line::from(""));

    let active = editor.active_index();
    for (i, text) in editor.lines().enumerate() {
        if i > 0 {
            lines.push(Line::from(Span::styled(CONNECTOR_TEXT, styles::muted())));
        }

        let (prefix, style) = if i == active {
            ("▌ ", styles::active_line())
        } else {
            ("  ", styles::body())
        };

        if text.is_empty() && i == active {
            lines.push(Line::from(vec![
                Span::styled(prefix, styles::active_border()),
                Span::styled("type here...", styles::muted()),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::styled(prefix, styles::active_border()),
                Span::styled(text, style),
            ]));
        }
    }

    // Keep the active row in view. Rows above it: 2 header rows, then two
    // rows per preceding line.
    let active_row = 2 + 2 * active as u16;
    let visible = inner.height.saturating_sub(1);
    let scroll = active_row.saturating_sub(visible);

    let editor_widget = Paragraph::new(lines).block(block).scroll((scroll, 0));
    frame.render_widget(editor_widget, area);

    let text_before_cursor: String = editor
        .active_line()
        .text()
        .chars()
        .take(editor.active_line().cursor())
        .collect();
    frame.set_cursor_position((
        inner.x + 2 + text_before_cursor.width() as u16,
        inner.y + active_row - scroll,
    ));
}

fn draw_step_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Timer
            Constraint::Min(4),    // Hints / recap
        ])
        .split(area);

    draw_timer(frame, app, chunks[0]);

    let mut lines: Vec<Line> = vec![Line::from("")];
    match app.phase() {
        Phase::Step2 => {
            lines.push(Line::from(Span::styled("Your thought:", styles::secondary())));
            let step1_lines: Vec<&str> = app.step1().lines().collect();
            let skipped = step1_lines.len().saturating_sub(3);
            if skipped > 0 {
                lines.push(Line::from(Span::styled(
                    format!("  … {skipped} earlier"),
                    styles::muted(),
                )));
            }
            for text in step1_lines.iter().skip(skipped) {
                lines.push(Line::from(Span::styled(format!("  {text}"), styles::body())));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Dig into the reason behind it.",
                styles::muted(),
            )));
        }
        _ => {
            for hint in [
                "Write the first thing that",
                "comes to mind. Short lines",
                "are fine; commit and refine.",
            ] {
                lines.push(Line::from(Span::styled(hint, styles::muted())));
            }
        }
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(styles::panel_border())
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(panel, chunks[1]);
}

fn draw_timer(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session();
    let remaining = session.remaining_seconds();
    let total = session.total_seconds().max(1);

    let style = if remaining <= 10 {
        styles::timer_urgent()
    } else {
        styles::timer_normal()
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(styles::panel_border())
                .title(Span::styled(" Time ", styles::secondary())),
        )
        .gauge_style(style)
        .ratio(f64::from(remaining) / f64::from(total))
        .label(Span::styled(format_clock(remaining), style));
    frame.render_widget(gauge, area);
}

fn draw_review(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Theme header
            Constraint::Min(4),    // Step panels
            Constraint::Length(1), // Hints
        ])
        .split(area);

    let header = Paragraph::new(vec![Line::from(vec![
        Span::styled("Review: ", styles::secondary()),
        Span::styled(app.theme().to_string(), styles::title()),
    ])])
    .alignment(Alignment::Center);
    frame.render_widget(header, chunks[0]);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    draw_review_panel(frame, " Step 1: thought ", &app.step1().value(), panels[0]);
    draw_review_panel(frame, " Step 2: reason ", &app.step2().value(), panels[1]);

    let hints = Paragraph::new(Line::from(vec![
        Span::styled("s", styles::key_highlight()),
        Span::styled(" save  ", styles::key_hint()),
        Span::styled("d", styles::key_highlight()),
        Span::styled(" discard  ", styles::key_hint()),
        Span::styled("l", styles::key_highlight()),
        Span::styled(" history  ", styles::key_hint()),
        Span::styled("q", styles::key_highlight()),
        Span::styled(" quit ", styles::key_hint()),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(hints, chunks[2]);
}

fn draw_review_panel(frame: &mut Frame, title: &str, value: &str, area: Rect) {
    let lines: Vec<Line> = if value.trim().is_empty() {
        vec![Line::from(Span::styled("(empty)", styles::muted()))]
    } else {
        value
            .split('\n')
            .map(|text| Line::from(Span::styled(text.to_string(), styles::body())))
            .collect()
    };

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(styles::panel_border())
            .padding(Padding::horizontal(1))
            .title(Span::styled(title.to_string(), styles::secondary())),
    );
    frame.render_widget(panel, area);
}

fn draw_history(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::panel_border())
        .padding(Padding::horizontal(1))
        .title(Span::styled(" History ", styles::title()))
        .title_bottom(
            Line::from(vec![
                Span::styled("↑↓", styles::key_highlight()),
                Span::styled(" select  ", styles::key_hint()),
                Span::styled("d", styles::key_highlight()),
                Span::styled(" delete  ", styles::key_hint()),
                Span::styled("e", styles::key_highlight()),
                Span::styled(" export  ", styles::key_hint()),
                Span::styled("Esc", styles::key_highlight()),
                Span::styled(" back ", styles::key_hint()),
            ])
            .alignment(Alignment::Right),
        );

    if app.records().is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No saved sessions yet.", styles::muted())),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .records()
        .iter()
        .map(|record| {
            let first_line = record.step1_thought.lines().next().unwrap_or("");
            ListItem::new(Line::from(vec![
                Span::styled(
                    record.created_at.format("%Y-%m-%d %H:%M  ").to_string(),
                    styles::muted(),
                ),
                Span::styled(record.theme.clone(), styles::body()),
                Span::styled(format!("  {first_line}"), styles::muted()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selected_item())
        .highlight_symbol("▸ ");

    let mut state = ListState::default();
    state.select(Some(app.selected()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if let Some(msg) = app.status_message() {
        (msg.to_string(), styles::status())
    } else {
        let default = match (app.screen(), app.phase()) {
            (Screen::History, _) => "history",
            (_, Phase::Setup) => "pick a theme to begin",
            (_, Phase::Step1) => "step 1 of 2: put it into words",
            (_, Phase::Step2) => "step 2 of 2: say why",
            (_, Phase::Review) => "review your session",
        };
        (format!("● {default}"), styles::muted())
    };

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(text, style),
    ]));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::format_clock;

    #[test]
    fn clock_formats_minutes_and_padded_seconds() {
        assert_eq!(format_clock(120), "2:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(0), "0:00");
    }
}

//! Color theme for the terminal UI.
//!
//! Uses the Kanagawa Wave palette.

use ratatui::style::{Color, Modifier, Style};

/// Kanagawa Wave color palette constants.
pub mod colors {
    use super::Color;

    // === Backgrounds (Sumi Ink) ===
    pub const BG_DARK: Color = Color::Rgb(22, 22, 29); // sumiInk0
    pub const BG_PANEL: Color = Color::Rgb(31, 31, 40); // sumiInk3
    pub const BG_HIGHLIGHT: Color = Color::Rgb(42, 42, 55); // sumiInk4
    pub const BG_BORDER: Color = Color::Rgb(84, 84, 109); // sumiInk6

    // === Foregrounds (Fuji) ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186); // fujiWhite
    pub const TEXT_SECONDARY: Color = Color::Rgb(200, 192, 147); // oldWhite
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105); // fujiGray

    // === Accents ===
    pub const PRIMARY: Color = Color::Rgb(149, 127, 184); // oniViolet
    pub const CYAN: Color = Color::Rgb(127, 180, 202); // springBlue
    pub const GREEN: Color = Color::Rgb(152, 187, 108); // springGreen
    pub const YELLOW: Color = Color::Rgb(230, 195, 132); // carpYellow
    pub const ORANGE: Color = Color::Rgb(255, 160, 102); // surimiOrange
    pub const RED: Color = Color::Rgb(255, 93, 98); // peachRed

    // === Semantic Aliases ===
    pub const ACCENT: Color = CYAN;
    pub const SUCCESS: Color = GREEN;
    pub const WARNING: Color = YELLOW;
    pub const ERROR: Color = RED;
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Style, colors};

    #[must_use]
    pub fn screen_bg() -> Style {
        Style::default().bg(colors::BG_DARK)
    }

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn body() -> Style {
        Style::default().fg(colors::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn secondary() -> Style {
        Style::default().fg(colors::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn muted() -> Style {
        Style::default().fg(colors::TEXT_MUTED)
    }

    #[must_use]
    pub fn panel_border() -> Style {
        Style::default().fg(colors::BG_BORDER)
    }

    #[must_use]
    pub fn active_border() -> Style {
        Style::default().fg(colors::ACCENT)
    }

    #[must_use]
    pub fn active_line() -> Style {
        Style::default()
            .fg(colors::TEXT_PRIMARY)
            .bg(colors::BG_HIGHLIGHT)
    }

    #[must_use]
    pub fn timer_normal() -> Style {
        Style::default()
            .fg(colors::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn timer_urgent() -> Style {
        Style::default()
            .fg(colors::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default().fg(colors::TEXT_MUTED)
    }

    #[must_use]
    pub fn key_highlight() -> Style {
        Style::default()
            .fg(colors::ORANGE)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn status() -> Style {
        Style::default().fg(colors::WARNING)
    }

    #[must_use]
    pub fn selected_item() -> Style {
        Style::default()
            .fg(colors::TEXT_PRIMARY)
            .bg(colors::BG_HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }
}

//! Palette and semantic styles for the dashboard.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

pub const TEZOS_BLUE: Color = Color::Rgb(44, 125, 247); // #2c7df7
pub const SKY: Color = Color::Rgb(139, 233, 253); // #8be9fd
pub const AMBER: Color = Color::Rgb(241, 196, 15); // #f1c40f
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// Navy neutrals
pub const DIM_WHITE: Color = Color::Rgb(200, 208, 224); // #c8d0e0
pub const BORDER_GRAY: Color = Color::Rgb(94, 109, 140); // #5e6d8c
pub const BG_HIGHLIGHT: Color = Color::Rgb(22, 36, 64); // #162440
pub const BG_DARK: Color = Color::Rgb(13, 21, 38); // #0d1526

// ── Panels ────────────────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(SKY).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(TEZOS_BLUE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn border_error() -> Style {
    Style::default().fg(ERROR_RED)
}

// ── Tables ────────────────────────────────────────────────────────────

pub fn table_header() -> Style {
    Style::default()
        .fg(SKY)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(TEZOS_BLUE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Cycle separator rows in the rights table.
pub fn cycle_heading() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

// ── Rights ────────────────────────────────────────────────────────────

pub fn realized() -> Style {
    Style::default().fg(SUCCESS_GREEN)
}

pub fn missed() -> Style {
    Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD)
}

/// Round-1 fallback slots are less likely to be used.
pub fn fallback_round() -> Style {
    Style::default().fg(AMBER)
}

pub fn value() -> Style {
    Style::default().fg(DIM_WHITE).add_modifier(Modifier::BOLD)
}

pub fn label() -> Style {
    Style::default().fg(BORDER_GRAY)
}

// ── Chrome ────────────────────────────────────────────────────────────

pub fn tab_active() -> Style {
    Style::default()
        .fg(TEZOS_BLUE)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Hint text in the status bar and overlays.
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(SKY).add_modifier(Modifier::BOLD)
}

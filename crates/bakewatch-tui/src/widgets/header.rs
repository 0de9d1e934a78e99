//! Validator identity banner shown above every screen.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use bakewatch_core::format::{PLACEHOLDER, format_tez};
use bakewatch_core::{DashboardState, Validator};

use crate::theme;

pub const HEIGHT: u16 = 4;

fn status_style(validator: &Validator) -> Style {
    match validator.status.as_str() {
        "active" => Style::default().fg(theme::SUCCESS_GREEN),
        "closed" => Style::default().fg(theme::ERROR_RED),
        _ => theme::label(),
    }
}

fn identity(validator: &Validator) -> Line<'_> {
    Line::from(vec![
        Span::styled(" ● ", status_style(validator)),
        Span::styled(validator.name.as_str(), theme::title_style()),
        Span::raw("  "),
        Span::styled(validator.address.as_str(), theme::label()),
        Span::raw("  "),
        Span::styled(validator.status.as_str(), status_style(validator)),
    ])
}

/// Own and total stake once stats have loaded, the listed balance before.
fn stake(state: &DashboardState, validator: &Validator) -> Line<'static> {
    let Some(stats) = state.stats.as_ref() else {
        let balance = if validator.placeholder {
            PLACEHOLDER.to_owned()
        } else {
            format!("{} ꜩ", format_tez(validator.balance))
        };
        return Line::from(vec![
            Span::styled("   Balance ", theme::label()),
            Span::styled(balance, theme::value()),
        ]);
    };
    Line::from(vec![
        Span::styled("   Own Stake ", theme::label()),
        Span::styled(format!("{} ꜩ", format_tez(stats.own_staked_tez())), theme::value()),
        Span::styled("  │  Total Stake ", theme::label()),
        Span::styled(format!("{} ꜩ", format_tez(stats.balance_tez())), theme::value()),
        Span::styled("  │  Stakers ", theme::label()),
        Span::styled(stats.stakers_count.to_string(), theme::value()),
    ])
}

pub fn render(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());

    let lines = match state.selected.as_ref() {
        Some(validator) => vec![identity(validator), stake(state, validator)],
        None => vec![Line::from(Span::styled(
            " Resolving validator...",
            theme::label(),
        ))],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

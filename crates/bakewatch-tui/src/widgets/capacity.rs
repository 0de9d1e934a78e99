//! Collapsible staking / delegation capacity panel.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use bakewatch_core::format::{format_ratio, format_tez};
use bakewatch_core::{CapacityProfile, Validator};

use crate::theme;

/// Rows used when expanded, borders included.
pub const EXPANDED_HEIGHT: u16 = 7;
/// Collapsed to a single bordered line.
pub const COLLAPSED_HEIGHT: u16 = 3;

/// Gauge fill for a profile, clamped to `0.0..=1.0`.
pub fn utilization_ratio(profile: &CapacityProfile) -> f64 {
    (profile.utilization_pct() / 100.0).clamp(0.0, 1.0)
}

fn gauge_style(profile: &CapacityProfile) -> Style {
    if profile.is_over_capacity() {
        Style::default().fg(theme::ERROR_RED)
    } else {
        Style::default().fg(theme::TEZOS_BLUE)
    }
}

fn pair<'a>(label: &'a str, value: String, style: Style) -> Vec<Span<'a>> {
    vec![
        Span::styled(format!("{label:<11}"), theme::label()),
        Span::styled(value, style),
    ]
}

fn render_profile(frame: &mut Frame, area: Rect, title: &str, profile: &CapacityProfile) {
    let badge = if profile.enabled { "active" } else { "disabled" };
    let block = Block::default()
        .title(format!(" {title} ({badge}) "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [gauge_area, text_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);

    let gauge = Gauge::default()
        .gauge_style(gauge_style(profile))
        .ratio(utilization_ratio(profile))
        .label(format!("{:.1}% used", profile.utilization_pct()));
    frame.render_widget(gauge, gauge_area);

    let free_style = if profile.is_over_capacity() {
        theme::missed()
    } else {
        theme::value()
    };
    let mut lines = vec![
        Line::from(
            [
                pair("Fee", format_ratio(profile.fee), theme::value()),
                pair("  APY", format_ratio(profile.estimated_apy), theme::value()),
            ]
            .concat(),
        ),
        Line::from(pair(
            "Free Space",
            format!("{} ꜩ", format_tez(profile.free_space)),
            free_style,
        )),
        Line::from(pair(
            "Capacity",
            format!("{} ꜩ", format_tez(profile.capacity)),
            theme::value(),
        )),
    ];
    if profile.min_balance > 0.0 {
        lines.push(Line::from(pair(
            "Minimum",
            format!("{} ꜩ", format_tez(profile.min_balance)),
            theme::value(),
        )));
    }
    frame.render_widget(Paragraph::new(lines), text_area);
}

pub fn render(frame: &mut Frame, area: Rect, validator: &Validator, expanded: bool) {
    if !expanded {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let hint = Line::from(vec![
            Span::styled(" Capacity ", theme::title_style()),
            Span::styled("collapsed  ", theme::label()),
            Span::styled("m", theme::key_hint_key()),
            Span::styled(" expand", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hint).block(block), area);
        return;
    }

    if validator.placeholder {
        let block = Block::default()
            .title(" Capacity ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let text = Paragraph::new(Span::styled(
            " Not listed in the baker directory: no capacity terms",
            theme::label(),
        ))
        .block(block);
        frame.render_widget(text, area);
        return;
    }

    let [staking, delegation] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    render_profile(frame, staking, "Staking", &validator.staking);
    render_profile(frame, delegation, "Delegation", &validator.delegation);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(capacity: f64, free_space: f64) -> CapacityProfile {
        CapacityProfile {
            capacity,
            free_space,
            ..CapacityProfile::default()
        }
    }

    #[test]
    fn ratio_is_clamped() {
        assert!((utilization_ratio(&profile(100.0, 25.0)) - 0.75).abs() < f64::EPSILON);
        assert!((utilization_ratio(&profile(100.0, -50.0)) - 1.0).abs() < f64::EPSILON);
        assert!(utilization_ratio(&profile(0.0, 0.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn over_capacity_gauge_is_red() {
        assert_eq!(
            gauge_style(&profile(100.0, -1.0)).fg,
            Some(theme::ERROR_RED)
        );
        assert_eq!(
            gauge_style(&profile(100.0, 1.0)).fg,
            Some(theme::TEZOS_BLUE)
        );
    }
}

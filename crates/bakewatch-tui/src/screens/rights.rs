//! Rights screen: summary bar plus upcoming rights grouped by cycle.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use throbber_widgets_tui::{Throbber, ThrobberState};

use bakewatch_core::format::{format_duration, format_opt_duration, group_thousands};
use bakewatch_core::{CycleGroup, DashboardState, Right, ViewModel};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub const EMPTY_FILTERED: &str = "No upcoming baking rights in loaded range";
pub const EMPTY_RAW: &str = "No upcoming rights detected";

pub struct RightsScreen {
    focused: bool,
    state: Option<Arc<DashboardState>>,
    table_state: TableState,
    throbber_state: ThrobberState,
}

impl RightsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            state: None,
            table_state: TableState::default().with_selected(Some(0)),
            throbber_state: ThrobberState::default(),
        }
    }

    /// Heading row plus one row per right, for every cycle.
    fn row_count(&self) -> usize {
        self.state.as_deref().map_or(0, |state| {
            ViewModel::derive(state)
                .groups
                .iter()
                .map(|g| g.rights.len() + 1)
                .sum()
        })
    }

    fn scroll(&mut self, delta: isize) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.table_state.select(Some(next));
    }

    fn render_error(frame: &mut Frame, area: Rect, message: &str) {
        let block = Block::default()
            .title(" Error ")
            .title_style(Style::default().fg(theme::ERROR_RED).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_error());
        let line = Line::from(vec![
            Span::styled(format!(" {message}  "), Style::default().fg(theme::ERROR_RED)),
            Span::styled("r", theme::key_hint_key()),
            Span::styled(" retry", theme::key_hint()),
        ]);
        frame.render_widget(
            Paragraph::new(line).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_summary(frame: &mut Frame, area: Rect, state: &DashboardState, view: &ViewModel) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let sep = || Span::styled("  │  ", theme::key_hint());
        let next = match view.next {
            Some(right) => format!(
                "{} (level {})",
                format_opt_duration(view.time_to_next),
                group_thousands(right.level)
            ),
            None => format_opt_duration(None),
        };
        let round1 = if state.round_filter.shows_round1() {
            Span::styled("on", theme::fallback_round())
        } else {
            Span::styled("off", theme::label())
        };

        let line = Line::from(vec![
            Span::styled(" Baking Slots ", theme::label()),
            Span::styled(view.slot_count().to_string(), theme::value()),
            sep(),
            Span::styled("Cycles ", theme::label()),
            Span::styled(view.cycle_count().to_string(), theme::value()),
            sep(),
            Span::styled("Next Block ", theme::label()),
            Span::styled(next, theme::value()),
            sep(),
            Span::styled("Horizon ", theme::label()),
            Span::styled(format_duration(view.horizon), theme::value()),
            sep(),
            Span::styled("Round 1 ", theme::label()),
            round1,
            sep(),
            Span::styled("Chain Height ", theme::label()),
            Span::styled(
                state
                    .chain_level
                    .map_or_else(|| format_opt_duration(None), group_thousands),
                theme::value(),
            ),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn heading_row(group: &CycleGroup<'_>, now: DateTime<Utc>) -> Row<'static> {
        let (end_level, end_time) = group.info.map_or_else(
            || (String::new(), String::new()),
            |c| {
                (
                    format!("ends at {}", group_thousands(c.last_level)),
                    format!(
                        "~{} (in {})",
                        c.end_time.with_timezone(&Local).format("%a %H:%M"),
                        format_duration(c.end_time - now)
                    ),
                )
            },
        );
        Row::new(vec![
            Cell::from(format!("Cycle {}", group.cycle)),
            Cell::from(end_level),
            Cell::from(end_time),
            Cell::from(format!("{} slots", group.rights.len())),
        ])
        .style(theme::cycle_heading())
    }

    fn right_row(right: &Right, now: DateTime<Utc>, is_next: bool) -> Row<'static> {
        let mut style = if right.round.unwrap_or(0) > 0 {
            theme::fallback_round()
        } else {
            theme::table_row()
        };
        if is_next {
            style = style.add_modifier(Modifier::BOLD);
        }
        let marker = if is_next { "▸" } else { " " };
        Row::new(vec![
            Cell::from(format!("  {marker} {}", group_thousands(right.level))),
            Cell::from(right.round.map_or_else(|| "-".into(), |r| format!("round {r}"))),
            Cell::from(
                right
                    .timestamp
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
            ),
            Cell::from(format_duration(right.time_until(now))),
        ])
        .style(style)
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, state: &DashboardState, view: &ViewModel) {
        let next_level = view.next.map(|r| r.level);
        let rows: Vec<Row> = view
            .groups
            .iter()
            .flat_map(|group| {
                std::iter::once(Self::heading_row(group, state.now)).chain(
                    group
                        .rights
                        .iter()
                        .map(|r| Self::right_row(r, state.now, Some(r.level) == next_level)),
                )
            })
            .collect();

        let header = Row::new(["Level", "Round", "Time", "In"]).style(theme::table_header());
        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(" Upcoming Rights ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let table = Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Length(20),
                Constraint::Min(20),
                Constraint::Length(14),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(theme::table_selected());

        frame.render_stateful_widget(table, area, &mut self.table_state.clone());
    }

    fn render_message(frame: &mut Frame, area: Rect, message: &str) {
        let block = Block::default()
            .title(" Upcoming Rights ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let [row] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(inner);
        frame.render_widget(
            Paragraph::new(Span::styled(message, theme::label())).centered(),
            row,
        );
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let [_, row, _] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);
        let [_, cell, _] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(28),
            Constraint::Min(0),
        ])
        .areas(row);

        let throbber = Throbber::default()
            .label("Loading baking rights...")
            .style(Style::default().fg(theme::SKY))
            .throbber_style(Style::default().fg(theme::TEZOS_BLUE));
        frame.render_stateful_widget(throbber, cell, &mut self.throbber_state.clone());
    }
}

impl Component for RightsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => self.scroll(1),
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => self.scroll(-1),
            (KeyModifiers::CONTROL, KeyCode::Char('d')) | (_, KeyCode::PageDown) => self.scroll(10),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) | (_, KeyCode::PageUp) => self.scroll(-10),
            (KeyModifiers::NONE, KeyCode::Char('g') | KeyCode::Home) => {
                self.table_state.select(Some(0));
            }
            (KeyModifiers::SHIFT, KeyCode::Char('G')) | (_, KeyCode::End) => {
                self.table_state.select(Some(self.row_count().saturating_sub(1)));
            }
            (KeyModifiers::NONE, KeyCode::Char('f')) => return Ok(Some(Action::ToggleRound1)),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::StateUpdated(state) => {
                // A new selection starts from the top
                if self.state.as_ref().map(|s| s.generation) != Some(state.generation) {
                    self.table_state.select(Some(0));
                }
                self.state = Some(Arc::clone(state));
            }
            Action::Tick => self.throbber_state.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(state) = self.state.as_deref() else {
            self.render_loading(frame, area);
            return;
        };
        let view = ViewModel::derive(state);

        let error_height = if state.error.is_some() { 3 } else { 0 };
        let [error_area, summary_area, body_area] = Layout::vertical([
            Constraint::Length(error_height),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .areas(area);

        if let Some(ref message) = state.error {
            Self::render_error(frame, error_area, message);
        }
        Self::render_summary(frame, summary_area, state, &view);

        if state.loading && !view.has_raw_rights {
            self.render_loading(frame, body_area);
        } else if view.groups.is_empty() {
            let message = if view.has_raw_rights {
                EMPTY_FILTERED
            } else {
                EMPTY_RAW
            };
            Self::render_message(frame, body_area, message);
        } else {
            self.render_table(frame, body_area, state, &view);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
mod tests {
    use bakewatch_core::{RightKind, RoundFilter, Validator};
    use chrono::TimeZone;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    const BAKER: &str = "tz1T1fRJmpPp1pN2z45sivxdbKNQtyatzCVx";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("valid time")
    }

    fn right(cycle: i64, level: i64, round: u32, secs_ahead: i64) -> Right {
        Right {
            cycle,
            level,
            timestamp: now() + chrono::TimeDelta::seconds(secs_ahead),
            kind: RightKind::Baking,
            round: Some(round),
            status: None,
        }
    }

    fn state(upcoming: Vec<Right>) -> DashboardState {
        let mut state = DashboardState::new(now(), 20);
        state.selected = Some(Validator::placeholder(BAKER));
        state.upcoming = Arc::new(upcoming);
        state.chain_level = Some(8_000_000);
        state.loading = false;
        state
    }

    fn draw(screen: &RightsScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 20)).expect("terminal");
        terminal
            .draw(|frame| screen.render(frame, frame.area()))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    fn screen_with(state: DashboardState) -> RightsScreen {
        let mut screen = RightsScreen::new();
        screen
            .update(&Action::StateUpdated(Arc::new(state)))
            .expect("update");
        screen
    }

    #[test]
    fn groups_rights_by_cycle() {
        let screen = screen_with(state(vec![
            right(100, 8_000_100, 0, 600),
            right(100, 8_000_200, 0, 1_200),
            right(101, 8_010_000, 0, 90_000),
        ]));
        let text = draw(&screen);
        assert!(text.contains("Cycle 100"));
        assert!(text.contains("Cycle 101"));
        assert!(text.contains("8,000,200"));
        assert!(text.contains("Baking Slots 3"));
        assert!(text.contains("Chain Height 8,000,000"));
        assert_eq!(screen.row_count(), 5);
    }

    #[test]
    fn fallback_rights_hidden_until_round1_enabled() {
        let rights = vec![right(100, 8_000_100, 1, 600)];
        let text = draw(&screen_with(state(rights.clone())));
        assert!(text.contains(EMPTY_FILTERED));

        let mut with_round1 = state(rights);
        with_round1.round_filter = RoundFilter::UpToFirstFallback;
        let text = draw(&screen_with(with_round1));
        assert!(text.contains("8,000,100"));
        assert!(text.contains("round 1"));
    }

    #[test]
    fn no_rights_at_all_says_so() {
        let text = draw(&screen_with(state(Vec::new())));
        assert!(text.contains(EMPTY_RAW));
    }

    #[test]
    fn error_panel_keeps_previous_rights_visible() {
        let mut failed = state(vec![right(100, 8_000_100, 0, 600)]);
        failed.error = Some("connection failed".into());
        let text = draw(&screen_with(failed));
        assert!(text.contains("connection failed"));
        assert!(text.contains("retry"));
        assert!(text.contains("8,000,100"));
    }

    #[test]
    fn loading_without_rights_shows_spinner() {
        let mut loading = state(Vec::new());
        loading.loading = true;
        let text = draw(&screen_with(loading));
        assert!(text.contains("Loading baking rights..."));
    }

    #[test]
    fn f_toggles_round1() {
        let mut screen = RightsScreen::new();
        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::NONE))
            .expect("key");
        assert!(matches!(action, Some(Action::ToggleRound1)));
    }

    #[test]
    fn scrolling_is_bounded_by_rows() {
        let mut screen = screen_with(state(vec![
            right(100, 8_000_100, 0, 600),
            right(100, 8_000_200, 0, 1_200),
        ]));
        for _ in 0..10 {
            screen.scroll(1);
        }
        assert_eq!(screen.table_state.selected(), Some(2));
        screen.scroll(-10);
        assert_eq!(screen.table_state.selected(), Some(0));
    }
}

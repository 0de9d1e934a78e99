//! History screen: the most recent past rights and how they went.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use bakewatch_core::format::{format_duration, group_thousands};
use bakewatch_core::{DashboardState, Right};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub const LOADING: &str = "Loading history...";
pub const EMPTY: &str = "No recent rights found";

fn status_style(right: &Right) -> Style {
    if right.is_realized() {
        theme::realized()
    } else if right.is_missed() {
        theme::missed()
    } else {
        theme::label()
    }
}

fn history_row(right: &Right, now: DateTime<Utc>) -> Row<'static> {
    let status = right
        .status
        .as_ref()
        .map_or_else(|| "-".to_owned(), ToString::to_string);
    Row::new(vec![
        Cell::from(group_thousands(right.level)),
        Cell::from(right.cycle.to_string()),
        Cell::from(right.round.map_or_else(|| "-".into(), |r| r.to_string())),
        Cell::from(status).style(status_style(right)),
        Cell::from(format!("{} ago", format_duration(right.elapsed_since(now)))),
    ])
    .style(theme::table_row())
}

/// Title with the baked / missed tally of the loaded rights.
fn title(past: &[Right]) -> Line<'static> {
    let baked = past.iter().filter(|r| r.is_realized()).count();
    let missed = past.iter().filter(|r| r.is_missed()).count();
    Line::from(vec![
        Span::styled(" Recent History ", theme::title_style()),
        Span::styled(format!("Baked {baked} "), theme::realized()),
        Span::styled("· ", theme::key_hint()),
        Span::styled(format!("Missed {missed} "), theme::missed()),
    ])
}

pub struct HistoryScreen {
    focused: bool,
    state: Option<Arc<DashboardState>>,
    table_state: TableState,
}

impl HistoryScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            state: None,
            table_state: TableState::default().with_selected(Some(0)),
        }
    }

    fn len(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.past.len())
    }

    fn scroll(&mut self, delta: isize) {
        let len = self.len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.table_state.select(Some(next));
    }
}

impl Component for HistoryScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => self.scroll(1),
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => self.scroll(-1),
            (KeyModifiers::NONE, KeyCode::Char('g') | KeyCode::Home) => {
                self.table_state.select(Some(0));
            }
            (KeyModifiers::SHIFT, KeyCode::Char('G')) | (_, KeyCode::End) => {
                self.table_state.select(Some(self.len().saturating_sub(1)));
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::StateUpdated(state) = action {
            if self.state.as_ref().map(|s| s.generation) != Some(state.generation) {
                self.table_state.select(Some(0));
            }
            self.state = Some(Arc::clone(state));
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let past = self
            .state
            .as_ref()
            .map(|s| s.past.as_slice())
            .unwrap_or_default();
        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(title(past))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let Some(state) = self.state.as_deref().filter(|_| !past.is_empty()) else {
            let loading = self.state.as_ref().is_none_or(|s| s.history_loading);
            let message = if loading { LOADING } else { EMPTY };
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let [row] = Layout::vertical([Constraint::Length(1)])
                .flex(Flex::Center)
                .areas(inner);
            frame.render_widget(
                Paragraph::new(Span::styled(message, theme::label())).centered(),
                row,
            );
            return;
        };

        let rows: Vec<Row> = past.iter().map(|r| history_row(r, state.now)).collect();
        let header =
            Row::new(["Level", "Cycle", "Round", "Status", "When"]).style(theme::table_header());
        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(8),
                Constraint::Length(7),
                Constraint::Length(10),
                Constraint::Min(14),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(theme::table_selected());

        frame.render_stateful_widget(table, area, &mut self.table_state.clone());
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
mod tests {
    use bakewatch_core::{RightKind, RightStatus};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("valid time")
    }

    fn past(level: i64, status: RightStatus, secs_ago: i64) -> Right {
        Right {
            cycle: 99,
            level,
            timestamp: now() - chrono::TimeDelta::seconds(secs_ago),
            kind: RightKind::Baking,
            round: Some(0),
            status: Some(status),
        }
    }

    fn draw(screen: &HistoryScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).expect("terminal");
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

    fn screen_with(state: DashboardState) -> HistoryScreen {
        let mut screen = HistoryScreen::new();
        screen
            .update(&Action::StateUpdated(Arc::new(state)))
            .expect("update");
        screen
    }

    #[test]
    fn lists_outcomes_with_tally() {
        let mut state = DashboardState::new(now(), 20);
        state.past = Arc::new(vec![
            past(7_999_900, RightStatus::Realized, 90),
            past(7_999_800, RightStatus::MissedBaking, 3_700),
        ]);
        let text = draw(&screen_with(state));
        assert!(text.contains("Baked 1"));
        assert!(text.contains("Missed 1"));
        assert!(text.contains("7,999,900"));
        assert!(text.contains("1m 30s ago"));
        assert!(text.contains("1h 1m ago"));
    }

    #[test]
    fn loading_then_empty() {
        let mut state = DashboardState::new(now(), 20);
        state.history_loading = true;
        assert!(draw(&screen_with(state.clone())).contains(LOADING));

        state.history_loading = false;
        assert!(draw(&screen_with(state)).contains(EMPTY));
    }

    #[test]
    fn missed_rows_are_red() {
        let right = past(1, RightStatus::MissedEndorsing, 10);
        assert_eq!(status_style(&right).fg, Some(theme::ERROR_RED));
        let right = past(1, RightStatus::Realized, 10);
        assert_eq!(status_style(&right).fg, Some(theme::SUCCESS_GREEN));
    }
}

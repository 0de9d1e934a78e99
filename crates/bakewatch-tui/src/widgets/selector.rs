//! Validator picker overlay: type to filter the directory by name or
//! address, or paste a full address to watch an unlisted validator.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph};

use bakewatch_core::format::format_tez;
use bakewatch_core::{Validator, is_valid_address};

use crate::action::Action;
use crate::theme;

/// Result list cap.
pub const MAX_RESULTS: usize = 50;

/// Directory entries matching `query`, capped at [`MAX_RESULTS`]. A full,
/// valid address with no directory entry yields a single custom entry.
pub fn search(directory: &[Validator], query: &str) -> Vec<Validator> {
    let query = query.trim();
    let mut results: Vec<Validator> = directory
        .iter()
        .filter(|v| v.matches(query))
        .take(MAX_RESULTS)
        .cloned()
        .collect();

    if results.is_empty() && is_valid_address(query) {
        results.push(Validator::placeholder(query));
    }
    results
}

#[derive(Debug, Default)]
pub struct ValidatorSelector {
    directory: Arc<Vec<Validator>>,
    query: String,
    results: Vec<Validator>,
    list_state: ListState,
}

impl ValidatorSelector {
    /// Reset to an empty query over `directory`, highlighting `current`.
    pub fn open(&mut self, directory: Arc<Vec<Validator>>, current: Option<&str>) {
        self.directory = directory;
        self.query.clear();
        self.refresh();
        let idx = current
            .and_then(|addr| self.results.iter().position(|v| v.address == addr))
            .unwrap_or(0);
        self.list_state.select(Some(idx));
    }

    fn refresh(&mut self) {
        self.results = search(&self.directory, &self.query);
        self.list_state.select(Some(0));
    }

    fn move_selection(&mut self, down: bool) {
        if self.results.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(self.results.len() - 1)
        } else {
            current.saturating_sub(1)
        };
        self.list_state.select(Some(next));
    }

    pub fn highlighted(&self) -> Option<&Validator> {
        self.results.get(self.list_state.selected()?)
    }

    /// Append pasted text, trimmed of surrounding whitespace.
    pub fn paste(&mut self, text: &str) {
        self.query.push_str(text.trim());
        self.refresh();
    }

    /// Keys while the overlay is open. Everything is captured.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => Some(Action::CloseSelector),
            (_, KeyCode::Enter) => self
                .highlighted()
                .cloned()
                .map(|v| Action::SelectValidator(Box::new(v))),
            (_, KeyCode::Down) | (KeyModifiers::CONTROL, KeyCode::Char('n')) => {
                self.move_selection(true);
                None
            }
            (_, KeyCode::Up) | (KeyModifiers::CONTROL, KeyCode::Char('p')) => {
                self.move_selection(false);
                None
            }
            (_, KeyCode::Backspace) => {
                self.query.pop();
                self.refresh();
                None
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.query.push(c);
                self.refresh();
                None
            }
            _ => None,
        }
    }

    fn item(validator: &Validator) -> ListItem<'_> {
        let detail = if validator.placeholder {
            Span::styled("  custom address", theme::fallback_round())
        } else {
            Span::styled(
                format!("  {} ꜩ  {}", format_tez(validator.balance), validator.status),
                theme::label(),
            )
        };
        ListItem::new(vec![
            Line::from(Span::styled(validator.name.as_str(), theme::table_row())),
            Line::from(vec![
                Span::styled(format!("  {}", validator.address), theme::key_hint()),
                detail,
            ]),
        ])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = super::centered(area, 72, 24);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" Select Validator ({}) ", self.results.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [input_area, list_area, hint_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let input = Line::from(vec![
            Span::styled(" / ", Style::default().fg(theme::TEZOS_BLUE)),
            Span::styled(self.query.as_str(), Style::default().fg(theme::SKY)),
            Span::styled("█", Style::default().fg(theme::SKY)),
        ]);
        frame.render_widget(Paragraph::new(input), input_area);

        if self.results.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    " No matching validators. Paste a full address to watch it.",
                    theme::label(),
                )),
                list_area,
            );
        } else {
            let list = List::new(self.results.iter().map(Self::item))
                .highlight_style(theme::table_selected())
                .highlight_symbol("▸ ");
            frame.render_stateful_widget(list, list_area, &mut self.list_state.clone());
        }

        let hint = Line::from(vec![
            Span::styled(" ↑/↓ ", theme::key_hint_key()),
            Span::styled("move  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("select  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("close", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hint), hint_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LISTED: &str = "tz1T1fRJmpPp1pN2z45sivxdbKNQtyatzCVx";
    const UNLISTED: &str = "tz1aRoaRhSpRYvFdyvgWLL6TGyRoGF51wDjM";

    fn listed(address: &str, name: &str) -> Validator {
        Validator {
            name: name.into(),
            status: "active".into(),
            placeholder: false,
            ..Validator::placeholder(address)
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn directory() -> Vec<Validator> {
        vec![
            listed(LISTED, "Alpha Baker"),
            listed("tz3RDC3Jdn4j15J7bBHZd29EUee9gVB1CxD9", "Beta Stake"),
        ]
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let found = search(&directory(), "BETA");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Beta Stake");
    }

    #[test]
    fn search_caps_results() {
        let many: Vec<Validator> = (0..80)
            .map(|i| listed(LISTED, &format!("Baker {i}")))
            .collect();
        assert_eq!(search(&many, "").len(), MAX_RESULTS);
    }

    #[test]
    fn full_unlisted_address_becomes_custom_entry() {
        let found = search(&directory(), UNLISTED);
        assert_eq!(found.len(), 1);
        assert!(found[0].placeholder);
        assert_eq!(found[0].address, UNLISTED);

        assert!(search(&directory(), "tz1short").is_empty());
    }

    #[test]
    fn open_highlights_current_selection() {
        let mut selector = ValidatorSelector::default();
        selector.open(
            Arc::new(directory()),
            Some("tz3RDC3Jdn4j15J7bBHZd29EUee9gVB1CxD9"),
        );
        assert_eq!(
            selector.highlighted().map(|v| v.name.as_str()),
            Some("Beta Stake")
        );
    }

    #[test]
    fn typing_filters_and_enter_selects() {
        let mut selector = ValidatorSelector::default();
        selector.open(Arc::new(directory()), None);

        for c in "alpha".chars() {
            assert!(selector.handle_key_event(key(KeyCode::Char(c))).is_none());
        }
        assert_eq!(selector.query, "alpha");
        assert_eq!(selector.results.len(), 1);

        let Some(Action::SelectValidator(chosen)) = selector.handle_key_event(key(KeyCode::Enter))
        else {
            panic!("expected a selection");
        };
        assert_eq!(chosen.address, LISTED);
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut selector = ValidatorSelector::default();
        selector.open(Arc::new(directory()), None);
        selector.handle_key_event(key(KeyCode::Up));
        assert_eq!(selector.list_state.selected(), Some(0));
        for _ in 0..5 {
            selector.handle_key_event(key(KeyCode::Down));
        }
        assert_eq!(selector.list_state.selected(), Some(1));
    }

    #[test]
    fn pasted_address_is_trimmed() {
        let mut selector = ValidatorSelector::default();
        selector.open(Arc::new(directory()), None);
        selector.paste(&format!("  {UNLISTED}\n"));
        assert_eq!(selector.query, UNLISTED);
        assert!(selector.highlighted().is_some_and(|v| v.placeholder));
    }

    #[test]
    fn escape_closes() {
        let mut selector = ValidatorSelector::default();
        assert!(matches!(
            selector.handle_key_event(key(KeyCode::Esc)),
            Some(Action::CloseSelector)
        ));
    }
}

//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use bakewatch_core::{Dashboard, DashboardState, DataSource};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::{self, capacity, header, selector::ValidatorSelector};

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App<S: DataSource> {
    dashboard: Dashboard<S>,
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    /// Validator picker; `Some` while the overlay is open.
    selector: Option<ValidatorSelector>,
    /// Latest snapshot, for the chrome around the screens.
    state: Arc<DashboardState>,
    terminal_size: (u16, u16),
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Cancels the data bridge task.
    data_cancel: CancellationToken,
    notification: Option<(Notification, Instant)>,
    spinner: ThrobberState,
}

impl<S: DataSource> App<S> {
    pub fn new(dashboard: Dashboard<S>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let mut screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();
        if let Some(screen) = screens.get_mut(&ScreenId::default()) {
            screen.set_focused(true);
        }
        let state = Arc::new(dashboard.snapshot());

        Self {
            dashboard,
            active_screen: ScreenId::default(),
            screens,
            running: true,
            help_visible: false,
            selector: None,
            state,
            terminal_size: (0, 0),
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
            notification: None,
            spinner: ThrobberState::default(),
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));

        let dashboard = self.dashboard.clone();
        let cancel = self.data_cancel.clone();
        let tx = self.action_tx.clone();
        let bridge = tokio::spawn(async move {
            crate::data_bridge::spawn_data_bridge(dashboard, tx, cancel).await;
        });

        let mut events = EventReader::new(
            Duration::from_millis(250), // spinner
            Duration::from_millis(100), // repaint
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Paste(text) => self.handle_paste(&text),
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;
                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        let _ = bridge.await;
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key to an action. Overlays capture input first, then global
    /// keys, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if let Some(selector) = self.selector.as_mut() {
            return Ok(selector.handle_key_event(key));
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char('/' | 's')) => {
                return Ok(Some(Action::OpenSelector));
            }
            (KeyModifiers::NONE, KeyCode::Char('m')) => return Ok(Some(Action::ToggleMetrics)),
            (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(Some(Action::Refresh)),
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let n = c.to_digit(10).and_then(|d| u8::try_from(d).ok());
                if let Some(screen) = n.and_then(ScreenId::from_number) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }
            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    /// A paste lands in the selector, opening it if needed.
    fn handle_paste(&mut self, text: &str) {
        if self.help_visible {
            return;
        }
        let selector = self.selector.get_or_insert_with(|| {
            let mut selector = ValidatorSelector::default();
            selector.open(
                Arc::clone(&self.state.directory),
                self.state.selected_address(),
            );
            selector
        });
        selector.paste(text);
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Resize(w, h) => self.terminal_size = (*w, *h),

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::OpenSelector => {
                let mut selector = ValidatorSelector::default();
                selector.open(
                    Arc::clone(&self.state.directory),
                    self.state.selected_address(),
                );
                self.selector = Some(selector);
            }

            Action::CloseSelector => self.selector = None,

            Action::SelectValidator(validator) => {
                self.selector = None;
                if self.state.selected_address() == Some(validator.address.as_str()) {
                    return Ok(());
                }
                let message = format!("Watching {}", validator.name);
                let dashboard = self.dashboard.clone();
                let validator = (**validator).clone();
                tokio::spawn(async move { dashboard.select(validator).await });
                self.action_tx
                    .send(Action::Notify(Notification::success(message)))?;
            }

            Action::ToggleRound1 => self.dashboard.toggle_round1(),

            Action::ToggleMetrics => self.dashboard.toggle_metrics(),

            Action::Refresh => {
                let dashboard = self.dashboard.clone();
                tokio::spawn(async move { dashboard.refresh().await });
                self.action_tx
                    .send(Action::Notify(Notification::info("Refreshing\u{2026}")))?;
            }

            // Snapshots go to every screen so background tabs stay current
            Action::StateUpdated(state) => {
                self.state = Arc::clone(state);
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            Action::Tick => {
                self.spinner.calc_next();
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            Action::Notify(n) => self.notification = Some((n.clone(), Instant::now())),

            Action::Render => {}
        }

        Ok(())
    }

    // ── Rendering ─────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let capacity_height = match self.state.selected {
            Some(_) if self.state.metrics_expanded => capacity::EXPANDED_HEIGHT,
            Some(_) => capacity::COLLAPSED_HEIGHT,
            None => 0,
        };
        let [header_area, capacity_area, content_area, tab_area, status_area] =
            Layout::vertical([
                Constraint::Length(header::HEIGHT),
                Constraint::Length(capacity_height),
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(area);

        header::render(frame, header_area, &self.state);
        if let Some(ref validator) = self.state.selected {
            capacity::render(frame, capacity_area, validator, self.state.metrics_expanded);
        }

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content_area);
        }

        self.render_tab_bar(frame, tab_area);
        self.render_status_bar(frame, status_area);

        // Overlays, topmost last
        if let Some((ref notif, _)) = self.notification {
            Self::render_notification(frame, area, notif);
        }
        if let Some(ref selector) = self.selector {
            selector.render(frame, area);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", id.number(), id.label()), style))
            })
            .collect();

        let selected = ScreenId::ALL
            .iter()
            .position(|&s| s == self.active_screen)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(selected);
        frame.render_widget(tabs, area);
    }

    /// Activity indicator, last refresh, the deep link, key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let state = &self.state;
        let [indicator_area, text_area] =
            Layout::horizontal([Constraint::Length(12), Constraint::Min(0)]).areas(area);

        if state.loading || state.history_loading {
            let throbber = Throbber::default()
                .label("updating")
                .style(Style::default().fg(theme::SKY))
                .throbber_style(Style::default().fg(theme::TEZOS_BLUE));
            frame.render_stateful_widget(throbber, indicator_area, &mut self.spinner.clone());
        } else {
            let indicator = if state.error.is_some() {
                Span::styled(" ○ error", Style::default().fg(theme::ERROR_RED))
            } else {
                Span::styled(" ● live", Style::default().fg(theme::SUCCESS_GREEN))
            };
            frame.render_widget(Paragraph::new(indicator), indicator_area);
        }

        let mut spans = Vec::new();
        if let Some(at) = state.last_refresh {
            spans.push(Span::styled(
                format!("updated {}", at.with_timezone(&Local).format("%H:%M:%S")),
                theme::label(),
            ));
            spans.push(Span::styled(" │ ", theme::key_hint()));
        }
        if let Some(fragment) = self.dashboard.fragment() {
            spans.push(Span::styled("link ", theme::label()));
            spans.push(Span::styled(
                format!("bakewatch-tui {fragment}"),
                Style::default().fg(theme::SKY),
            ));
            spans.push(Span::styled(" │ ", theme::key_hint()));
        }
        let hints = if self.terminal_size.0 >= 100 || self.terminal_size.0 == 0 {
            "/ validator  f round 1  m metrics  r refresh  ? help  q quit"
        } else {
            "? help  q quit"
        };
        spans.push(Span::styled(hints, theme::key_hint()));
        frame.render_widget(Paragraph::new(Line::from(spans)), text_area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_area = widgets::centered(area, 56, 20);
        frame.render_widget(Clear, help_area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            Line::from(Span::styled(
                format!("  {title}"),
                Style::default().fg(theme::SKY),
            ))
        };
        let key = |keys: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<10}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            section("Navigation"),
            key("1-2", "Jump to screen"),
            key("Tab", "Next screen"),
            key("j/k ↑/↓", "Scroll"),
            key("g/G", "Top / bottom"),
            Line::from(""),
            section("Dashboard"),
            key("/ or s", "Choose validator"),
            key("paste", "Look up a pasted address"),
            key("f", "Toggle round-1 fallback slots"),
            key("m", "Expand / collapse capacity"),
            key("r", "Refresh now"),
            Line::from(""),
            section("Global"),
            key("?", "This help"),
            key("q", "Quit"),
            Line::from(""),
            Line::from(Span::styled("  Esc or ? to close", theme::key_hint())),
        ];
        frame.render_widget(Paragraph::new(help_text), inner);
    }

    /// Toast in the bottom-right corner, above the status bar.
    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
        let height = 3u16.min(area.height);

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2);
        let toast_area = Rect::new(area.x + x, area.y + y, width, height);

        let (color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
            NotificationLevel::Info => (theme::SKY, "·"),
        };

        frame.render_widget(Clear, toast_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(theme::BG_DARK));
        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(color)),
            Span::styled(notif.message.as_str(), Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), toast_area);
    }
}

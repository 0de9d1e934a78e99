//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use bakewatch_core::{DashboardState, Validator};

use crate::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
}

/// A short-lived toast.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ──
    SwitchScreen(ScreenId),
    ToggleHelp,
    OpenSelector,
    CloseSelector,

    // ── Dashboard commands ──
    SelectValidator(Box<Validator>),
    ToggleRound1,
    ToggleMetrics,
    Refresh,

    // ── Data ──
    /// A new snapshot was published by the dashboard.
    StateUpdated(Arc<DashboardState>),

    Notify(Notification),
}

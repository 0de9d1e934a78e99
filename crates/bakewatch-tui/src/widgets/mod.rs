//! Reusable rendering helpers shared by the app chrome and screens.

pub mod capacity;
pub mod header;
pub mod selector;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Centered rectangle of at most `width` x `height` inside `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

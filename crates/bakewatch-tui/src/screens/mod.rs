//! Screen implementations. Each screen is a top-level Component.

pub mod history;
pub mod rights;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components for the tab bar.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Rights, Box::new(rights::RightsScreen::new())),
        (ScreenId::History, Box::new(history::HistoryScreen::new())),
    ]
}

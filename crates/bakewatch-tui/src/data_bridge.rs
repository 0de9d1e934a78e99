//! Data bridge: connects the [`Dashboard`] state channel to TUI actions.
//!
//! Runs as a background task. Starts the dashboard (directory load,
//! initial selection, polling), then forwards every published snapshot as
//! [`Action::StateUpdated`] until cancelled.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use bakewatch_core::{Dashboard, DataSource};

use crate::action::Action;

pub async fn spawn_data_bridge<S: DataSource>(
    dashboard: Dashboard<S>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut state = dashboard.subscribe();

    // Initial snapshot so the first frame shows the loading state
    let initial = Arc::new(state.borrow_and_update().clone());
    let _ = action_tx.send(Action::StateUpdated(initial));

    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            dashboard.shutdown().await;
            return;
        }
        () = dashboard.start() => {}
    }

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = Arc::new(state.borrow_and_update().clone());
                if action_tx.send(Action::StateUpdated(snapshot)).is_err() {
                    break;
                }
            }
        }
    }

    dashboard.shutdown().await;
    debug!("data bridge shut down");
}

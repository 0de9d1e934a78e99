//! Live mode: run the dashboard's poll loop and print a line per update.

use chrono::Local;

use bakewatch_core::{ApiSource, Dashboard, DashboardState, RoundFilter, ViewModel};

use crate::cli::{GlobalOpts, RightsArgs};
use crate::error::CliError;
use crate::output::Printer;

use super::rights::{self, RightsReport};

/// Identity of a poll outcome; ticks alone don't change it.
fn poll_key(state: &DashboardState) -> (u64, Option<i64>, Option<String>) {
    (
        state.generation,
        state.last_refresh.map(|t| t.timestamp_millis()),
        state.error.clone(),
    )
}

fn status_line(state: &DashboardState, filter: Option<RoundFilter>) -> Option<String> {
    let stamp = Local::now().format("%H:%M:%S");
    if let Some(ref err) = state.error {
        return Some(format!("[{stamp}] error: {err}"));
    }
    if state.loading {
        return None;
    }
    let mut state = state.clone();
    if let Some(filter) = filter {
        state.round_filter = filter;
    }
    let view = ViewModel::derive(&state);
    let report = RightsReport::build(&state, &view)?;
    Some(format!("[{stamp}] {}", rights::summary_line(&report)))
}

pub async fn handle(
    dashboard: &Dashboard<ApiSource>,
    args: &RightsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let filter = args.show_round1().map(RoundFilter::from_show_round1);
    let mut rx = dashboard.subscribe();
    dashboard.start().await;

    // A deep link to an unlisted address falls back on start; select it
    // explicitly so `--baker` always wins.
    if let Some(ref baker) = global.baker {
        if dashboard.snapshot().selected_address() != Some(baker.trim()) {
            dashboard.select_address(baker).await?;
        }
    }

    let printer = Printer::new(global);
    if let Some(baker) = dashboard.snapshot().selected {
        printer.line(&printer.heading(&rights::baker_line(&baker)));
    }

    let mut last = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                let key = poll_key(&state);
                if last.as_ref() == Some(&key) {
                    continue;
                }
                if let Some(line) = status_line(&state, filter) {
                    last = Some(key);
                    printer.line(&line);
                }
            }
        }
    }

    dashboard.shutdown().await;
    Ok(())
}

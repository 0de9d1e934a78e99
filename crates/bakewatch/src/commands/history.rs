//! Recent baking history.

use chrono::{DateTime, Utc};
use tabled::Tabled;

use bakewatch_core::format::{format_duration, group_thousands};
use bakewatch_core::{ApiSource, Dashboard, Right};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, Printer};

pub const EMPTY: &str = "No recent rights found";

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Cycle")]
    cycle: i64,
    #[tabled(rename = "Round")]
    round: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "When")]
    when: String,
}

impl HistoryRow {
    fn new(right: &Right, now: DateTime<Utc>, color: bool) -> Self {
        Self {
            level: group_thousands(right.level),
            cycle: right.cycle,
            round: right.round.map_or_else(|| "-".into(), |r| r.to_string()),
            status: output::status_label(right.status.as_ref(), color),
            when: format!("{} ago", format_duration(right.elapsed_since(now))),
        }
    }
}

/// `"Baked 18 · Missed 2"` over the loaded rights.
pub fn tally(rights: &[Right]) -> String {
    let baked = rights.iter().filter(|r| r.is_realized()).count();
    let missed = rights.iter().filter(|r| r.is_missed()).count();
    format!("Baked {baked} · Missed {missed}")
}

pub async fn handle(dashboard: &Dashboard<ApiSource>, global: &GlobalOpts) -> Result<(), CliError> {
    let state = dashboard.load_once(global.baker.as_deref()).await?;
    let rights: &[Right] = &state.past;
    let printer = Printer::new(global);

    if printer.is_table() {
        if let Some(ref baker) = state.selected {
            printer.line(&printer.heading(&super::rights::baker_line(baker)));
        }
        if rights.is_empty() {
            printer.line(EMPTY);
            return Ok(());
        }
        printer.line(&tally(rights));
    }

    printer.list(
        rights,
        |r| HistoryRow::new(r, state.now, printer.color),
        |r| r.level.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use bakewatch_core::{RightKind, RightStatus};
    use chrono::TimeZone;

    use super::*;

    fn past(level: i64, status: RightStatus) -> Right {
        Right {
            cycle: 900,
            level,
            timestamp: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).single().unwrap_or_default(),
            kind: RightKind::Baking,
            round: Some(0),
            status: Some(status),
        }
    }

    #[test]
    fn tally_counts_outcomes() {
        let rights = [
            past(3, RightStatus::Realized),
            past(2, RightStatus::MissedBaking),
            past(1, RightStatus::Realized),
            past(0, RightStatus::Future),
        ];
        assert_eq!(tally(&rights), "Baked 2 · Missed 1");
    }
}

//! Upcoming rights: summary bar plus one table per cycle.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use bakewatch_core::format::{format_duration, format_opt_duration, group_thousands};
use bakewatch_core::{
    ApiSource, Dashboard, DashboardState, Right, RoundFilter, Validator, ViewModel,
};

use crate::cli::{GlobalOpts, RightsArgs};
use crate::error::CliError;
use crate::output::{self, Printer};

pub const EMPTY_FILTERED: &str = "No upcoming baking rights in loaded range";
pub const EMPTY_RAW: &str = "No upcoming rights detected";

// ── Report ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RightsReport<'a> {
    pub baker: &'a Validator,
    pub chain_level: Option<i64>,
    pub show_round1: bool,
    pub slots: usize,
    pub cycles: usize,
    pub next_level: Option<i64>,
    pub time_to_next_ms: Option<i64>,
    pub horizon_ms: i64,
    pub groups: Vec<CycleReport<'a>>,
    #[serde(skip)]
    has_raw_rights: bool,
    #[serde(skip)]
    now: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CycleReport<'a> {
    pub cycle: i64,
    pub end_level: Option<i64>,
    pub estimated_end: Option<DateTime<Utc>>,
    pub rights: Vec<&'a Right>,
}

impl<'a> RightsReport<'a> {
    /// `None` when no validator is selected.
    pub fn build(state: &'a DashboardState, view: &ViewModel<'a>) -> Option<Self> {
        let baker = state.selected.as_ref()?;
        Some(Self {
            baker,
            chain_level: state.chain_level,
            show_round1: state.round_filter.shows_round1(),
            slots: view.slot_count(),
            cycles: view.cycle_count(),
            next_level: view.next.map(|r| r.level),
            time_to_next_ms: view.time_to_next.map(|d| d.num_milliseconds()),
            horizon_ms: view.horizon.num_milliseconds(),
            groups: view
                .groups
                .iter()
                .map(|g| CycleReport {
                    cycle: g.cycle,
                    end_level: g.info.map(|c| c.last_level),
                    estimated_end: g.info.map(|c| c.end_time),
                    rights: g.rights.clone(),
                })
                .collect(),
            has_raw_rights: view.has_raw_rights,
            now: state.now,
        })
    }
}

// ── Table rendering ─────────────────────────────────────────────────

#[derive(Tabled)]
struct RightRow {
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Round")]
    round: String,
    #[tabled(rename = "Time (UTC)")]
    time: String,
    #[tabled(rename = "In")]
    countdown: String,
}

impl RightRow {
    fn new(right: &Right, now: DateTime<Utc>) -> Self {
        Self {
            level: group_thousands(right.level),
            round: right.round.map_or_else(|| "-".into(), |r| r.to_string()),
            time: right.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            countdown: format_duration(right.time_until(now)),
        }
    }
}

pub fn baker_line(baker: &Validator) -> String {
    format!("{} ({}) · {}", baker.name, baker.address, baker.status)
}

/// Single-line summary shared with `watch`.
pub fn summary_line(report: &RightsReport<'_>) -> String {
    format!(
        "Baking Slots {} │ Cycles {} │ Next Block {} │ Horizon {} │ Chain Height {}",
        report.slots,
        report.cycles,
        format_opt_duration(report.time_to_next_ms.map(chrono::TimeDelta::milliseconds)),
        format_duration(chrono::TimeDelta::milliseconds(report.horizon_ms)),
        report
            .chain_level
            .map_or_else(|| "-".into(), group_thousands),
    )
}

fn detail(report: &RightsReport<'_>, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", output::heading(&baker_line(report.baker), color));
    let _ = writeln!(out, "{}", summary_line(report));
    if report.show_round1 {
        let _ = writeln!(out, "Including round-1 fallback slots");
    }

    if report.groups.is_empty() {
        let _ = writeln!(out);
        let empty = if report.has_raw_rights {
            EMPTY_FILTERED
        } else {
            EMPTY_RAW
        };
        let _ = write!(out, "{empty}");
        return out;
    }

    for group in &report.groups {
        let _ = writeln!(out);
        let mut title = format!("Cycle {}", group.cycle);
        if let Some(end) = group.end_level {
            let _ = write!(title, " · End level {}", group_thousands(end));
        }
        if let Some(at) = group.estimated_end {
            let _ = write!(title, " · Est. end {}", at.format("%Y-%m-%d %H:%M UTC"));
        }
        let _ = writeln!(out, "{}", output::heading(&title, color));
        let rows: Vec<RightRow> = group
            .rights
            .iter()
            .map(|r| RightRow::new(r, report.now))
            .collect();
        let _ = writeln!(out, "{}", output::render_table(&rows));
    }
    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard<ApiSource>,
    args: &RightsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut state = dashboard.load_once(global.baker.as_deref()).await?;
    if let Some(show) = args.show_round1() {
        state.round_filter = RoundFilter::from_show_round1(show);
    }

    let view = ViewModel::derive(&state);
    let Some(report) = RightsReport::build(&state, &view) else {
        return Ok(());
    };
    let printer = Printer::new(global);
    printer.report(
        &report,
        |r| detail(r, printer.color),
        |r| {
            r.groups
                .iter()
                .flat_map(|g| g.rights.iter().map(|right| right.level.to_string()))
                .collect::<Vec<_>>()
                .join("\n")
        },
    )
}

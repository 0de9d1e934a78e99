//! Recent cycles.

use tabled::Tabled;

use bakewatch_core::format::group_thousands;
use bakewatch_core::{ApiSource, Cycle, Dashboard, DataSource};

use crate::cli::{CyclesArgs, GlobalOpts};
use crate::error::CliError;
use crate::output::Printer;

#[derive(Tabled)]
struct CycleRow {
    #[tabled(rename = "Cycle")]
    index: i64,
    #[tabled(rename = "First Level")]
    first_level: String,
    #[tabled(rename = "Last Level")]
    last_level: String,
    #[tabled(rename = "Start (UTC)")]
    start: String,
    #[tabled(rename = "End (UTC)")]
    end: String,
    #[tabled(rename = "Bakers")]
    bakers: i64,
}

impl CycleRow {
    fn new(c: &Cycle) -> Self {
        Self {
            index: c.index,
            first_level: group_thousands(c.first_level),
            last_level: group_thousands(c.last_level),
            start: c.start_time.format("%Y-%m-%d %H:%M").to_string(),
            end: c.end_time.format("%Y-%m-%d %H:%M").to_string(),
            bakers: c.total_bakers,
        }
    }
}

pub async fn handle(
    dashboard: &Dashboard<ApiSource>,
    args: &CyclesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let cycles = dashboard.source().cycles(args.limit).await?;
    Printer::new(global).list(&cycles, CycleRow::new, |c| c.index.to_string())
}

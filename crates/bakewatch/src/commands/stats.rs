//! Validator profile: balances, stake breakdown and capacity terms.

use std::fmt::Write as _;

use owo_colors::OwoColorize;
use serde::Serialize;

use bakewatch_core::format::{format_ratio, format_tez};
use bakewatch_core::{ApiSource, CapacityProfile, Dashboard, ExtendedStats, Validator};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, Printer};

#[derive(Debug, Serialize)]
pub struct StatsReport<'a> {
    pub validator: &'a Validator,
    pub stats: Option<&'a ExtendedStats>,
    pub explorer_url: String,
    pub analysis_url: String,
}

fn row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {label:<20} {value}");
}

fn balances(out: &mut String, stats: &ExtendedStats) {
    row(out, "Total", &format!("{} ꜩ", format_tez(stats.balance_tez())));
    row(out, "Own Stake", &format!("{} ꜩ", format_tez(stats.own_staked_tez())));
    row(
        out,
        "External Stake",
        &format!("{} ꜩ", format_tez(stats.external_staked_tez())),
    );
    row(out, "Stakers", &stats.stakers_count.to_string());
    if stats.unstaked_balance > 0 {
        row(
            out,
            "Own Unstaked",
            &format!("{} ꜩ", format_tez(stats.own_unstaked_tez())),
        );
    }
    if stats.external_unstaked_balance > 0 {
        row(
            out,
            "External Unstaked",
            &format!("{} ꜩ", format_tez(stats.external_unstaked_tez())),
        );
    }
    row(
        out,
        "Delegated Amount",
        &format!("{} ꜩ", format_tez(stats.delegated_tez())),
    );
}

fn capacity(out: &mut String, title: &str, profile: &CapacityProfile, color: bool) {
    let badge = if profile.enabled { "active" } else { "disabled" };
    let _ = writeln!(out, "{}", output::heading(&format!("{title} ({badge})"), color));
    row(out, "Fee", &format_ratio(profile.fee));
    row(out, "APY", &format_ratio(profile.estimated_apy));
    let free = format!("{} ꜩ", format_tez(profile.free_space));
    let free = if color && profile.is_over_capacity() {
        free.red().to_string()
    } else {
        free
    };
    row(out, "Free Space", &free);
    row(out, "Capacity", &format!("{} ꜩ", format_tez(profile.capacity)));
    if profile.min_balance > 0.0 {
        row(out, "Minimum", &format!("{} ꜩ", format_tez(profile.min_balance)));
    }
}

fn detail(report: &StatsReport<'_>, color: bool) -> String {
    let v = report.validator;
    let mut out = String::new();
    let _ = writeln!(out, "{}", output::heading(&super::rights::baker_line(v), color));
    row(&mut out, "Explorer", &report.explorer_url);
    row(&mut out, "Analysis", &report.analysis_url);

    if let Some(stats) = report.stats {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", output::heading("Balances", color));
        balances(&mut out, stats);
    }

    // Capacity terms only exist for listed validators.
    if !v.placeholder {
        let _ = writeln!(out);
        capacity(&mut out, "Staking", &v.staking, color);
        let _ = writeln!(out);
        capacity(&mut out, "Delegation", &v.delegation, color);
    }
    out.trim_end().to_owned()
}

pub async fn handle(dashboard: &Dashboard<ApiSource>, global: &GlobalOpts) -> Result<(), CliError> {
    let state = dashboard.load_once(global.baker.as_deref()).await?;
    let Some(ref validator) = state.selected else {
        return Ok(());
    };
    let report = StatsReport {
        validator,
        stats: state.stats.as_ref(),
        explorer_url: validator.explorer_url(),
        analysis_url: validator.analysis_url(),
    };

    let printer = Printer::new(global);
    printer.report(
        &report,
        |r| detail(r, printer.color),
        |r| r.validator.address.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_hides_capacity_sections() {
        let v = Validator::placeholder("tz1T1fRJmpPp1pN2z45sivxdbKNQtyatzCVx");
        let report = StatsReport {
            validator: &v,
            stats: None,
            explorer_url: v.explorer_url(),
            analysis_url: v.analysis_url(),
        };
        let text = detail(&report, false);
        assert!(text.contains("Unknown Baker"));
        assert!(!text.contains("Delegation"));
    }

    #[test]
    fn unstaked_rows_only_when_positive() {
        let stats = ExtendedStats {
            balance: 12_345_000_000,
            staked_balance: 10_000_000_000,
            unstaked_balance: 0,
            external_unstaked_balance: 5_000_000,
            ..ExtendedStats::default()
        };
        let mut out = String::new();
        balances(&mut out, &stats);
        assert!(out.contains("12,345 ꜩ"));
        assert!(!out.contains("Own Unstaked"));
        assert!(out.contains("External Unstaked"));
    }
}

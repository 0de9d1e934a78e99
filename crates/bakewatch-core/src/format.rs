// ── Display formatting ──
//
// Pure helpers shared by the CLI and TUI for countdowns, tez amounts,
// ratios and chain levels.

use chrono::TimeDelta;

/// Rendered in place of an unavailable duration.
pub const PLACEHOLDER: &str = "--";

/// Format a millisecond duration as `"{d}d {h}h {m}m"`, `"{h}h {m}m"` or
/// `"{m}m {s}s"`, flooring at each unit. Non-positive input yields `"--"`.
pub fn format_duration_ms(ms: i64) -> String {
    if ms <= 0 {
        return PLACEHOLDER.to_owned();
    }
    let seconds = ms / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{days}d {}h {}m", hours % 24, minutes % 60)
    } else if hours > 0 {
        format!("{hours}h {}m", minutes % 60)
    } else {
        format!("{minutes}m {}s", seconds % 60)
    }
}

pub fn format_duration(delta: TimeDelta) -> String {
    format_duration_ms(delta.num_milliseconds())
}

/// Optional duration; `None` renders as the placeholder.
pub fn format_opt_duration(delta: Option<TimeDelta>) -> String {
    delta.map_or_else(|| PLACEHOLDER.to_owned(), format_duration)
}

/// Group an integer's digits with commas: `8123456` → `"8,123,456"`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole tez, floored, with thousands separators: `12345.9` → `"12,345"`.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn format_tez(tez: f64) -> String {
    group_thousands(tez.floor() as i64)
}

/// A 0..1 ratio as a percentage with two decimals: `0.05` → `"5.00%"`.
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

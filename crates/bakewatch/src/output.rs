//! Rendering for `--output` and `--color`.
//!
//! Every command prints through a [`Printer`]. Tables come from `tabled`,
//! the structured formats from serde, and `plain` prints one identifier per
//! line for scripting.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use bakewatch_core::RightStatus;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Right outcome label: green when baked, red when missed.
pub fn status_label(status: Option<&RightStatus>, color: bool) -> String {
    let Some(status) = status else {
        return "-".into();
    };
    let label = status.label();
    match status {
        _ if !color => label.to_owned(),
        RightStatus::Realized => label.green().to_string(),
        s if s.is_missed() => label.red().to_string(),
        _ => label.dimmed().to_string(),
    }
}

pub fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().to_string()
    } else {
        text.to_owned()
    }
}

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Serialize for the serde-backed formats. `None` for table and plain,
/// which each command renders itself.
pub fn encode<T: Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
) -> Result<Option<String>, CliError> {
    let encoded = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data).map_err(encode_error)?,
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(encode_error)?,
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(encode_error)?,
        OutputFormat::Table | OutputFormat::Plain => return Ok(None),
    };
    Ok(Some(encoded))
}

fn encode_error(e: impl std::fmt::Display) -> CliError {
    CliError::Internal {
        message: format!("cannot serialize output: {e}"),
    }
}

/// List output: one `Tabled` row per item, or one `id` per line.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    if let Some(encoded) = encode(format, data)? {
        return Ok(encoded);
    }
    Ok(match format {
        OutputFormat::Plain => data.iter().map(id).collect::<Vec<_>>().join("\n"),
        _ => render_table(&data.iter().map(to_row).collect::<Vec<_>>()),
    })
}

/// Output settings resolved once from the global flags.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    pub format: OutputFormat,
    pub color: bool,
    quiet: bool,
}

impl Printer {
    pub fn new(global: &GlobalOpts) -> Self {
        Self {
            format: global.output,
            color: should_color(global.color),
            quiet: global.quiet,
        }
    }

    /// Human-readable table output, where headings and notes make sense.
    pub fn is_table(&self) -> bool {
        self.format == OutputFormat::Table
    }

    pub fn heading(&self, text: &str) -> String {
        heading(text, self.color)
    }

    /// Print to stdout unless quiet. Empty text prints nothing.
    pub fn line(&self, text: &str) {
        if self.quiet || text.is_empty() {
            return;
        }
        let _ = writeln!(io::stdout().lock(), "{text}");
    }

    pub fn list<T, R>(
        &self,
        data: &[T],
        to_row: impl Fn(&T) -> R,
        id: impl Fn(&T) -> String,
    ) -> Result<(), CliError>
    where
        T: Serialize,
        R: Tabled,
    {
        self.line(&render_list(self.format, data, to_row, id)?);
        Ok(())
    }

    /// Report output: `detail` renders the table view, `id` the plain one.
    pub fn report<T: Serialize>(
        &self,
        data: &T,
        detail: impl FnOnce(&T) -> String,
        id: impl FnOnce(&T) -> String,
    ) -> Result<(), CliError> {
        let out = match (encode(self.format, data)?, self.format) {
            (Some(encoded), _) => encoded,
            (None, OutputFormat::Plain) => id(data),
            (None, _) => detail(data),
        };
        self.line(&out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, Tabled)]
    struct Row {
        #[tabled(rename = "Level")]
        level: i64,
        #[tabled(rename = "Cycle")]
        cycle: i64,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                level: 8_000_010,
                cycle: 900,
            },
            Row {
                level: 8_000_020,
                cycle: 900,
            },
        ]
    }

    fn copy(r: &Row) -> Row {
        Row {
            level: r.level,
            cycle: r.cycle,
        }
    }

    fn level(r: &Row) -> String {
        r.level.to_string()
    }

    #[test]
    fn table_uses_rounded_style() {
        let out = render_list(OutputFormat::Table, &rows(), copy, level).expect("render");
        insta::assert_snapshot!(out, @r"
        ╭─────────┬───────╮
        │ Level   │ Cycle │
        ├─────────┼───────┤
        │ 8000010 │ 900   │
        │ 8000020 │ 900   │
        ╰─────────┴───────╯
        ");
    }

    #[test]
    fn plain_emits_one_value_per_line() {
        let out = render_list(OutputFormat::Plain, &rows(), copy, level).expect("render");
        assert_eq!(out, "8000010\n8000020");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_list(OutputFormat::JsonCompact, &rows(), copy, level).expect("render");
        assert_eq!(
            out,
            r#"[{"level":8000010,"cycle":900},{"level":8000020,"cycle":900}]"#
        );
    }

    #[test]
    fn table_and_plain_are_not_encoded() {
        assert!(encode(OutputFormat::Table, &rows()).expect("encode").is_none());
        assert!(encode(OutputFormat::Plain, &rows()).expect("encode").is_none());
        let yaml = encode(OutputFormat::Yaml, &rows()).expect("encode");
        assert!(yaml.is_some_and(|y| y.contains("level: 8000010")));
    }

    #[test]
    fn status_label_without_color_is_plain() {
        assert_eq!(status_label(Some(&RightStatus::Realized), false), "Baked");
        assert_eq!(status_label(Some(&RightStatus::MissedBaking), false), "Missed");
        assert_eq!(status_label(None, false), "-");
    }
}

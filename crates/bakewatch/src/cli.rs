//! Clap derive structures for the `bakewatch` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// bakewatch -- upcoming baking rights for Tezos validators
#[derive(Debug, Parser)]
#[command(
    name = "bakewatch",
    version,
    about = "Track upcoming Tezos baking rights from the command line",
    long_about = "Shows upcoming baking rights for a Tezos validator, grouped by cycle,\n\
        along with recent baking history, staking capacity and balances.\n\n\
        Data comes from the TzKT indexer and the Baking Bad baker directory.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Validator address (tz1/tz2/tz3/KT1). Defaults to the saved or configured baker
    #[arg(long, short = 'b', env = "BAKEWATCH_BAKER", global = true)]
    pub baker: Option<String>,

    /// Path to the config file
    #[arg(long, env = "BAKEWATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Chain indexer URL (overrides config)
    #[arg(long, global = true)]
    pub chain_url: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BAKEWATCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upcoming baking rights grouped by cycle
    #[command(alias = "r")]
    Rights(RightsArgs),

    /// Recent past baking rights and their outcome
    #[command(alias = "h")]
    History,

    /// Validator profile, balances and capacity
    #[command(alias = "s")]
    Stats,

    /// Search the validator directory
    #[command(alias = "b")]
    Bakers(BakersArgs),

    /// Recent cycles with level ranges and times
    Cycles(CyclesArgs),

    /// Keep polling and print a status line on every update
    #[command(alias = "w")]
    Watch(RightsArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Rights ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RightsArgs {
    /// Include round-1 fallback slots ("maybe I'm lucky")
    #[arg(long = "round1", short = '1', overrides_with = "primary_only")]
    pub round1: bool,

    /// Only primary (round-0) slots, ignoring the saved preference
    #[arg(long, overrides_with = "round1")]
    pub primary_only: bool,
}

impl RightsArgs {
    /// Explicit flag choice, or `None` to use the saved preference.
    pub fn show_round1(&self) -> Option<bool> {
        if self.round1 {
            Some(true)
        } else if self.primary_only {
            Some(false)
        } else {
            None
        }
    }
}

// ── Bakers ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BakersArgs {
    /// Case-insensitive match on name or address
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "50")]
    pub limit: usize,
}

// ── Cycles ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CyclesArgs {
    /// Number of most recent cycles to show
    #[arg(long, short = 'l', default_value = "10")]
    pub limit: u32,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn round_flags_resolve() {
        let cli = Cli::parse_from(["bakewatch", "rights", "--round1"]);
        let Command::Rights(args) = cli.command else {
            panic!("expected rights");
        };
        assert_eq!(args.show_round1(), Some(true));

        let cli = Cli::parse_from(["bakewatch", "rights"]);
        let Command::Rights(args) = cli.command else {
            panic!("expected rights");
        };
        assert_eq!(args.show_round1(), None);
    }
}

//! Config subcommand handlers.

use bakewatch_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output::{self, Printer};

/// Structured formats as requested; TOML (the on-disk form) otherwise.
fn render_config(cfg: &Config, format: OutputFormat) -> Result<String, CliError> {
    if let Some(encoded) = output::encode(format, cfg)? {
        return Ok(encoded);
    }
    toml::to_string_pretty(cfg).map_err(|e| CliError::Internal {
        message: format!("cannot render config: {e}"),
    })
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global);
    let printer = Printer::new(global);

    match args.command {
        ConfigCommand::Path => {
            printer.line(&path.display().to_string());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config(global)?;
            // Surface validation problems alongside the raw values.
            if let Err(e) = cfg.to_dashboard_config() {
                tracing::warn!(error = %e, "configuration is invalid");
            }
            printer.line(&render_config(&cfg, global.output)?);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            bakewatch_config::save_config_to(&Config::default(), &path)?;
            if !global.quiet {
                eprintln!("Config written to {}", path.display());
            }
            Ok(())
        }
    }
}

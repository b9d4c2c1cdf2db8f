//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

fn serialization_err(e: impl std::fmt::Display) -> CliError {
    CliError::Config {
        message: format!("failed to serialize config: {e}"),
    }
}

fn render_config(cfg: &Config, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(cfg).map_err(serialization_err),
        OutputFormat::JsonCompact => serde_json::to_string(cfg).map_err(serialization_err),
        OutputFormat::Yaml => serde_yaml::to_string(cfg).map_err(serialization_err),
        OutputFormat::Table | OutputFormat::Plain => {
            toml::to_string_pretty(cfg).map_err(serialization_err)
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_file(global);

    match args.command {
        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            config::save_config_to(&Config::default(), &path)?;
            if !global.quiet {
                eprintln!("✓ Configuration written to {}", path.display());
                eprintln!("  Add a site alias: siteview config set-site docs docs.example.com");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let format = config::output_format(&cfg, global)?;
            output::print_output(&render_config(&cfg, format)?, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        // ── Site aliases ────────────────────────────────────────────
        ConfigCommand::SetSite { name, url } => {
            let mut cfg = config::load_config_file(&path)?;
            cfg.set_site(&name, &url)?;
            config::save_config_to(&cfg, &path)?;
            if !global.quiet {
                eprintln!("✓ Site '{}' now points to {}", name.trim(), url.trim());
            }
            Ok(())
        }

        ConfigCommand::RemoveSite { name } => {
            let mut cfg = config::load_config_file(&path)?;
            let url = cfg.remove_site(&name)?;
            config::save_config_to(&cfg, &path)?;
            if !global.quiet {
                eprintln!("✓ Removed site '{name}' ({url})");
            }
            Ok(())
        }
    }
}

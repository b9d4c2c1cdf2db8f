//! CLI configuration: a thin wrapper around `siteview_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--config, --timeout, --insecure, --output, ...).

use std::path::PathBuf;
use std::time::Duration;

use siteview_core::{AnalyzerConfig, TlsVerification};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use siteview_config::{Config, load_config_file, save_config_to};

// ── File location ───────────────────────────────────────────────────

/// Config file in effect: `--config` / `SITEVIEW_CONFIG`, else the
/// platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(siteview_config::config_path)
}

/// Load the config file in effect, layered with `SITEVIEW_*` variables.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = config_file(global);
    tracing::debug!(path = %path.display(), "loading config");
    Ok(siteview_config::load_config_from(&path)?)
}

// ── Overrides ───────────────────────────────────────────────────────

/// Translate config defaults plus global flags into an `AnalyzerConfig`.
///
/// Flags take priority over file values.
pub fn analyzer_config(cfg: &Config, global: &GlobalOpts) -> Result<AnalyzerConfig, CliError> {
    let mut config = siteview_config::to_analyzer_config(&cfg.defaults)?;

    if let Some(secs) = global.timeout {
        if secs == 0 {
            return Err(CliError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        config.timeout = Duration::from_secs(secs);
    }
    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(ref agent) = global.user_agent {
        config.user_agent.clone_from(agent);
    }
    Ok(config)
}

/// Output format: flag > config `defaults.output` > table.
pub fn output_format(cfg: &Config, global: &GlobalOpts) -> Result<OutputFormat, CliError> {
    if let Some(format) = global.output {
        return Ok(format);
    }
    OutputFormat::ALL
        .into_iter()
        .find(|f| f.tag() == cfg.defaults.output)
        .ok_or_else(|| CliError::Validation {
            field: "defaults.output".into(),
            reason: format!(
                "expected one of table, json, json-compact, yaml, plain; got '{}'",
                cfg.defaults.output
            ),
        })
}

/// Color mode: flag > config `defaults.color` > auto.
pub fn color_mode(cfg: &Config, global: &GlobalOpts) -> Result<ColorMode, CliError> {
    if let Some(mode) = global.color {
        return Ok(mode);
    }
    match cfg.defaults.color.as_str() {
        "auto" => Ok(ColorMode::Auto),
        "always" => Ok(ColorMode::Always),
        "never" => Ok(ColorMode::Never),
        other => Err(CliError::Validation {
            field: "defaults.color".into(),
            reason: format!("expected auto, always or never; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["siteview"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["normalize", "example.com"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_file_defaults() {
        let mut cfg = Config::default();
        cfg.defaults.timeout = 10;
        cfg.defaults.output = "yaml".into();

        let opts = global(&["--timeout", "3", "-k", "-o", "plain"]);
        let analyzer = analyzer_config(&cfg, &opts).unwrap();

        assert_eq!(analyzer.timeout, Duration::from_secs(3));
        assert_eq!(analyzer.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(output_format(&cfg, &opts).unwrap(), OutputFormat::Plain);
    }

    #[test]
    fn file_defaults_apply_without_flags() {
        let mut cfg = Config::default();
        cfg.defaults.output = "json-compact".into();
        cfg.defaults.color = "never".into();

        let opts = global(&[]);
        assert_eq!(output_format(&cfg, &opts).unwrap(), OutputFormat::JsonCompact);
        assert_eq!(color_mode(&cfg, &opts).unwrap(), ColorMode::Never);
    }

    #[test]
    fn unknown_output_in_file_is_rejected() {
        let mut cfg = Config::default();
        cfg.defaults.output = "html".into();
        assert!(output_format(&cfg, &global(&[])).is_err());
    }

    #[test]
    fn zero_timeout_flag_is_rejected() {
        let err = analyzer_config(&Config::default(), &global(&["--timeout", "0"])).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }
}

//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use siteview_config::ConfigError;
use siteview_core::{CoreError, NormalizationError, ValidationError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const INVALID_MANIFEST: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid URL: {reason}")]
    #[diagnostic(
        code(siteview::invalid_url),
        help(
            "Pass a host name or an http(s) URL, e.g. `siteview analyze example.com`.\n\
             Configured aliases are listed by `siteview config show`."
        )
    )]
    InvalidUrl { reason: String },

    // ── Network ──────────────────────────────────────────────────────
    #[error("Could not fetch site.json: {url} has no manifest (HTTP 404)")]
    #[diagnostic(
        code(siteview::manifest_not_found),
        help("The site is reachable but does not publish a site.json at that path.")
    )]
    ManifestNotFound { url: String },

    #[error("Could not fetch site.json: {url}: {reason}")]
    #[diagnostic(
        code(siteview::fetch_failed),
        help(
            "Check that the site is reachable from this machine.\n\
             For self-signed certificates use --insecure (-k) or set ca_cert in the config."
        )
    )]
    FetchFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(siteview::timeout),
        help("Increase the timeout with --timeout or `timeout` in the config file.")
    )]
    Timeout { seconds: u64 },

    // ── Manifest ─────────────────────────────────────────────────────
    #[error("Invalid site.json format: {reason}")]
    #[diagnostic(
        code(siteview::invalid_manifest),
        help("A manifest needs a `metadata` object and an `items` array at the top level.")
    )]
    InvalidManifest { reason: String },

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Analysis of {url} was superseded by a newer request")]
    #[diagnostic(code(siteview::superseded))]
    Superseded { url: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(siteview::validation))]
    Validation { field: String, reason: String },

    #[error("No site alias named '{name}'")]
    #[diagnostic(
        code(siteview::unknown_site),
        help("List aliases with: siteview config show")
    )]
    UnknownSite { name: String },

    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(siteview::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error("{message}")]
    #[diagnostic(code(siteview::config))]
    Config { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(siteview::io))]
    Io(#[from] std::io::Error),

    #[error("File is not valid JSON: {0}")]
    #[diagnostic(
        code(siteview::json),
        help("Check the file contents and try again.")
    )]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidUrl { .. } | Self::Validation { .. } => exit_code::USAGE,
            Self::ManifestNotFound { .. } | Self::UnknownSite { .. } => exit_code::NOT_FOUND,
            Self::FetchFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::InvalidManifest { .. } | Self::Json(_) => exit_code::INVALID_MANIFEST,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Normalization(e) => CliError::InvalidUrl {
                reason: match e {
                    NormalizationError::Empty => NormalizationError::Empty.to_string(),
                    NormalizationError::Malformed { input, reason } => {
                        format!("'{input}': {reason}")
                    }
                },
            },

            CoreError::FetchFailed {
                url,
                status: Some(404),
                ..
            } => CliError::ManifestNotFound { url },

            CoreError::FetchFailed { url, reason, .. } => CliError::FetchFailed { url, reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Validation(ValidationError::InvalidShape { reason }) => {
                CliError::InvalidManifest { reason }
            }

            CoreError::Superseded { url } => CliError::Superseded { url },

            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownSite { name } => CliError::UnknownSite { name },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_manifest_has_its_own_exit_code() {
        let err = CliError::from(CoreError::FetchFailed {
            url: "https://example.com/site.json".into(),
            reason: "server answered HTTP 404".into(),
            status: Some(404),
        });
        assert!(matches!(err, CliError::ManifestNotFound { .. }));
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn other_statuses_are_connection_failures() {
        let err = CliError::from(CoreError::FetchFailed {
            url: "https://example.com/site.json".into(),
            reason: "server answered HTTP 503".into(),
            status: Some(503),
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn empty_input_is_a_usage_error() {
        let err = CliError::from(CoreError::from(NormalizationError::Empty));
        assert_eq!(err.to_string(), "Invalid URL: No site URL given");
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn wrong_shape_is_an_invalid_manifest() {
        let err = CliError::from(CoreError::Validation(ValidationError::InvalidShape {
            reason: "missing `items`".into(),
        }));
        assert_eq!(err.to_string(), "Invalid site.json format: missing `items`");
        assert_eq!(err.exit_code(), exit_code::INVALID_MANIFEST);
    }

    #[test]
    fn unknown_alias_maps_to_not_found() {
        let err = CliError::from(ConfigError::UnknownSite {
            name: "docs".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }
}

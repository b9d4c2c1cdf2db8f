// ── Core error types ──
//
// User-facing errors from siteview-core. Consumers never see reqwest or
// serde errors directly: the `From<siteview_api::Error>` impl sorts
// transport-layer failures into "could not fetch" vs. "invalid format".

use serde::Serialize;
use thiserror::Error;

/// Raw input could not be turned into a fetchable manifest URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("No site URL given")]
    Empty,

    #[error("'{input}' is not a valid site URL: {reason}")]
    Malformed { input: String, reason: String },
}

/// A fetched body is not a site manifest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid site.json format: {reason}")]
    InvalidShape { reason: String },
}

impl ValidationError {
    pub(crate) fn invalid_shape(reason: impl Into<String>) -> Self {
        Self::InvalidShape {
            reason: reason.into(),
        }
    }
}

/// Which of the three user-visible failure families an error belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// Input rejected before any network activity.
    Normalization,
    /// Transport failure, timeout, or non-success status.
    Network,
    /// Reachable URL, but the body is not a manifest.
    Validation,
}

impl FailureKind {
    /// Short headline shown to users for this failure family.
    pub fn headline(self) -> &'static str {
        match self {
            Self::Normalization => "Invalid URL",
            Self::Network => "Could not fetch site.json",
            Self::Validation => "Invalid site.json format",
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input ────────────────────────────────────────────────────────
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    // ── Network ──────────────────────────────────────────────────────
    #[error("Could not fetch {url}: {reason}")]
    FetchFailed {
        url: String,
        reason: String,
        /// HTTP status code, when the server answered.
        status: Option<u16>,
    },

    #[error("Fetching site.json timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Manifest ─────────────────────────────────────────────────────
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Analysis of {url} was superseded by a newer request")]
    Superseded { url: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The failure family to surface, or `None` for errors that are never
    /// shown as an analysis failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Normalization(_) => Some(FailureKind::Normalization),
            Self::FetchFailed { .. } | Self::Timeout { .. } => Some(FailureKind::Network),
            Self::Validation(_) => Some(FailureKind::Validation),
            Self::Superseded { .. } | Self::Config { .. } => None,
        }
    }

    /// Failure detail without the family headline, for display next to
    /// [`FailureKind::headline`].
    pub fn detail(&self) -> String {
        match self {
            Self::FetchFailed { url, reason, .. } => format!("{url}: {reason}"),
            Self::Validation(ValidationError::InvalidShape { reason }) => reason.clone(),
            other => other.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<siteview_api::Error> for CoreError {
    fn from(err: siteview_api::Error) -> Self {
        match err {
            siteview_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::FetchFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            siteview_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            siteview_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            siteview_api::Error::Status { status, url } => CoreError::FetchFailed {
                reason: format!("server answered HTTP {status}"),
                url,
                status: Some(status),
            },
            siteview_api::Error::Deserialization { message, body: _ } => CoreError::Validation(
                ValidationError::invalid_shape(format!("body is not valid JSON ({message})")),
            ),
        }
    }
}

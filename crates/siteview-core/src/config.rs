// ── Runtime analysis configuration ──
//
// Describes *how* manifests are fetched: TLS, timeout, user agent.
// Never touches disk; the CLI builds an `AnalyzerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use siteview_api::transport::{DEFAULT_USER_AGENT, TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Default for public sites.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed staging hosts).
    DangerAcceptInvalid,
}

/// Configuration for an [`Analyzer`](crate::Analyzer).
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout for one manifest fetch.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }
}

impl AnalyzerConfig {
    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: tls_to_transport(&self.tls),
            timeout: self.timeout,
            user_agent: self.user_agent.clone(),
        }
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

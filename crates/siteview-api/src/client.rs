// Manifest HTTP client
//
// Wraps `reqwest::Client` with the one request this crate knows how to
// make: a GET of a `site.json` URL, a status check, and a JSON decode.
// Shape validation happens in `siteview-core`.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for `site.json` manifests.
///
/// Returns the decoded body as an untyped [`Value`]; callers decide whether
/// it is a valid manifest.
#[derive(Debug, Clone)]
pub struct ManifestClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl ManifestClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            timeout: transport.timeout,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// `timeout` must be the one `http` was built with; it is only used to
    /// report [`Error::Timeout`].
    pub fn with_client(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    /// GET a manifest URL and decode the body as JSON.
    ///
    /// Non-2xx statuses map to [`Error::Status`], unparseable bodies to
    /// [`Error::Deserialization`].
    pub async fn fetch_manifest(&self, url: &Url) -> Result<Value, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().await.map_err(|e| self.classify(e))?;
        debug!(bytes = body.len(), "manifest body received");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

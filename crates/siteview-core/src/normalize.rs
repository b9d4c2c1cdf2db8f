// ── URL normalization ──
//
// Turns whatever the user typed into the absolute URL of a `site.json`
// manifest. No I/O; the same input always yields the same URL.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use url::Url;

use crate::error::NormalizationError;

/// File name every manifest URL ends with.
pub const MANIFEST_FILENAME: &str = "site.json";

const DEFAULT_SCHEME: &str = "https://";

/// An absolute `http(s)` URL whose last path segment is exactly `site.json`.
///
/// Only constructible through [`normalize()`], so holding one is proof the
/// invariant holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ManifestUrl(Url);

impl ManifestUrl {
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The manifest URL with the trailing `site.json` (and any query)
    /// removed. Item links fall back to this when the manifest names no
    /// domain.
    pub fn base_url(&self) -> Url {
        let mut base = self.0.clone();
        base.set_query(None);
        let dir = base
            .path()
            .strip_suffix(MANIFEST_FILENAME)
            .unwrap_or("/")
            .to_owned();
        base.set_path(&dir);
        base
    }
}

impl fmt::Display for ManifestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl FromStr for ManifestUrl {
    type Err = NormalizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(s)
    }
}

/// Normalize free-form input into a [`ManifestUrl`].
///
/// - surrounding whitespace is ignored; nothing left is [`NormalizationError::Empty`]
/// - input without a scheme gets `https://`
/// - only `http` and `https` URLs with a host are accepted
/// - `site.json` is appended unless it already is the last path segment,
///   with exactly one `/` in between
/// - fragments are dropped, queries kept
///
/// Idempotent: normalizing a normalized URL returns it unchanged.
pub fn normalize(raw: &str) -> Result<ManifestUrl, NormalizationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NormalizationError::Empty);
    }

    let candidate: Cow<'_, str> = if has_scheme(trimmed) {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("{DEFAULT_SCHEME}{trimmed}"))
    };

    let mut url = Url::parse(&candidate).map_err(|e| malformed(trimmed, e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(malformed(
            trimmed,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(malformed(trimmed, "missing host".into()));
    }

    url.set_fragment(None);

    if !ends_with_manifest(&url) {
        let path = url.path();
        let with_manifest = if path.ends_with('/') {
            format!("{path}{MANIFEST_FILENAME}")
        } else {
            format!("{path}/{MANIFEST_FILENAME}")
        };
        url.set_path(&with_manifest);
    }

    Ok(ManifestUrl(url))
}

/// `true` when the input starts with an RFC 3986 scheme followed by `://`.
pub(crate) fn has_scheme(input: &str) -> bool {
    input.split_once("://").is_some_and(|(scheme, _)| {
        scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

fn ends_with_manifest(url: &Url) -> bool {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .is_some_and(|last| last == MANIFEST_FILENAME)
}

fn malformed(input: &str, reason: String) -> NormalizationError {
    NormalizationError::Malformed {
        input: input.to_owned(),
        reason,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn norm(input: &str) -> String {
        normalize(input).unwrap().to_string()
    }

    #[test]
    fn bare_host_gets_scheme_and_manifest() {
        assert_eq!(norm("example.com"), "https://example.com/site.json");
    }

    #[test]
    fn trailing_slash_does_not_double() {
        assert_eq!(norm("https://example.com/"), "https://example.com/site.json");
        assert_eq!(norm("https://example.com"), "https://example.com/site.json");
    }

    #[test]
    fn already_normalized_is_unchanged() {
        assert_eq!(
            norm("https://example.com/site.json"),
            "https://example.com/site.json"
        );
        assert_eq!(
            norm("http://example.com/docs/site.json"),
            "http://example.com/docs/site.json"
        );
    }

    #[test]
    fn subdirectory_paths_keep_one_separator() {
        assert_eq!(norm("example.com/docs"), "https://example.com/docs/site.json");
        assert_eq!(norm("example.com/docs/"), "https://example.com/docs/site.json");
    }

    #[test]
    fn only_a_trailing_manifest_segment_counts() {
        assert_eq!(
            norm("https://example.com/site.json/archive"),
            "https://example.com/site.json/archive/site.json"
        );
        assert_eq!(
            norm("https://example.com/mysite.json"),
            "https://example.com/mysite.json/site.json"
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(norm("  \texample.com \n"), "https://example.com/site.json");
    }

    #[test]
    fn scheme_is_prepended_once() {
        assert_eq!(norm("http://example.com"), "http://example.com/site.json");
        assert_eq!(norm("HTTPS://Example.COM"), "https://example.com/site.json");
    }

    #[test]
    fn query_is_kept_and_fragment_dropped() {
        assert_eq!(
            norm("https://example.com/docs?rev=3#top"),
            "https://example.com/docs/site.json?rev=3"
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in [
            "example.com",
            "https://example.com/",
            "http://example.com:8080/a/b/",
            "https://example.com/docs?rev=3",
            "https://example.com/site.json",
        ] {
            let once = norm(input);
            assert_eq!(norm(&once), once, "not idempotent for {input}");
        }
    }

    #[test]
    fn empty_and_whitespace_input_is_rejected() {
        assert_eq!(normalize(""), Err(NormalizationError::Empty));
        assert_eq!(normalize("   "), Err(NormalizationError::Empty));
    }

    #[test]
    fn unsupported_scheme_is_malformed() {
        let err = normalize("ftp://example.com").unwrap_err();
        assert!(
            matches!(err, NormalizationError::Malformed { ref reason, .. } if reason.contains("ftp"))
        );
    }

    #[test]
    fn unparseable_host_is_malformed() {
        assert!(matches!(
            normalize("https://exa mple.com"),
            Err(NormalizationError::Malformed { .. })
        ));
        assert!(matches!(
            normalize("https://"),
            Err(NormalizationError::Malformed { .. })
        ));
    }

    #[test]
    fn scheme_detection_ignores_embedded_urls() {
        assert!(has_scheme("https://example.com"));
        assert!(has_scheme("git+ssh://host"));
        assert!(!has_scheme("example.com/?next=https://other.com"));
        assert!(!has_scheme("://example.com"));
    }

    #[test]
    fn embedded_url_in_query_still_gets_default_scheme() {
        assert_eq!(
            norm("example.com/go?next=https://other.com"),
            "https://example.com/go/site.json?next=https://other.com"
        );
    }

    #[test]
    fn base_url_strips_manifest_and_query() {
        let url = normalize("https://example.com/docs/site.json?rev=3").unwrap();
        assert_eq!(url.base_url().as_str(), "https://example.com/docs/");

        let root = normalize("example.com").unwrap();
        assert_eq!(root.base_url().as_str(), "https://example.com/");
    }

    #[test]
    fn parses_via_from_str() {
        let url: ManifestUrl = "example.com".parse().unwrap();
        assert_eq!(url.as_str(), "https://example.com/site.json");
    }
}

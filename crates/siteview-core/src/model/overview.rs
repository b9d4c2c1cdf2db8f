use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which metadata layout the overview fields were read from.
///
/// Flat (`metadata.name`) is canonical. Nested (`metadata.site.name`) is
/// read only as a per-field fallback; `Mixed` means both were needed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ManifestLayout {
    #[default]
    Flat,
    Nested,
    Mixed,
}

/// Manifest-level metadata, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayOverview {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    /// Theme label: the theme string, or a theme object's `name`/`element`.
    pub theme: Option<String>,
    /// `created`, formatted in UTC or the "not available" sentinel.
    pub created: String,
    /// `updated`, formatted in UTC or the "not available" sentinel.
    pub updated: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Base every item link was built from, if one could be resolved.
    pub base_url: Option<String>,
    pub layout: ManifestLayout,
}

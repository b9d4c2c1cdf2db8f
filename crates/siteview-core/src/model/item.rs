use chrono::{DateTime, Utc};
use serde::Serialize;

use super::PLACEHOLDER_LINK;

/// One manifest item, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayItem {
    pub title: String,
    pub description: String,
    /// Absent when the item names no image; renderers skip the image then.
    pub image: Option<String>,
    pub last_updated: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub slug: Option<String>,
    /// Absolute content URL, or [`PLACEHOLDER_LINK`].
    pub content_url: String,
    pub source_url: Option<String>,
}

impl DisplayItem {
    /// `false` when `content_url` is the placeholder.
    pub fn has_content_link(&self) -> bool {
        self.content_url != PLACEHOLDER_LINK
    }
}

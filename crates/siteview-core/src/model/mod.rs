// ── Display model ──
//
// UI-ready projection of a site manifest. Built by `convert`, consumed by
// renderers. Everything here is already formatted for display; renderers
// only branch on the `Option` fields.

pub mod item;
pub mod overview;

use serde::Serialize;

pub use item::DisplayItem;
pub use overview::{DisplayOverview, ManifestLayout};

/// Shown in place of a missing or unparseable timestamp.
pub const NOT_AVAILABLE: &str = "Not available";

/// Shown when an item has no usable description.
pub const NO_DESCRIPTION: &str = "No description available";

/// Shown when an item has no usable title.
pub const UNTITLED: &str = "Untitled";

/// Non-navigable link used when an item's content URL cannot be built.
pub const PLACEHOLDER_LINK: &str = "#";

/// Fixed UTC calendar format for every rendered timestamp.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Overview plus the ordered item list of one analyzed manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    pub overview: DisplayOverview,
    pub items: Vec<DisplayItem>,
}

impl DisplayModel {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}

// ── Manifest-to-display conversion ──
//
// Validates the shape of a fetched `site.json` body and projects it into
// the display model. Pure: no I/O, the input is only borrowed. Once the
// shape check passes nothing here can fail; wrong-typed optional fields
// are read as absent.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use url::Url;

use crate::error::ValidationError;
use crate::model::{
    DATE_FORMAT, DisplayItem, DisplayModel, DisplayOverview, ManifestLayout, NO_DESCRIPTION,
    NOT_AVAILABLE, PLACEHOLDER_LINK, UNTITLED,
};
use crate::normalize::{ManifestUrl, has_scheme};

/// Page every item links as its source.
const SOURCE_INDEX: &str = "index.html";

/// Key of the nested metadata layout (`metadata.site.*`).
const NESTED_SITE_KEY: &str = "site";

// ── Entry point ────────────────────────────────────────────────────

/// Validate a fetched manifest body and map it into a [`DisplayModel`].
///
/// The body must be an object with a `metadata` object and an `items`
/// array; anything else is [`ValidationError::InvalidShape`]. Item links
/// are built from `metadata.domain`, falling back to `manifest_url`'s
/// directory when the manifest names no domain.
pub fn validate_and_map(
    raw: &Value,
    manifest_url: Option<&ManifestUrl>,
) -> Result<DisplayModel, ValidationError> {
    let root = raw
        .as_object()
        .ok_or_else(|| ValidationError::invalid_shape("manifest is not a JSON object"))?;

    let metadata = match root.get("metadata") {
        Some(Value::Object(map)) => map,
        Some(_) => return Err(ValidationError::invalid_shape("`metadata` is not an object")),
        None => return Err(ValidationError::invalid_shape("missing `metadata`")),
    };

    let items = match root.get("items") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ValidationError::invalid_shape("`items` is not an array")),
        None => return Err(ValidationError::invalid_shape("missing `items`")),
    };

    let mut fields = MetadataFields::new(metadata);
    let base = fields
        .text("domain")
        .as_deref()
        .and_then(domain_base)
        .or_else(|| manifest_url.map(ManifestUrl::base_url));

    let overview = map_overview(&mut fields, base.as_ref());
    let items = items
        .iter()
        .map(|item| map_item(item, base.as_ref()))
        .collect();

    Ok(DisplayModel { overview, items })
}

// ── Metadata lookup ────────────────────────────────────────────────

/// Flat-first field lookup over `metadata`, falling back to
/// `metadata.site`, remembering which layer answered.
struct MetadataFields<'a> {
    flat: &'a Map<String, Value>,
    nested: Option<&'a Map<String, Value>>,
    used_flat: bool,
    used_nested: bool,
}

impl<'a> MetadataFields<'a> {
    fn new(flat: &'a Map<String, Value>) -> Self {
        Self {
            flat,
            nested: flat.get(NESTED_SITE_KEY).and_then(Value::as_object),
            used_flat: false,
            used_nested: false,
        }
    }

    fn lookup<T>(&mut self, key: &str, read: impl Fn(&'a Value) -> Option<T>) -> Option<T> {
        if let Some(found) = self.flat.get(key).and_then(&read) {
            self.used_flat = true;
            return Some(found);
        }
        let found = self.nested.and_then(|site| site.get(key)).and_then(&read);
        if found.is_some() {
            self.used_nested = true;
        }
        found
    }

    fn text(&mut self, key: &str) -> Option<String> {
        self.lookup(key, text)
    }

    fn epoch(&mut self, key: &str) -> Option<DateTime<Utc>> {
        self.lookup(key, epoch)
    }

    fn layout(&self) -> ManifestLayout {
        match (self.used_flat, self.used_nested) {
            (_, false) => ManifestLayout::Flat,
            (false, true) => ManifestLayout::Nested,
            (true, true) => ManifestLayout::Mixed,
        }
    }
}

// ── Projections ────────────────────────────────────────────────────

fn map_overview(fields: &mut MetadataFields<'_>, base: Option<&Url>) -> DisplayOverview {
    let created_at = fields.epoch("created");
    let updated_at = fields.epoch("updated");

    DisplayOverview {
        name: fields.text("name"),
        description: fields.text("description"),
        logo: fields.text("logo"),
        theme: fields.lookup("theme", theme_label),
        created: format_timestamp(created_at),
        updated: format_timestamp(updated_at),
        created_at,
        updated_at,
        base_url: base.map(ToString::to_string),
        layout: fields.layout(),
    }
}

fn map_item(raw: &Value, base: Option<&Url>) -> DisplayItem {
    let empty = Map::new();
    let item = raw.as_object().unwrap_or(&empty);
    let nested = item.get("metadata").and_then(Value::as_object);
    let field = |key: &str| item.get(key);
    let nested_field = |key: &str| nested.and_then(|meta| meta.get(key));

    let image = field("image")
        .and_then(text)
        .or_else(|| field("logo").and_then(text))
        .or_else(|| nested_field("image").and_then(text))
        .or_else(|| {
            nested_field("images")
                .and_then(Value::as_array)
                .and_then(|images| images.iter().find_map(text))
        });

    let updated_at = field("lastUpdated")
        .and_then(epoch)
        .or_else(|| field("updated").and_then(epoch))
        .or_else(|| nested_field("updated").and_then(epoch));

    let slug = field("slug").and_then(text);

    let content_url = base
        .zip(slug.as_deref())
        .and_then(|(base, slug)| join_link(base, slug))
        .map_or_else(|| PLACEHOLDER_LINK.to_owned(), String::from);

    let source_url = base
        .and_then(|base| join_link(base, SOURCE_INDEX))
        .map(String::from);

    DisplayItem {
        title: field("title").and_then(text).unwrap_or_else(|| UNTITLED.to_owned()),
        description: field("description")
            .and_then(text)
            .unwrap_or_else(|| NO_DESCRIPTION.to_owned()),
        image,
        last_updated: format_timestamp(updated_at),
        updated_at,
        slug,
        content_url,
        source_url,
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Non-blank string value, copied verbatim.
fn text(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_owned)
}

/// Unix epoch seconds as an integer, a float, or a numeric string.
fn epoch(value: &Value) -> Option<DateTime<Utc>> {
    let secs = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(float_secs))?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    DateTime::from_timestamp(secs, 0)
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn float_secs(secs: f64) -> Option<i64> {
    secs.is_finite().then(|| secs.trunc() as i64)
}

/// A theme is either a label or an object carrying `name` / `element`.
fn theme_label(value: &Value) -> Option<String> {
    match value {
        Value::Object(theme) => theme
            .get("name")
            .and_then(text)
            .or_else(|| theme.get("element").and_then(text)),
        other => text(other),
    }
}

fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || NOT_AVAILABLE.to_owned(),
        |at| at.format(DATE_FORMAT).to_string(),
    )
}

/// `https://` + domain, unless the domain already carries a scheme.
/// Query and fragment are dropped; links are joined onto the path.
fn domain_base(domain: &str) -> Option<Url> {
    let domain = domain.trim();
    let candidate = if has_scheme(domain) {
        domain.to_owned()
    } else {
        format!("https://{domain}")
    };
    let mut url = Url::parse(&candidate)
        .ok()
        .filter(|url| url.host_str().is_some_and(|host| !host.is_empty()))?;
    url.set_query(None);
    url.set_fragment(None);
    Some(url)
}

/// `base` + `/` + `path`, with exactly one separator.
fn join_link(base: &Url, path: &str) -> Option<Url> {
    let path = path.trim().trim_start_matches('/');
    if path.is_empty() {
        return None;
    }
    let root = base.as_str().trim_end_matches('/');
    Url::parse(&format!("{root}/{path}")).ok()
}

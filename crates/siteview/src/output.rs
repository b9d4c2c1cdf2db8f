//! Output formatting: table, JSON, YAML, plain.
//!
//! Each `--output` format is a [`Renderer`] registered once at startup in
//! the process-wide [`RendererRegistry`]. Table uses `tabled`, structured
//! formats use serde, plain emits one content URL per line.

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use siteview_core::{
    AnalysisState, DisplayItem, DisplayModel, DisplayOverview, ManifestLayout, Registration,
    Renderer, RendererRegistry,
};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Longest description shown in a table cell before it is cut.
const DESCRIPTION_WIDTH: usize = 60;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Registration ─────────────────────────────────────────────────────

/// Define the built-in renderer for every output format.
///
/// Safe to call more than once; later calls keep the first renderers.
pub fn register_builtin(color: bool) {
    let registry = RendererRegistry::global();
    for format in OutputFormat::ALL {
        let renderer: Arc<dyn Renderer> = match format {
            OutputFormat::Table => Arc::new(TableRenderer { color }),
            OutputFormat::Json => Arc::new(JsonRenderer { compact: false }),
            OutputFormat::JsonCompact => Arc::new(JsonRenderer { compact: true }),
            OutputFormat::Yaml => Arc::new(YamlRenderer),
            OutputFormat::Plain => Arc::new(PlainRenderer),
        };
        if registry.define(format.tag(), renderer) == Registration::AlreadyDefined {
            tracing::trace!(tag = format.tag(), "built-in renderer already registered");
        }
    }
}

/// Look up the renderer registered for `format`.
pub fn renderer_for(format: OutputFormat) -> Result<Arc<dyn Renderer>, CliError> {
    RendererRegistry::global()
        .get(format.tag())
        .ok_or_else(|| CliError::Config {
            message: format!("no renderer registered for output format '{}'", format.tag()),
        })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Table ────────────────────────────────────────────────────────────

struct TableRenderer {
    color: bool,
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Last Updated")]
    last_updated: String,
    #[tabled(rename = "Content")]
    content: String,
    #[tabled(rename = "Source")]
    source: String,
}

impl From<&DisplayItem> for ItemRow {
    fn from(item: &DisplayItem) -> Self {
        Self {
            title: item.title.clone(),
            description: truncate(&item.description, DESCRIPTION_WIDTH),
            last_updated: item.last_updated.clone(),
            content: item.content_url.clone(),
            source: item.source_url.clone().unwrap_or_else(|| "-".into()),
        }
    }
}

impl TableRenderer {
    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().cyan().to_string()
        } else {
            text.to_owned()
        }
    }

    fn label(&self, text: &str) -> String {
        let padded = format!("{text:<14}");
        if self.color {
            padded.dimmed().to_string()
        } else {
            padded
        }
    }

    fn overview(&self, overview: &DisplayOverview) -> String {
        let name = overview.name.as_deref().unwrap_or("(unnamed site)");
        let mut lines = vec![self.heading(name)];

        let mut field = |label: &str, value: Option<&str>| {
            if let Some(value) = value {
                lines.push(format!("  {}{value}", self.label(label)));
            }
        };
        field("Description", overview.description.as_deref());
        field("Logo", overview.logo.as_deref());
        field("Theme", overview.theme.as_deref());
        field("Created", Some(overview.created.as_str()));
        field("Last updated", Some(overview.updated.as_str()));
        field("Links from", overview.base_url.as_deref());
        if overview.layout != ManifestLayout::Flat {
            field("Layout", Some(overview.layout.as_ref()));
        }
        lines.join("\n")
    }
}

impl Renderer for TableRenderer {
    fn render_model(&self, model: &DisplayModel) -> String {
        let overview = self.overview(&model.overview);
        if !model.has_items() {
            return format!("{overview}\n\nNo items in this manifest.");
        }

        let rows: Vec<ItemRow> = model.items.iter().map(ItemRow::from).collect();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        let images: Vec<String> = model
            .items
            .iter()
            .filter_map(|item| {
                item.image
                    .as_ref()
                    .map(|image| format!("  {}{image}", self.label(&item.title)))
            })
            .collect();

        let mut out = format!(
            "{overview}\n\n{} ({})\n{table}",
            self.heading("Items"),
            model.item_count()
        );
        if !images.is_empty() {
            out.push_str(&format!("\n\n{}\n{}", self.heading("Images"), images.join("\n")));
        }
        out
    }

    fn render_state(&self, state: &AnalysisState) -> String {
        match state {
            AnalysisState::Idle => String::new(),
            AnalysisState::Loading { manifest_url, .. } => {
                let line = format!("Analyzing {manifest_url} ...");
                if self.color {
                    line.dimmed().to_string()
                } else {
                    line
                }
            }
            AnalysisState::Success(analysis) => self.render_model(&analysis.model),
            AnalysisState::Failure { kind, message, .. } => {
                if self.color {
                    format!("{}: {message}", kind.headline().red().bold())
                } else {
                    format!("{}: {message}", kind.headline())
                }
            }
        }
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_owned();
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

// ── Structured formats ───────────────────────────────────────────────

struct JsonRenderer {
    compact: bool,
}

impl JsonRenderer {
    fn render<T: serde::Serialize + ?Sized>(&self, data: &T) -> String {
        let result = if self.compact {
            serde_json::to_string(data)
        } else {
            serde_json::to_string_pretty(data)
        };
        result.unwrap_or_else(|e| format!("{{\"error\":\"serialization failed: {e}\"}}"))
    }
}

impl Renderer for JsonRenderer {
    fn render_model(&self, model: &DisplayModel) -> String {
        self.render(model)
    }

    /// Every state, tagged by `state`, so a consumer can follow progress.
    fn render_state(&self, state: &AnalysisState) -> String {
        self.render(state)
    }
}

struct YamlRenderer;

impl YamlRenderer {
    fn render<T: serde::Serialize + ?Sized>(data: &T) -> String {
        serde_yaml::to_string(data).unwrap_or_else(|e| format!("# serialization failed: {e}"))
    }
}

impl Renderer for YamlRenderer {
    fn render_model(&self, model: &DisplayModel) -> String {
        Self::render(model)
    }

    fn render_state(&self, state: &AnalysisState) -> String {
        Self::render(state)
    }
}

// ── Plain ────────────────────────────────────────────────────────────

/// Linkable content URLs, one per line. Items without a link are skipped.
struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render_model(&self, model: &DisplayModel) -> String {
        model
            .items
            .iter()
            .filter(|item| item.has_content_link())
            .map(|item| item.content_url.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use siteview_core::{FailureKind, validate_and_map};

    use super::*;

    fn model() -> DisplayModel {
        validate_and_map(
            &json!({
                "metadata": {
                    "name": "Docs",
                    "domain": "docs.example.com",
                    "created": 0
                },
                "items": [
                    { "title": "Intro", "slug": "intro", "image": "intro.png" },
                    { "title": "Draft" }
                ]
            }),
            None,
        )
        .unwrap()
    }

    #[test]
    fn plain_lists_only_linkable_items() {
        assert_eq!(
            PlainRenderer.render_model(&model()),
            "https://docs.example.com/intro"
        );
    }

    #[test]
    fn table_shows_overview_items_and_images() {
        let out = TableRenderer { color: false }.render_model(&model());
        assert!(out.starts_with("Docs\n"));
        assert!(out.contains("1970-01-01 00:00:00 UTC"));
        assert!(out.contains("Items (2)"));
        assert!(out.contains("https://docs.example.com/intro"));
        assert!(out.contains("No description available"));
        assert!(out.contains("intro.png"));
    }

    #[test]
    fn table_without_items_says_so() {
        let empty = validate_and_map(&json!({ "metadata": {}, "items": [] }), None).unwrap();
        let out = TableRenderer { color: false }.render_model(&empty);
        assert!(out.contains("(unnamed site)"));
        assert!(out.ends_with("No items in this manifest."));
    }

    #[test]
    fn uncolored_failure_uses_headline() {
        let state = AnalysisState::Failure {
            generation: 3,
            kind: FailureKind::Network,
            message: "https://example.com/site.json: server answered HTTP 500".into(),
        };
        assert_eq!(
            TableRenderer { color: false }.render_state(&state),
            "Could not fetch site.json: https://example.com/site.json: server answered HTTP 500"
        );
    }

    #[test]
    fn json_state_is_tagged() {
        let out = JsonRenderer { compact: true }.render_state(&AnalysisState::Idle);
        assert_eq!(out, r#"{"state":"idle"}"#);
    }

    #[test]
    fn long_descriptions_are_cut() {
        let text = "x".repeat(80);
        let cut = truncate(&text, 20);
        assert_eq!(cut.chars().count(), 20);
        assert!(cut.ends_with("..."));
    }
}

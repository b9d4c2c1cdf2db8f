// ── Renderer registry ──
//
// Process-wide table of renderers keyed by tag. Hosts register their
// renderers once at startup; registering a tag again is a reported no-op
// (the first registration stays), so repeated startup paths are harmless.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::analyzer::AnalysisState;
use crate::model::DisplayModel;

/// Turns analysis results into text for one output surface.
pub trait Renderer: Send + Sync {
    /// Render a successful analysis.
    fn render_model(&self, model: &DisplayModel) -> String;

    /// Render any state of the analysis state machine.
    ///
    /// The default shows a loading line, the model on success, and the
    /// failure headline plus detail otherwise. `Idle` renders nothing.
    fn render_state(&self, state: &AnalysisState) -> String {
        match state {
            AnalysisState::Idle => String::new(),
            AnalysisState::Loading { manifest_url, .. } => {
                format!("Analyzing {manifest_url} ...")
            }
            AnalysisState::Success(analysis) => self.render_model(&analysis.model),
            AnalysisState::Failure { kind, message, .. } => {
                format!("{}: {message}", kind.headline())
            }
        }
    }
}

/// Outcome of [`RendererRegistry::define`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The tag was free and now maps to the given renderer.
    Defined,
    /// The tag was already taken; the existing renderer was kept.
    AlreadyDefined,
}

/// Renderers keyed by tag.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: DashMap<String, Arc<dyn Renderer>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<RendererRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Register `renderer` under `tag` unless the tag is already defined.
    pub fn define(&self, tag: &str, renderer: Arc<dyn Renderer>) -> Registration {
        match self.renderers.entry(tag.to_owned()) {
            Entry::Occupied(_) => {
                debug!(tag, "renderer already defined, keeping the first one");
                Registration::AlreadyDefined
            }
            Entry::Vacant(slot) => {
                slot.insert(renderer);
                debug!(tag, "renderer defined");
                Registration::Defined
            }
        }
    }

    pub fn get(&self, tag: &str) -> Option<Arc<dyn Renderer>> {
        self.renderers.get(tag).map(|entry| Arc::clone(entry.value()))
    }

    pub fn is_defined(&self, tag: &str) -> bool {
        self.renderers.contains_key(tag)
    }

    /// All defined tags, sorted.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.renderers.iter().map(|e| e.key().clone()).collect();
        tags.sort();
        tags
    }
}

// ── Analyzer ──
//
// Orchestrates one analysis at a time: normalize, fetch, validate, map,
// publish. Newer requests supersede older ones; a response only lands if
// its generation is still the latest when it arrives. Every state change
// goes out on a watch channel so renderers can redraw.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use siteview_api::ManifestClient;

use crate::config::AnalyzerConfig;
use crate::convert::validate_and_map;
use crate::error::{CoreError, FailureKind};
use crate::model::DisplayModel;
use crate::normalize::{ManifestUrl, normalize};

// ── State ────────────────────────────────────────────────────────

/// One successful analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub generation: u64,
    pub manifest_url: ManifestUrl,
    pub model: DisplayModel,
}

/// Analysis state observable by renderers.
///
/// Only `Success` carries a model, so a failure can never be displayed
/// next to stale data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnalysisState {
    #[default]
    Idle,
    Loading {
        generation: u64,
        manifest_url: ManifestUrl,
    },
    Success(Arc<Analysis>),
    Failure {
        generation: u64,
        kind: FailureKind,
        message: String,
    },
}

impl AnalysisState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// The displayed model, present only after a successful analysis.
    pub fn model(&self) -> Option<&DisplayModel> {
        match self {
            Self::Success(analysis) => Some(&analysis.model),
            _ => None,
        }
    }

    /// Generation of the request this state belongs to (`None` when idle).
    pub fn generation(&self) -> Option<u64> {
        match self {
            Self::Idle => None,
            Self::Loading { generation, .. } | Self::Failure { generation, .. } => {
                Some(*generation)
            }
            Self::Success(analysis) => Some(analysis.generation),
        }
    }
}

// ── Analyzer ─────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<AnalyzerInner>`; clones share one state
/// machine, so an `analyze()` on any clone supersedes the others.
#[derive(Clone)]
pub struct Analyzer {
    inner: Arc<AnalyzerInner>,
}

struct AnalyzerInner {
    config: AnalyzerConfig,
    client: ManifestClient,
    state: watch::Sender<AnalysisState>,
    latest: AtomicU64,
}

impl Analyzer {
    /// Create an analyzer, building its HTTP client from `config`.
    pub fn new(config: AnalyzerConfig) -> Result<Self, CoreError> {
        let client = ManifestClient::new(&config.transport())?;
        Ok(Self::with_client(config, client))
    }

    /// Create an analyzer around an existing manifest client.
    pub fn with_client(config: AnalyzerConfig, client: ManifestClient) -> Self {
        let (state, _) = watch::channel(AnalysisState::Idle);
        Self {
            inner: Arc::new(AnalyzerInner {
                config,
                client,
                state,
                latest: AtomicU64::new(0),
            }),
        }
    }

    /// Access the analyzer configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.inner.config
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to state changes. Each change is a "re-render" signal.
    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.inner.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AnalysisState {
        self.inner.state.borrow().clone()
    }

    // ── Requests ─────────────────────────────────────────────────

    /// Analyze the site behind `raw_input`.
    ///
    /// Publishes `Loading`, then `Success` or `Failure`. If another request
    /// is issued before this one resolves, this one returns
    /// [`CoreError::Superseded`] and publishes nothing further.
    pub async fn analyze(&self, raw_input: &str) -> Result<Arc<Analysis>, CoreError> {
        self.begin(raw_input).await
    }

    /// Claim the next generation now and return the future that runs the
    /// analysis. Requests begun in order supersede each other in that
    /// order, however their futures end up scheduled.
    pub fn begin(
        &self,
        raw_input: &str,
    ) -> impl Future<Output = Result<Arc<Analysis>, CoreError>> + Send + 'static {
        let generation = self.next_generation();
        let analyzer = self.clone();
        let raw_input = raw_input.to_owned();
        async move { analyzer.run(generation, &raw_input).await }
    }

    async fn run(&self, generation: u64, raw_input: &str) -> Result<Arc<Analysis>, CoreError> {
        let manifest_url = match normalize(raw_input) {
            Ok(url) => url,
            Err(e) => {
                let err = CoreError::from(e);
                self.publish_failure(generation, &err);
                return Err(err);
            }
        };

        self.publish(
            generation,
            AnalysisState::Loading {
                generation,
                manifest_url: manifest_url.clone(),
            },
        );
        info!(url = %manifest_url, generation, "analyzing site");

        let result = match self.inner.client.fetch_manifest(manifest_url.as_url()).await {
            Ok(raw) => validate_and_map(&raw, Some(&manifest_url)).map_err(CoreError::from),
            Err(e) => Err(CoreError::from(e)),
        };

        if !self.is_current(generation) {
            debug!(url = %manifest_url, generation, "discarding superseded response");
            return Err(CoreError::Superseded {
                url: manifest_url.to_string(),
            });
        }

        match result {
            Ok(model) => {
                info!(
                    url = %manifest_url,
                    generation,
                    items = model.item_count(),
                    "analysis complete"
                );
                let analysis = Arc::new(Analysis {
                    generation,
                    manifest_url,
                    model,
                });
                if self.publish(generation, AnalysisState::Success(Arc::clone(&analysis))) {
                    Ok(analysis)
                } else {
                    Err(CoreError::Superseded {
                        url: analysis.manifest_url.to_string(),
                    })
                }
            }
            Err(err) => {
                self.publish_failure(generation, &err);
                Err(err)
            }
        }
    }

    /// Drop whatever is displayed and return to `Idle`. Any request still
    /// in flight is superseded.
    pub fn reset(&self) {
        let generation = self.next_generation();
        self.publish(generation, AnalysisState::Idle);
    }

    // ── Internals ────────────────────────────────────────────────

    fn next_generation(&self) -> u64 {
        self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner.latest.load(Ordering::SeqCst) == generation
    }

    /// Replace the state if `generation` is still the latest request.
    /// The check runs under the channel's write lock.
    fn publish(&self, generation: u64, next: AnalysisState) -> bool {
        self.inner.state.send_if_modified(|current| {
            if !self.is_current(generation) {
                return false;
            }
            *current = next;
            true
        })
    }

    fn publish_failure(&self, generation: u64, err: &CoreError) {
        let Some(kind) = err.failure_kind() else {
            return;
        };
        warn!(error = %err, generation, "analysis failed");
        self.publish(
            generation,
            AnalysisState::Failure {
                generation,
                kind,
                message: err.detail(),
            },
        );
    }
}

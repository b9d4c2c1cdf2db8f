//! Analysis layer between `siteview-api` and UI consumers (the CLI).
//!
//! - **[`normalize()`]** turns free-form input into a [`ManifestUrl`] that
//!   always ends in `site.json`. Pure, no I/O.
//!
//! - **[`validate_and_map()`]** checks that a fetched body is a manifest
//!   (`metadata` object + `items` array) and projects it into a
//!   [`DisplayModel`]. Pure and total over structurally valid input.
//!
//! - **[`Analyzer`]** owns the `Idle -> Loading -> Success | Failure` state
//!   machine. Newer requests supersede older ones; every transition is
//!   published on a `tokio::sync::watch` channel for renderers.
//!
//! - **[`RendererRegistry`]** is the host-side, register-once table of
//!   renderers keyed by tag.

pub mod analyzer;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod normalize;
pub mod registry;

// ── Primary re-exports ──────────────────────────────────────────────
pub use analyzer::{Analysis, AnalysisState, Analyzer};
pub use config::{AnalyzerConfig, TlsVerification};
pub use convert::validate_and_map;
pub use error::{CoreError, FailureKind, NormalizationError, ValidationError};
pub use normalize::{MANIFEST_FILENAME, ManifestUrl, normalize};
pub use registry::{Registration, Renderer, RendererRegistry};

pub use model::{DisplayItem, DisplayModel, DisplayOverview, ManifestLayout};

//! Clap derive structures for the `siteview` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. This
//! file is also compiled into `build.rs`, so it may only depend on clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// siteview -- analyze a website's site.json content manifest
#[derive(Debug, Parser)]
#[command(
    name = "siteview",
    version,
    about = "Analyze a website's site.json content manifest",
    long_about = "Fetches the site.json manifest of a website, validates it, and\n\
        shows the site overview plus one card per content item.\n\n\
        Any URL works: `example.com`, `https://example.com/docs/` and\n\
        `https://example.com/docs/site.json` all resolve to the same manifest.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file to use instead of the platform default
    #[arg(long, env = "SITEVIEW_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "SITEVIEW_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "SITEVIEW_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: from config, else 30]
    #[arg(long, env = "SITEVIEW_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// User-Agent header sent with manifest requests
    #[arg(long, env = "SITEVIEW_USER_AGENT", global = true)]
    pub user_agent: Option<String>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Overview block plus a table of items (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one content URL per line (scripting)
    Plain,
}

impl OutputFormat {
    pub const ALL: [Self; 5] = [
        Self::Table,
        Self::Json,
        Self::JsonCompact,
        Self::Yaml,
        Self::Plain,
    ];

    /// Renderer tag this format is registered under.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::JsonCompact => "json-compact",
            Self::Yaml => "yaml",
            Self::Plain => "plain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and analyze a site's manifest
    #[command(alias = "a")]
    Analyze(AnalyzeArgs),

    /// Print the manifest URL a site address resolves to
    Normalize(NormalizeArgs),

    /// Validate and display a local site.json file
    Inspect(InspectArgs),

    /// Read site URLs from stdin, one per line; newer lines supersede older ones
    #[command(alias = "i")]
    Interactive,

    /// Manage configuration and site aliases
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ANALYSIS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Site URL, host name, or configured site alias
    pub site: String,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Site URL or host name
    pub url: String,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Path to a site.json file
    pub file: PathBuf,

    /// Site URL that item links are resolved against when the manifest
    /// names no domain
    #[arg(long)]
    pub base: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Add or replace a site alias
    SetSite {
        /// Alias name
        name: String,

        /// Site URL the alias stands for
        url: String,
    },

    /// Remove a site alias
    RemoveSite {
        /// Alias name
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

//! Command dispatch: bridges CLI args -> core analysis -> output rendering.

pub mod analyze;
pub mod config_cmd;
pub mod inspect;
pub mod interactive;
pub mod normalize;

use std::sync::Arc;

use siteview_core::{Analyzer, Renderer};

use crate::cli::{Command, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;

/// Everything a command handler needs besides its own arguments.
pub struct Context<'a> {
    pub config: &'a Config,
    pub global: &'a GlobalOpts,
    pub renderer: Arc<dyn Renderer>,
}

impl Context<'_> {
    /// Build an analyzer from config defaults and flag overrides.
    pub fn analyzer(&self) -> Result<Analyzer, CliError> {
        let analyzer_config = config::analyzer_config(self.config, self.global)?;
        Ok(Analyzer::new(analyzer_config)?)
    }

    /// Expand a configured site alias; anything else passes through.
    pub fn resolve_site<'s>(&'s self, input: &'s str) -> &'s str {
        let resolved = self.config.resolve_site(input);
        if resolved != input {
            tracing::debug!(alias = input.trim(), url = resolved, "resolved site alias");
        }
        resolved
    }

    pub fn print(&self, rendered: &str) {
        crate::output::print_output(rendered, self.global.quiet);
    }
}

/// Dispatch an analysis command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Analyze(args) => analyze::handle(args, ctx).await,
        Command::Normalize(args) => normalize::handle(&args, ctx),
        Command::Inspect(args) => inspect::handle(args, ctx).await,
        Command::Interactive => interactive::handle(ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Config {
            message: "command is not an analysis command".into(),
        }),
    }
}

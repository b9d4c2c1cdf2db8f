//! `siteview interactive`: one site URL per stdin line.
//!
//! Every line begins a new analysis that supersedes the one in flight. A
//! watcher task renders each state change as it is published, so only the
//! newest request's result ever reaches the screen.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinSet};

use siteview_core::{Analysis, CoreError};

use crate::error::CliError;
use crate::output::print_output;

use super::Context;

type Outcome = Result<Result<Arc<Analysis>, CoreError>, JoinError>;

pub async fn handle(ctx: &Context<'_>) -> Result<(), CliError> {
    let analyzer = ctx.analyzer()?;

    let mut states = analyzer.subscribe();
    let renderer = Arc::clone(&ctx.renderer);
    let quiet = ctx.global.quiet;
    let watcher = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            print_output(&renderer.render_state(&state), quiet);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut requests = JoinSet::new();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        requests.spawn(analyzer.begin(ctx.resolve_site(input)));
        while let Some(outcome) = requests.try_join_next() {
            log_outcome(outcome);
        }
    }

    while let Some(outcome) = requests.join_next().await {
        log_outcome(outcome);
    }

    // The watcher exits once the last sender is gone.
    drop(analyzer);
    if let Err(e) = watcher.await {
        tracing::warn!(error = %e, "state watcher stopped unexpectedly");
    }
    Ok(())
}

/// Failures are already published as state; only note them in the log.
fn log_outcome(outcome: Outcome) {
    match outcome {
        Ok(Ok(analysis)) => {
            tracing::debug!(generation = analysis.generation, "request finished");
        }
        Ok(Err(CoreError::Superseded { url })) => {
            tracing::debug!(%url, "request superseded");
        }
        Ok(Err(e)) => tracing::debug!(error = %e, "request failed"),
        Err(e) => tracing::warn!(error = %e, "analysis task failed"),
    }
}

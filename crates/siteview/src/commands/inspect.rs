//! `siteview inspect`: validate and display a local manifest file.

use serde_json::Value;

use siteview_core::{CoreError, normalize, validate_and_map};

use crate::cli::InspectArgs;
use crate::error::CliError;

use super::Context;

pub async fn handle(args: InspectArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let base = args
        .base
        .as_deref()
        .map(|site| normalize(ctx.resolve_site(site)))
        .transpose()
        .map_err(CoreError::from)?;

    tracing::debug!(path = %args.file.display(), "reading manifest file");
    let body = tokio::fs::read_to_string(&args.file).await?;
    let raw: Value = serde_json::from_str(&body)?;

    let model = validate_and_map(&raw, base.as_ref()).map_err(CoreError::from)?;
    ctx.print(&ctx.renderer.render_model(&model));
    Ok(())
}

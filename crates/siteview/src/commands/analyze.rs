//! `siteview analyze`: one-shot normalize, fetch, validate, render.

use crate::cli::AnalyzeArgs;
use crate::error::CliError;

use super::Context;

pub async fn handle(args: AnalyzeArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let analyzer = ctx.analyzer()?;
    let site = ctx.resolve_site(&args.site);

    let analysis = analyzer.analyze(site).await?;
    ctx.print(&ctx.renderer.render_model(&analysis.model));
    Ok(())
}

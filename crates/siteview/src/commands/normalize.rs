//! `siteview normalize`: show where a site's manifest is looked up.

use siteview_core::{CoreError, normalize};

use crate::cli::NormalizeArgs;
use crate::error::CliError;

use super::Context;

pub fn handle(args: &NormalizeArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let manifest_url = normalize(ctx.resolve_site(&args.url)).map_err(CoreError::from)?;
    ctx.print(manifest_url.as_str());
    Ok(())
}

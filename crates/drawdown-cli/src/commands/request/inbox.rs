use crate::cli::GlobalFlags;
use crate::commands::shared::actor::require_actor;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    user: Option<&str>,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let user = match user {
        Some(user) => user,
        None => require_actor(flags)?,
    };
    let limit = effective_limit(limit, flags.limit, ctx.config.general.default_limit);
    let requests = ctx.engine.assigned_to(user, Some(limit)).await?;
    output(&requests, flags.format)
}

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CommentArgs;
use crate::commands::shared::actor::require_actor;
use crate::context::AppContext;
use crate::output::output;

/// Handle `ddt comment`.
pub async fn handle(args: &CommentArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = require_actor(flags)?;
    let outcome = ctx.engine.add_comment(&args.id, &args.text, actor).await?;
    output(&outcome, flags.format)
}

use drawdown_core::enums::Decision;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{ApproveArgs, RejectArgs};
use crate::commands::shared::actor::require_actor;
use crate::context::AppContext;
use crate::output::output;

/// Handle `ddt approve`.
pub async fn approve(args: &ApproveArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = require_actor(flags)?;
    let outcome = ctx
        .engine
        .transition(&args.id, Decision::Approve, args.comments.as_deref(), actor)
        .await?;
    output(&outcome, flags.format)
}

/// Handle `ddt reject`.
pub async fn reject(args: &RejectArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = require_actor(flags)?;
    let outcome = ctx
        .engine
        .transition(&args.id, Decision::Reject, Some(&args.comments), actor)
        .await?;
    output(&outcome, flags.format)
}

use anyhow::Context;
use drawdown_db::error::DatabaseError;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, active: bool, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let user = match ctx.service().set_user_active(id, active).await {
        Err(DatabaseError::NoResult) => anyhow::bail!("user not found: {id}"),
        other => other.with_context(|| format!("failed to update user {id}"))?,
    };
    tracing::info!(user_id = %user.id, active, "user activation changed");
    output(&user, flags.format)
}

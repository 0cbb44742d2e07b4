use drawdown_core::store::WorkflowStore;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let user = ctx.service().get_user(id).await?;
    output(&user, flags.format)
}

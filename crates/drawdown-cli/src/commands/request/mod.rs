mod create;
mod get;
mod inbox;
mod list;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RequestCommands;
use crate::context::AppContext;

/// Handle `ddt request`.
pub async fn handle(
    action: &RequestCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        RequestCommands::Create(args) => create::run(args, ctx, flags).await,
        RequestCommands::Get { id } => get::run(id, ctx, flags).await,
        RequestCommands::List {
            stage,
            region,
            assigned_to,
            created_by,
            limit,
        } => {
            let filters = list::Filters {
                stage: stage.as_deref(),
                region: region.as_deref(),
                assigned_to: assigned_to.as_deref(),
                created_by: created_by.as_deref(),
            };
            list::run(&filters, *limit, ctx, flags).await
        }
        RequestCommands::Inbox { user, limit } => {
            inbox::run(user.as_deref(), *limit, ctx, flags).await
        }
    }
}

mod add;
mod get;
mod list;
mod set_active;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::context::AppContext;

/// Handle `ddt user`.
pub async fn handle(action: &UserCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        UserCommands::Add {
            name,
            email,
            role,
            region,
        } => add::run(name, email.as_deref(), role, region.as_deref(), ctx, flags).await,
        UserCommands::List { role, region, all } => {
            list::run(role.as_deref(), region.as_deref(), *all, ctx, flags).await
        }
        UserCommands::Get { id } => get::run(id, ctx, flags).await,
        UserCommands::Deactivate { id } => set_active::run(id, false, ctx, flags).await,
        UserCommands::Activate { id } => set_active::run(id, true, ctx, flags).await,
    }
}

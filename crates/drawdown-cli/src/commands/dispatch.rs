use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::User { action } => commands::user::handle(&action, ctx, flags).await,
        Commands::Request { action } => commands::request::handle(&action, ctx, flags).await,
        Commands::Approve(args) => commands::transition::approve(&args, ctx, flags).await,
        Commands::Reject(args) => commands::transition::reject(&args, ctx, flags).await,
        Commands::Update(args) => commands::edit::update(&args, ctx, flags).await,
        Commands::ModifyApprove(args) => commands::edit::modify_approve(&args, ctx, flags).await,
        Commands::Comment(args) => commands::comment::handle(&args, ctx, flags).await,
        Commands::History(args) => commands::history::handle(&args, ctx, flags).await,
        Commands::Permissions(args) => commands::permissions::handle(&args, ctx, flags),
        Commands::Countries(_) | Commands::Schema(_) => {
            anyhow::bail!("countries/schema are handled before the database is opened")
        }
    }
}

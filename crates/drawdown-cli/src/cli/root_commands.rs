use clap::{Args, Subcommand};

use crate::cli::subcommands::{RequestCommands, UserCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Users directory.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Withdrawal requests.
    Request {
        #[command(subcommand)]
        action: RequestCommands,
    },
    /// Approve a request at its current stage.
    Approve(ApproveArgs),
    /// Reject a request at its current stage.
    Reject(RejectArgs),
    /// Edit request fields without moving it.
    Update(UpdateArgs),
    /// Edit request fields, then approve.
    #[command(name = "modify-approve")]
    ModifyApprove(ModifyApproveArgs),
    /// Add a comment to a request's audit trail.
    Comment(CommentArgs),
    /// Show the audit trail of a request.
    History(HistoryArgs),
    /// List supported countries and their regions.
    Countries(CountriesArgs),
    /// Show what a role may do.
    Permissions(PermissionsArgs),
    /// Dump JSON schema for a registered type.
    Schema(SchemaArgs),
}

/// Arguments for `ddt approve`.
#[derive(Clone, Debug, Args)]
pub struct ApproveArgs {
    pub id: String,
    #[arg(long)]
    pub comments: Option<String>,
}

/// Arguments for `ddt reject`.
#[derive(Clone, Debug, Args)]
pub struct RejectArgs {
    pub id: String,
    #[arg(long)]
    pub comments: String,
}

/// Editable request fields.
#[derive(Clone, Debug, Default, Args)]
pub struct FieldArgs {
    #[arg(long)]
    pub project: Option<String>,
    #[arg(long)]
    pub reference: Option<String>,
    #[arg(long)]
    pub beneficiary: Option<String>,
    #[arg(long)]
    pub amount: Option<String>,
    #[arg(long)]
    pub currency: Option<String>,
}

/// Arguments for `ddt update`.
#[derive(Clone, Debug, Args)]
pub struct UpdateArgs {
    pub id: String,
    #[command(flatten)]
    pub fields: FieldArgs,
}

/// Arguments for `ddt modify-approve`.
#[derive(Clone, Debug, Args)]
pub struct ModifyApproveArgs {
    pub id: String,
    #[command(flatten)]
    pub fields: FieldArgs,
    #[arg(long)]
    pub comments: Option<String>,
}

/// Arguments for `ddt comment`.
#[derive(Clone, Debug, Args)]
pub struct CommentArgs {
    pub id: String,
    pub text: String,
}

/// Arguments for `ddt history`.
#[derive(Clone, Debug, Args)]
pub struct HistoryArgs {
    pub id: String,
    #[arg(long)]
    pub limit: Option<u32>,
}

/// Arguments for `ddt countries`.
#[derive(Clone, Debug, Args)]
pub struct CountriesArgs {
    /// Only countries routed to this region.
    #[arg(long)]
    pub region: Option<String>,
    /// Resolve a single country name instead of listing.
    #[arg(long)]
    pub lookup: Option<String>,
}

/// Arguments for `ddt permissions`.
#[derive(Clone, Debug, Args)]
pub struct PermissionsArgs {
    /// Role to inspect (all roles when omitted).
    #[arg(long)]
    pub role: Option<String>,
}

/// Arguments for `ddt schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type name (omit to list registered names).
    pub type_name: Option<String>,
}

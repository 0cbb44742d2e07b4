use clap::{Args, Subcommand};

/// Withdrawal request commands.
#[derive(Clone, Debug, Subcommand)]
pub enum RequestCommands {
    /// Create a request.
    Create(CreateRequestArgs),
    /// Get a request by ID.
    Get { id: String },
    /// List requests.
    List {
        #[arg(long)]
        stage: Option<String>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        assigned_to: Option<String>,
        #[arg(long)]
        created_by: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Requests assigned to a user (defaults to `--as`).
    Inbox {
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
}

/// Arguments for `ddt request create`.
#[derive(Clone, Debug, Args)]
pub struct CreateRequestArgs {
    #[arg(long)]
    pub project: String,
    #[arg(long)]
    pub reference: String,
    #[arg(long)]
    pub country: String,
    #[arg(long)]
    pub beneficiary: String,
    #[arg(long)]
    pub amount: String,
    /// Falls back to `general.default_currency`.
    #[arg(long)]
    pub currency: Option<String>,
    /// Open as a draft for the archive team instead of submitting.
    #[arg(long)]
    pub draft: bool,
}

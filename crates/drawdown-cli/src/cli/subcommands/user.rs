use clap::Subcommand;

/// Users directory commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Add a user.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: String,
        /// Region, required for operations team members.
        #[arg(long)]
        region: Option<String>,
    },
    /// List users.
    List {
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        region: Option<String>,
        /// Include inactive users.
        #[arg(long)]
        all: bool,
    },
    /// Get a user by ID.
    Get { id: String },
    /// Mark a user inactive.
    Deactivate { id: String },
    /// Mark a user active again.
    Activate { id: String },
}

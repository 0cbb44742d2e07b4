use drawdown_core::enums::{Region, Role};
use drawdown_core::store::UserFilter;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_opt_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    role: Option<&str>,
    region: Option<&str>,
    include_inactive: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let filter = UserFilter {
        role: parse_opt_enum::<Role>(role, "role")?,
        regional_assignment: parse_opt_enum::<Region>(region, "region")?,
        active_only: !include_inactive,
    };
    let users = ctx.service().list_users(&filter).await?;
    output(&users, flags.format)
}

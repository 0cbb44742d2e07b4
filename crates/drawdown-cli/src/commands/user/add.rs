use drawdown_core::enums::{Region, Role};

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::{parse_enum, parse_opt_enum};
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    name: &str,
    email: Option<&str>,
    role: &str,
    region: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("user name must not be empty");
    }
    let role = parse_enum::<Role>(role, "role")?;
    let region = parse_opt_enum::<Region>(region, "region")?;
    check_region(role, region)?;

    let user = ctx.service().create_user(name, email, role, region).await?;
    output(&user, flags.format)
}

/// Operations team members review one region and must carry it.
fn check_region(role: Role, region: Option<Region>) -> anyhow::Result<()> {
    if role == Role::OperationsTeam && region.is_none() {
        anyhow::bail!("operations team members need --region");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use drawdown_core::enums::{Region, Role};

    use super::check_region;

    #[test]
    fn operations_team_requires_region() {
        assert!(check_region(Role::OperationsTeam, None).is_err());
        assert!(check_region(Role::OperationsTeam, Some(Region::Asia)).is_ok());
        assert!(check_region(Role::CoreBanking, None).is_ok());
    }
}

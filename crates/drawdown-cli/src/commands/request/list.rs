use drawdown_core::enums::{Region, Stage};
use drawdown_core::store::RequestFilter;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_opt_enum;
use crate::context::AppContext;
use crate::output::output;

/// Raw filter flags of `ddt request list`.
pub struct Filters<'a> {
    pub stage: Option<&'a str>,
    pub region: Option<&'a str>,
    pub assigned_to: Option<&'a str>,
    pub created_by: Option<&'a str>,
}

pub async fn run(
    filters: &Filters<'_>,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let limit = effective_limit(limit, flags.limit, ctx.config.general.default_limit);
    let filter = RequestFilter {
        stage: parse_opt_enum::<Stage>(filters.stage, "stage")?,
        region: parse_opt_enum::<Region>(filters.region, "region")?,
        assigned_to: filters.assigned_to.map(String::from),
        created_by: filters.created_by.map(String::from),
        limit: Some(limit),
    };
    let requests = ctx.engine.list(&filter).await?;
    output(&requests, flags.format)
}

use drawdown_core::enums::Region;
use drawdown_workflow::region;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CountriesArgs;
use crate::commands::shared::parse::parse_opt_enum;
use crate::output::output;

#[derive(Debug, Serialize, PartialEq, Eq)]
struct CountryRoute {
    country: &'static str,
    region: Region,
}

/// Handle `ddt countries`.
pub fn handle(args: &CountriesArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(name) = args.lookup.as_deref() {
        let route = lookup(name).ok_or_else(|| anyhow::anyhow!("Unsupported country: {name}"))?;
        return output(&route, flags.format);
    }
    let region = parse_opt_enum::<Region>(args.region.as_deref(), "region")?;
    output(&routes(region), flags.format)
}

fn lookup(name: &str) -> Option<CountryRoute> {
    let country = region::canonical_country(name)?;
    Some(CountryRoute {
        country,
        region: region::region_for(country)?,
    })
}

fn routes(filter: Option<Region>) -> Vec<CountryRoute> {
    let countries = match filter {
        Some(region) => region::countries_in(region),
        None => region::supported_countries(),
    };
    countries
        .into_iter()
        .filter_map(|country| {
            region::region_for(country).map(|region| CountryRoute { country, region })
        })
        .collect()
}

use drawdown_workflow::form::WithdrawalForm;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CreateRequestArgs;
use crate::commands::shared::actor::require_actor;
use crate::commands::shared::parse::parse_amount;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(args: &CreateRequestArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let creator = require_actor(flags)?;
    let form = WithdrawalForm {
        project_number: args.project.clone(),
        reference_number: args.reference.clone(),
        country: args.country.clone(),
        beneficiary_name: args.beneficiary.clone(),
        amount: parse_amount(&args.amount)?,
        currency: args
            .currency
            .clone()
            .unwrap_or_else(|| ctx.config.general.default_currency.clone()),
    };

    let outcome = if args.draft {
        ctx.engine.create_draft(&form, creator).await?
    } else {
        ctx.engine.create_request(&form, creator).await?
    };
    output(&outcome, flags.format)
}

use drawdown_core::updates::FieldsUpdate;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{FieldArgs, ModifyApproveArgs, UpdateArgs};
use crate::commands::shared::actor::require_actor;
use crate::commands::shared::parse::parse_amount;
use crate::context::AppContext;
use crate::output::output;

/// Handle `ddt update`.
pub async fn update(args: &UpdateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = require_actor(flags)?;
    let update = fields_update(&args.fields)?;
    let outcome = ctx.engine.update_fields(&args.id, &update, actor).await?;
    output(&outcome, flags.format)
}

/// Handle `ddt modify-approve`.
pub async fn modify_approve(
    args: &ModifyApproveArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = require_actor(flags)?;
    let update = fields_update(&args.fields)?;
    let outcome = ctx
        .engine
        .modify_and_approve(&args.id, &update, args.comments.as_deref(), actor)
        .await?;
    output(&outcome, flags.format)
}

fn fields_update(fields: &FieldArgs) -> anyhow::Result<FieldsUpdate> {
    Ok(FieldsUpdate {
        project_number: fields.project.clone(),
        reference_number: fields.reference.clone(),
        beneficiary_name: fields.beneficiary.clone(),
        amount: fields.amount.as_deref().map(parse_amount).transpose()?,
        currency: fields.currency.clone(),
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::fields_update;
    use crate::cli::root_commands::FieldArgs;

    #[test]
    fn maps_flags_to_update() {
        let update = fields_update(&FieldArgs {
            amount: Some("90000".into()),
            currency: Some("eur".into()),
            ..FieldArgs::default()
        })
        .unwrap();
        assert_eq!(update.amount, Some(Decimal::new(90_000, 0)));
        assert_eq!(update.currency.as_deref(), Some("eur"));
        assert_eq!(update.project_number, None);
    }

    #[test]
    fn no_flags_is_an_empty_update() {
        assert!(fields_update(&FieldArgs::default()).unwrap().is_empty());
    }

    #[test]
    fn bad_amount_is_rejected() {
        let result = fields_update(&FieldArgs {
            amount: Some("lots".into()),
            ..FieldArgs::default()
        });
        assert!(result.is_err());
    }
}

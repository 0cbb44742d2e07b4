use drawdown_core::enums::{Action, Permission, Role, Stage};
use drawdown_workflow::permissions::PermissionTable;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PermissionsArgs;
use crate::commands::shared::parse::parse_opt_enum;
use crate::context::AppContext;
use crate::output::output;

/// Stage-scoped actions shown per role.
const STAGED_ACTIONS: [Action; 4] = [Action::Approve, Action::Reject, Action::Disburse, Action::Edit];

#[derive(Debug, Serialize)]
struct RoleSummary {
    role: Role,
    permissions: Vec<Permission>,
    acts_at: Vec<StagedAction>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct StagedAction {
    action: Action,
    stage: Stage,
}

/// Handle `ddt permissions`.
pub fn handle(args: &PermissionsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let roles = match parse_opt_enum::<Role>(args.role.as_deref(), "role")? {
        Some(role) => vec![role],
        None => Role::ALL.to_vec(),
    };
    let table = ctx.engine.permissions();
    let summaries: Vec<RoleSummary> = roles.into_iter().map(|role| summarize(table, role)).collect();
    output(&summaries, flags.format)
}

fn summarize(table: &PermissionTable, role: Role) -> RoleSummary {
    let acts_at = STAGED_ACTIONS
        .into_iter()
        .flat_map(|action| Stage::ALL.into_iter().map(move |stage| StagedAction { action, stage }))
        .filter(|staged| {
            !staged.stage.is_terminal()
                && table.can_perform_action(role, staged.action, Some(staged.stage))
        })
        .collect();
    RoleSummary {
        role,
        permissions: table.permissions_for(role),
        acts_at,
    }
}

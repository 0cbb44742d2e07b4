use drawdown_core::audit_detail::{
    AssignmentDetail, CreatedDetail, FieldsUpdatedDetail, TransitionDetail,
};
use drawdown_core::entities::{AuditEntry, UserProfile, WithdrawalRequest};
use drawdown_core::enums::{Region, Role, Stage};
use schemars::{Schema, schema_for};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Names accepted by `ddt schema`, in listing order.
pub const SCHEMA_NAMES: &[&str] = &[
    "withdrawal_request",
    "user_profile",
    "audit_entry",
    "created_detail",
    "transition_detail",
    "fields_updated_detail",
    "assignment_detail",
    "stage",
    "role",
    "region",
];

fn schema_of(name: &str) -> Option<Schema> {
    let schema = match name {
        "withdrawal_request" => schema_for!(WithdrawalRequest),
        "user_profile" => schema_for!(UserProfile),
        "audit_entry" => schema_for!(AuditEntry),
        "created_detail" => schema_for!(CreatedDetail),
        "transition_detail" => schema_for!(TransitionDetail),
        "fields_updated_detail" => schema_for!(FieldsUpdatedDetail),
        "assignment_detail" => schema_for!(AssignmentDetail),
        "stage" => schema_for!(Stage),
        "role" => schema_for!(Role),
        "region" => schema_for!(Region),
        _ => return None,
    };
    Some(schema)
}

/// Handle `ddt schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(name) = args.type_name.as_deref() else {
        return output(&SCHEMA_NAMES, flags.format);
    };
    let key = name.trim().to_ascii_lowercase().replace('-', "_");
    let schema = schema_of(&key).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown schema '{name}'; available: {}",
            SCHEMA_NAMES.join(", ")
        )
    })?;
    output(&schema, flags.format)
}

//! Audit trail repository (append-only).
//!
//! Entries are inserted and read; triggers in the schema reject UPDATE and
//! DELETE on `audit_trail`.

use drawdown_core::entities::{AuditEntry, NewAuditEntry};
use drawdown_core::enums::AuditAction;
use drawdown_core::ids::PREFIX_AUDIT;

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, opt_text, parse_datetime, parse_enum, parse_optional_decimal,
    parse_optional_enum, parse_optional_json,
};
use crate::service::DrawdownService;

const SELECT_COLS: &str = "id, request_id, actor_user_id, action, previous_stage, new_stage, \
     previous_status, new_status, amount_involved, comments, metadata, created_at";

const DEFAULT_AUDIT_LIMIT: u32 = 100;

/// Filter for audit queries. `None` fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub request_id: Option<String>,
    pub actor_user_id: Option<String>,
    pub action: Option<AuditAction>,
    pub limit: Option<u32>,
}

fn row_to_audit(row: &libsql::Row) -> Result<AuditEntry, DatabaseError> {
    Ok(AuditEntry {
        id: row.get(0)?,
        request_id: row.get(1)?,
        actor_user_id: row.get(2)?,
        action: parse_enum(&row.get::<String>(3)?)?,
        previous_stage: parse_optional_enum(get_opt_string(row, 4)?.as_deref())?,
        new_stage: parse_optional_enum(get_opt_string(row, 5)?.as_deref())?,
        previous_status: get_opt_string(row, 6)?,
        new_status: get_opt_string(row, 7)?,
        amount_involved: parse_optional_decimal(get_opt_string(row, 8)?.as_deref())?,
        comments: get_opt_string(row, 9)?,
        metadata: parse_optional_json(get_opt_string(row, 10)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(11)?)?,
    })
}

impl DrawdownService {
    /// Append an audit entry, assigning it an ID.
    pub async fn insert_audit(&self, entry: &NewAuditEntry) -> Result<AuditEntry, DatabaseError> {
        let id = self.db().generate_id(PREFIX_AUDIT).await?;
        let metadata_json = entry
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| DatabaseError::Query(format!("Failed to encode audit metadata: {e}")))?;
        let amount = entry.amount_involved.map(|a| a.to_string());

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO audit_trail ({SELECT_COLS}) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
                ),
                libsql::params![
                    id.as_str(),
                    entry.request_id.as_str(),
                    entry.actor_user_id.as_str(),
                    entry.action.as_str(),
                    opt_text(entry.previous_stage.map(|s| s.as_str())),
                    opt_text(entry.new_stage.map(|s| s.as_str())),
                    opt_text(entry.previous_status.as_deref()),
                    opt_text(entry.new_status.as_deref()),
                    opt_text(amount.as_deref()),
                    opt_text(entry.comments.as_deref()),
                    opt_text(metadata_json.as_deref()),
                    entry.created_at.to_rfc3339()
                ],
            )
            .await?;

        Ok(entry.clone().into_entry(id))
    }

    /// Query audit entries, newest first.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref request_id) = filter.request_id {
            params.push(libsql::Value::Text(request_id.clone()));
            conditions.push(format!("request_id = ?{}", params.len()));
        }
        if let Some(ref actor) = filter.actor_user_id {
            params.push(libsql::Value::Text(actor.clone()));
            conditions.push(format!("actor_user_id = ?{}", params.len()));
        }
        if let Some(action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(DEFAULT_AUDIT_LIMIT);

        let sql = format!(
            "SELECT {SELECT_COLS} FROM audit_trail {where_clause} \
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_audit(&row)?);
        }
        Ok(entries)
    }
}

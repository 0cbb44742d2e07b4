//! Withdrawal request repository.
//!
//! Updates are compare-and-set: every write names the version it was computed
//! from and bumps it on success. A write against a stale version matches no
//! rows and surfaces as `DatabaseError::Conflict`.

use chrono::{DateTime, Utc};

use drawdown_core::entities::{NewWithdrawalRequest, WithdrawalRequest};
use drawdown_core::ids::PREFIX_REQUEST;
use drawdown_core::store::RequestFilter;
use drawdown_core::updates::RequestPatch;

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, opt_text, parse_datetime, parse_decimal, parse_enum, parse_optional_datetime,
};
use crate::service::DrawdownService;

const SELECT_COLS: &str = "id, project_number, reference_number, country, beneficiary_name, \
     amount, currency, region, current_stage, status, assigned_to, \
     loan_admin_reviewed_by, loan_admin_reviewed_at, loan_admin_comments, \
     regional_ops_reviewed_by, regional_ops_reviewed_at, regional_ops_comments, \
     core_banking_processed_by, core_banking_processed_at, rejection_reason, completed_at, \
     created_by, created_at, updated_at, version";

const DEFAULT_LIST_LIMIT: u32 = 100;

fn row_to_request(row: &libsql::Row) -> Result<WithdrawalRequest, DatabaseError> {
    Ok(WithdrawalRequest {
        id: row.get(0)?,
        project_number: row.get(1)?,
        reference_number: row.get(2)?,
        country: row.get(3)?,
        beneficiary_name: row.get(4)?,
        amount: parse_decimal(&row.get::<String>(5)?)?,
        currency: row.get(6)?,
        region: parse_enum(&row.get::<String>(7)?)?,
        current_stage: parse_enum(&row.get::<String>(8)?)?,
        status: row.get(9)?,
        assigned_to: get_opt_string(row, 10)?,
        loan_admin_reviewed_by: get_opt_string(row, 11)?,
        loan_admin_reviewed_at: parse_optional_datetime(get_opt_string(row, 12)?.as_deref())?,
        loan_admin_comments: get_opt_string(row, 13)?,
        regional_ops_reviewed_by: get_opt_string(row, 14)?,
        regional_ops_reviewed_at: parse_optional_datetime(get_opt_string(row, 15)?.as_deref())?,
        regional_ops_comments: get_opt_string(row, 16)?,
        core_banking_processed_by: get_opt_string(row, 17)?,
        core_banking_processed_at: parse_optional_datetime(get_opt_string(row, 18)?.as_deref())?,
        rejection_reason: get_opt_string(row, 19)?,
        completed_at: parse_optional_datetime(get_opt_string(row, 20)?.as_deref())?,
        created_by: row.get(21)?,
        created_at: parse_datetime(&row.get::<String>(22)?)?,
        updated_at: parse_datetime(&row.get::<String>(23)?)?,
        version: row.get(24)?,
    })
}

fn push_set(sets: &mut Vec<String>, params: &mut Vec<libsql::Value>, column: &str, value: libsql::Value) {
    params.push(value);
    sets.push(format!("{column} = ?{}", params.len()));
}

fn text(value: &str) -> libsql::Value {
    libsql::Value::Text(value.to_string())
}

fn timestamp(value: DateTime<Utc>) -> libsql::Value {
    libsql::Value::Text(value.to_rfc3339())
}

/// Translate the `Some` fields of a patch into `column = ?n` fragments.
fn patch_sets(patch: &RequestPatch, sets: &mut Vec<String>, params: &mut Vec<libsql::Value>) {
    if let Some(ref v) = patch.project_number {
        push_set(sets, params, "project_number", text(v));
    }
    if let Some(ref v) = patch.reference_number {
        push_set(sets, params, "reference_number", text(v));
    }
    if let Some(ref v) = patch.beneficiary_name {
        push_set(sets, params, "beneficiary_name", text(v));
    }
    if let Some(v) = patch.amount {
        push_set(sets, params, "amount", text(&v.to_string()));
    }
    if let Some(ref v) = patch.currency {
        push_set(sets, params, "currency", text(v));
    }
    if let Some(v) = patch.current_stage {
        push_set(sets, params, "current_stage", text(v.as_str()));
    }
    if let Some(ref v) = patch.status {
        push_set(sets, params, "status", text(v));
    }
    if let Some(ref v) = patch.assigned_to {
        push_set(sets, params, "assigned_to", opt_text(v.as_deref()));
    }
    if let Some(ref v) = patch.loan_admin_reviewed_by {
        push_set(sets, params, "loan_admin_reviewed_by", text(v));
    }
    if let Some(v) = patch.loan_admin_reviewed_at {
        push_set(sets, params, "loan_admin_reviewed_at", timestamp(v));
    }
    if let Some(ref v) = patch.loan_admin_comments {
        push_set(sets, params, "loan_admin_comments", opt_text(v.as_deref()));
    }
    if let Some(ref v) = patch.regional_ops_reviewed_by {
        push_set(sets, params, "regional_ops_reviewed_by", text(v));
    }
    if let Some(v) = patch.regional_ops_reviewed_at {
        push_set(sets, params, "regional_ops_reviewed_at", timestamp(v));
    }
    if let Some(ref v) = patch.regional_ops_comments {
        push_set(sets, params, "regional_ops_comments", opt_text(v.as_deref()));
    }
    if let Some(ref v) = patch.core_banking_processed_by {
        push_set(sets, params, "core_banking_processed_by", text(v));
    }
    if let Some(v) = patch.core_banking_processed_at {
        push_set(sets, params, "core_banking_processed_at", timestamp(v));
    }
    if let Some(ref v) = patch.rejection_reason {
        push_set(sets, params, "rejection_reason", opt_text(v.as_deref()));
    }
    if let Some(v) = patch.completed_at {
        push_set(sets, params, "completed_at", timestamp(v));
    }
}

impl DrawdownService {
    pub async fn insert_request(
        &self,
        new: &NewWithdrawalRequest,
    ) -> Result<WithdrawalRequest, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_REQUEST).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO withdrawal_requests (id, project_number, reference_number, country, \
                 beneficiary_name, amount, currency, region, current_stage, status, assigned_to, \
                 created_by, created_at, updated_at, version) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, 1)",
                libsql::params![
                    id.as_str(),
                    new.project_number.as_str(),
                    new.reference_number.as_str(),
                    new.country.as_str(),
                    new.beneficiary_name.as_str(),
                    new.amount.to_string(),
                    new.currency.as_str(),
                    new.region.as_str(),
                    new.current_stage.as_str(),
                    new.status.as_str(),
                    opt_text(new.assigned_to.as_deref()),
                    new.created_by.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(request_id = %id, region = %new.region, stage = %new.current_stage, "inserted request");

        Ok(WithdrawalRequest {
            id,
            project_number: new.project_number.clone(),
            reference_number: new.reference_number.clone(),
            country: new.country.clone(),
            beneficiary_name: new.beneficiary_name.clone(),
            amount: new.amount,
            currency: new.currency.clone(),
            region: new.region,
            current_stage: new.current_stage,
            status: new.status.clone(),
            assigned_to: new.assigned_to.clone(),
            loan_admin_reviewed_by: None,
            loan_admin_reviewed_at: None,
            loan_admin_comments: None,
            regional_ops_reviewed_by: None,
            regional_ops_reviewed_at: None,
            regional_ops_comments: None,
            core_banking_processed_by: None,
            core_banking_processed_at: None,
            rejection_reason: None,
            completed_at: None,
            created_by: new.created_by.clone(),
            created_at: now,
            updated_at: now,
            version: 1,
        })
    }

    pub async fn find_request(&self, id: &str) -> Result<WithdrawalRequest, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM withdrawal_requests WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_request(&row)
    }

    /// Apply `patch` if the stored version still equals `expected_version`.
    ///
    /// # Errors
    ///
    /// `NoResult` if the request does not exist, `Conflict` if it exists at a
    /// different version.
    pub async fn patch_request(
        &self,
        id: &str,
        expected_version: i64,
        patch: &RequestPatch,
    ) -> Result<WithdrawalRequest, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        patch_sets(patch, &mut sets, &mut params);

        push_set(&mut sets, &mut params, "updated_at", timestamp(Utc::now()));
        sets.push("version = version + 1".to_string());

        params.push(text(id));
        let id_idx = params.len();
        params.push(libsql::Value::Integer(expected_version));
        let version_idx = params.len();

        let sql = format!(
            "UPDATE withdrawal_requests SET {} WHERE id = ?{id_idx} AND version = ?{version_idx}",
            sets.join(", ")
        );

        let changed = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        if changed == 0 {
            // Distinguish a missing row from a lost race.
            let current = self.find_request(id).await?;
            tracing::debug!(
                request_id = id,
                expected_version,
                actual_version = current.version,
                "request update lost compare-and-set"
            );
            return Err(DatabaseError::Conflict {
                id: id.to_string(),
                expected_version,
            });
        }

        self.find_request(id).await
    }

    /// List requests newest first.
    pub async fn list_requests_filtered(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<WithdrawalRequest>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(stage) = filter.stage {
            params.push(text(stage.as_str()));
            conditions.push(format!("current_stage = ?{}", params.len()));
        }
        if let Some(region) = filter.region {
            params.push(text(region.as_str()));
            conditions.push(format!("region = ?{}", params.len()));
        }
        if let Some(ref assignee) = filter.assigned_to {
            params.push(text(assignee));
            conditions.push(format!("assigned_to = ?{}", params.len()));
        }
        if let Some(ref creator) = filter.created_by {
            params.push(text(creator));
            conditions.push(format!("created_by = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(DEFAULT_LIST_LIMIT);

        let sql = format!(
            "SELECT {SELECT_COLS} FROM withdrawal_requests {where_clause} \
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut requests = Vec::new();
        while let Some(row) = rows.next().await? {
            requests.push(row_to_request(&row)?);
        }
        Ok(requests)
    }
}

//! User directory repository.
//!
//! The directory is owned by user management; the workflow reads it to pick
//! assignees and stamps `last_assigned_at`. Create and activation toggles exist
//! so the directory can be seeded and maintained from the CLI and tests.

use chrono::{DateTime, Utc};

use drawdown_core::entities::UserProfile;
use drawdown_core::enums::{Region, Role};
use drawdown_core::ids::PREFIX_USER;
use drawdown_core::store::UserFilter;

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, opt_text, parse_datetime, parse_enum, parse_optional_datetime,
    parse_optional_enum,
};
use crate::service::DrawdownService;

const SELECT_COLS: &str =
    "id, display_name, email, role, regional_assignment, is_active, last_assigned_at, created_at";

fn row_to_user(row: &libsql::Row) -> Result<UserProfile, DatabaseError> {
    Ok(UserProfile {
        id: row.get(0)?,
        display_name: row.get(1)?,
        email: get_opt_string(row, 2)?,
        role: parse_enum(&row.get::<String>(3)?)?,
        regional_assignment: parse_optional_enum(get_opt_string(row, 4)?.as_deref())?,
        is_active: row.get::<i64>(5)? != 0,
        last_assigned_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl DrawdownService {
    pub async fn create_user(
        &self,
        display_name: &str,
        email: Option<&str>,
        role: Role,
        regional_assignment: Option<Region>,
    ) -> Result<UserProfile, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_USER).await?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO users ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, 1, NULL, ?6)"),
                libsql::params![
                    id.as_str(),
                    display_name,
                    opt_text(email),
                    role.as_str(),
                    opt_text(regional_assignment.map(Region::as_str)),
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(user_id = %id, %role, "created user");

        Ok(UserProfile {
            id,
            display_name: display_name.to_string(),
            email: email.map(String::from),
            role,
            regional_assignment,
            is_active: true,
            last_assigned_at: None,
            created_at: now,
        })
    }

    pub async fn find_user(&self, id: &str) -> Result<UserProfile, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_user(&row)
    }

    /// List users matching `filter`, ordered by ID.
    pub async fn list_users(&self, filter: &UserFilter) -> Result<Vec<UserProfile>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(role) = filter.role {
            params.push(libsql::Value::Text(role.as_str().to_string()));
            conditions.push(format!("role = ?{}", params.len()));
        }
        if let Some(region) = filter.regional_assignment {
            params.push(libsql::Value::Text(region.as_str().to_string()));
            conditions.push(format!("regional_assignment = ?{}", params.len()));
        }
        if filter.active_only {
            conditions.push("is_active = 1".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users {where_clause} ORDER BY id"),
                libsql::params_from_iter(params),
            )
            .await?;

        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }

    pub async fn set_user_active(
        &self,
        id: &str,
        active: bool,
    ) -> Result<UserProfile, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE users SET is_active = ?1 WHERE id = ?2",
                libsql::params![i64::from(active), id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        tracing::debug!(user_id = id, active, "changed user activation");
        self.find_user(id).await
    }

    pub async fn touch_last_assigned(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE users SET last_assigned_at = ?1 WHERE id = ?2",
                libsql::params![at.to_rfc3339(), id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;

    #[tokio::test]
    async fn create_user_roundtrip() {
        let svc = test_service().await;
        let user = svc
            .create_user(
                "Amina",
                Some("amina@example.org"),
                Role::OperationsTeam,
                Some(Region::Africa),
            )
            .await
            .unwrap();

        assert!(user.id.starts_with("usr-"));
        let fetched = svc.find_user(&user.id).await.unwrap();
        assert_eq!(fetched, user);
    }

    #[tokio::test]
    async fn find_missing_user() {
        let svc = test_service().await;
        let result = svc.find_user("usr-00000000").await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn list_users_filters_role_region_and_activity() {
        let svc = test_service().await;
        let africa = svc
            .create_user("Ops Africa", None, Role::OperationsTeam, Some(Region::Africa))
            .await
            .unwrap();
        let asia = svc
            .create_user("Ops Asia", None, Role::OperationsTeam, Some(Region::Asia))
            .await
            .unwrap();
        svc.create_user("Admin", None, Role::Admin, None).await.unwrap();
        svc.set_user_active(&asia.id, false).await.unwrap();

        let ops = svc
            .list_users(&UserFilter {
                role: Some(Role::OperationsTeam),
                ..UserFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(ops.len(), 2);

        let active_africa = svc
            .list_users(&UserFilter::active_with_role(Role::OperationsTeam).in_region(Region::Africa))
            .await
            .unwrap();
        assert_eq!(active_africa.len(), 1);
        assert_eq!(active_africa[0].id, africa.id);

        let active_asia = svc
            .list_users(&UserFilter::active_with_role(Role::OperationsTeam).in_region(Region::Asia))
            .await
            .unwrap();
        assert!(active_asia.is_empty());

        let everyone_active = svc.list_users(&UserFilter::any_active()).await.unwrap();
        assert_eq!(everyone_active.len(), 2);
    }

    #[tokio::test]
    async fn touch_last_assigned_sets_timestamp() {
        let svc = test_service().await;
        let user = svc
            .create_user("Core", None, Role::CoreBanking, None)
            .await
            .unwrap();
        let at = Utc::now();
        svc.touch_last_assigned(&user.id, at).await.unwrap();

        let fetched = svc.find_user(&user.id).await.unwrap();
        assert_eq!(fetched.last_assigned_at, Some(at));

        let missing = svc.touch_last_assigned("usr-ffffffff", at).await;
        assert!(matches!(missing, Err(DatabaseError::NoResult)));
    }
}

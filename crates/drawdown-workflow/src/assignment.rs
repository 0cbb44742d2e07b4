//! Assignee resolution.
//!
//! For a stage and region the resolver walks a fixed chain: active users with
//! the stage's role (operations review also matches the region), then any
//! active admin, then any active user. The first non-empty step wins and the
//! step is reported as the [`FallbackLevel`]. The user directory is queried on
//! every call.

use drawdown_core::audit_detail::AssignmentDetail;
use drawdown_core::entities::UserProfile;
use drawdown_core::enums::{AssignmentPolicy, FallbackLevel, Region, Role, Stage};
use drawdown_core::errors::StoreError;
use drawdown_core::store::{UserFilter, WorkflowStore};
use serde::Serialize;

/// The user a request was handed to and how they were found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub user_id: String,
    pub fallback: FallbackLevel,
    /// The role the stage asked for, whether or not it was matched.
    pub required_role: Role,
}

impl Assignment {
    #[must_use]
    pub fn detail(&self, region: Region) -> AssignmentDetail {
        AssignmentDetail {
            assignee: self.user_id.clone(),
            fallback: self.fallback,
            required_role: Some(self.required_role),
            region,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AssignmentResolver {
    policy: AssignmentPolicy,
    allow_any_active: bool,
}

impl AssignmentResolver {
    #[must_use]
    pub const fn new(policy: AssignmentPolicy, allow_any_active: bool) -> Self {
        Self {
            policy,
            allow_any_active,
        }
    }

    #[must_use]
    pub const fn policy(&self) -> AssignmentPolicy {
        self.policy
    }

    /// Resolve the assignee for a request entering `stage` in `region`.
    ///
    /// Returns `Ok(None)` when the chain is exhausted, and for the terminal
    /// stage, which takes no assignee.
    ///
    /// # Errors
    ///
    /// Propagates directory read failures.
    pub async fn assignee_for<S: WorkflowStore>(
        &self,
        store: &S,
        stage: Stage,
        region: Region,
    ) -> Result<Option<Assignment>, StoreError> {
        let Some(required_role) = stage.responsible_role() else {
            return Ok(None);
        };

        let role_filter = if required_role == Role::OperationsTeam {
            UserFilter::active_with_role(required_role).in_region(region)
        } else {
            UserFilter::active_with_role(required_role)
        };

        let mut chain = vec![
            (FallbackLevel::RoleMatch, role_filter),
            (FallbackLevel::Admin, UserFilter::active_with_role(Role::Admin)),
        ];
        if self.allow_any_active {
            chain.push((FallbackLevel::AnyActiveUser, UserFilter::any_active()));
        }

        for (level, filter) in chain {
            let candidates = store.query_users(&filter).await?;
            if let Some(user) = pick(self.policy, &candidates) {
                if level.is_fallback() {
                    tracing::warn!(
                        %stage,
                        %region,
                        %required_role,
                        fallback = %level,
                        assignee = %user.id,
                        "no role match, assigned through fallback"
                    );
                } else {
                    tracing::debug!(%stage, %region, assignee = %user.id, "assigned by role");
                }
                return Ok(Some(Assignment {
                    user_id: user.id.clone(),
                    fallback: level,
                    required_role,
                }));
            }
            tracing::debug!(%stage, %region, level = %level, "no candidates at level");
        }

        tracing::warn!(%stage, %region, %required_role, "assignment chain exhausted");
        Ok(None)
    }
}

/// Choose among equally qualified candidates according to `policy`.
///
/// Inactive users are skipped even if the directory returned them.
#[must_use]
pub fn pick(policy: AssignmentPolicy, candidates: &[UserProfile]) -> Option<&UserProfile> {
    let active = candidates.iter().filter(|u| u.is_active);
    match policy {
        AssignmentPolicy::FirstById => active.min_by(|a, b| a.id.cmp(&b.id)),
        // `None` sorts before `Some`, so never-assigned users come first.
        AssignmentPolicy::LeastRecentlyAssigned => {
            active.min_by(|a, b| (a.last_assigned_at, &a.id).cmp(&(b.last_assigned_at, &b.id)))
        }
    }
}

//! Role-permission table.
//!
//! Two layers: a per-role permission set answering `has_permission`, and a
//! per-(action, stage) allow list consulted when an action is checked against
//! a concrete stage. Bypass roles skip the stage layer entirely. Without a
//! stage, an action is allowed if the role holds any permission the action
//! maps to.

use std::collections::{HashMap, HashSet};

use drawdown_core::enums::{Action, Permission, Role, Stage};

/// Immutable permission table, built once and shared by the engine.
#[derive(Debug, Clone, Default)]
pub struct PermissionTable {
    grants: HashMap<Role, HashSet<Permission>>,
    stage_actors: HashMap<(Action, Stage), HashSet<Role>>,
    bypass: HashSet<Role>,
}

impl PermissionTable {
    #[must_use]
    pub fn builder() -> PermissionTableBuilder {
        PermissionTableBuilder::default()
    }

    /// The production table.
    #[must_use]
    pub fn standard() -> Self {
        use Permission as P;

        let mut builder = Self::builder()
            .bypass(Role::Admin)
            .bypass(Role::LoanAdministrator)
            .grant(Role::Admin, Permission::ALL)
            .grant(Role::LoanAdministrator, Permission::ALL)
            .grant(
                Role::ArchiveTeam,
                [P::ViewRequests, P::CreateRequests, P::EditRequests, P::CommentOnRequests],
            )
            .grant(
                Role::OperationsTeam,
                [P::ViewRequests, P::EditRequests, P::ReviewOperations, P::CommentOnRequests],
            )
            .grant(
                Role::CoreBanking,
                [P::ViewRequests, P::ProcessDisbursements, P::CommentOnRequests],
            )
            .grant(Role::Observer, [P::ViewRequests]);

        for action in [Action::Approve, Action::Reject] {
            builder = builder
                .allow_at(action, Stage::Submitted, Role::ArchiveTeam)
                .allow_at(action, Stage::UnderOperationsReview, Role::OperationsTeam)
                .allow_at(action, Stage::Approved, Role::CoreBanking);
        }

        builder
            .allow_at(Action::Disburse, Stage::Approved, Role::CoreBanking)
            .allow_at(Action::Edit, Stage::Submitted, Role::ArchiveTeam)
            .allow_at(Action::Edit, Stage::ReturnedForModification, Role::ArchiveTeam)
            .allow_at(Action::Edit, Stage::UnderOperationsReview, Role::OperationsTeam)
            .build()
    }

    #[must_use]
    pub fn has_permission(&self, role: Role, permission: Permission) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|perms| perms.contains(&permission))
    }

    /// Whether `role` may perform `action`, optionally at a given stage.
    #[must_use]
    pub fn can_perform_action(&self, role: Role, action: Action, stage: Option<Stage>) -> bool {
        if self.bypass.contains(&role) {
            return true;
        }
        match (stage_scoped(action), stage) {
            (true, Some(stage)) => self
                .stage_actors
                .get(&(action, stage))
                .is_some_and(|roles| roles.contains(&role)),
            // Create is never stage-scoped: only the role-level grant matters.
            _ => required_permissions(action)
                .iter()
                .any(|p| self.has_permission(role, *p)),
        }
    }

    /// String entry point. Anything that fails to parse is denied.
    #[must_use]
    pub fn can_perform(&self, role: &str, action: &str, stage: Option<&str>) -> bool {
        let (Some(role), Some(action)) = (Role::parse(role), Action::parse(action)) else {
            return false;
        };
        let stage = match stage {
            Some(s) => match Stage::parse(s) {
                Some(stage) => Some(stage),
                None => return false,
            },
            None => None,
        };
        self.can_perform_action(role, action, stage)
    }

    /// Permissions held by `role`, sorted by wire name.
    #[must_use]
    pub fn permissions_for(&self, role: Role) -> Vec<Permission> {
        let mut perms: Vec<_> = self
            .grants
            .get(&role)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        perms.sort_unstable_by_key(|p| p.as_str());
        perms
    }
}

/// Actions whose allow list depends on the request's stage.
const fn stage_scoped(action: Action) -> bool {
    matches!(
        action,
        Action::Approve | Action::Reject | Action::Disburse | Action::Edit
    )
}

/// Role-level permissions satisfying `action` when no stage is given.
const fn required_permissions(action: Action) -> &'static [Permission] {
    match action {
        Action::Create => &[Permission::CreateRequests],
        Action::Approve | Action::Reject => &[
            Permission::ReviewLoans,
            Permission::ReviewOperations,
            Permission::ProcessDisbursements,
        ],
        Action::Disburse => &[Permission::ProcessDisbursements],
        Action::Edit => &[Permission::EditRequests],
        Action::Comment => &[Permission::CommentOnRequests],
        Action::View => &[Permission::ViewRequests],
    }
}

#[derive(Debug, Default)]
pub struct PermissionTableBuilder {
    table: PermissionTable,
}

impl PermissionTableBuilder {
    #[must_use]
    pub fn grant(mut self, role: Role, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.table.grants.entry(role).or_default().extend(permissions);
        self
    }

    #[must_use]
    pub fn allow_at(mut self, action: Action, stage: Stage, role: Role) -> Self {
        self.table
            .stage_actors
            .entry((action, stage))
            .or_default()
            .insert(role);
        self
    }

    #[must_use]
    pub fn bypass(mut self, role: Role) -> Self {
        self.table.bypass.insert(role);
        self
    }

    #[must_use]
    pub fn build(self) -> PermissionTable {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn table() -> PermissionTable {
        PermissionTable::standard()
    }

    #[test]
    fn bypass_roles_hold_everything() {
        let t = table();
        for role in [Role::Admin, Role::LoanAdministrator] {
            for permission in Permission::ALL {
                assert!(t.has_permission(role, permission), "{role} lacks {permission}");
            }
            for action in Action::ALL {
                for stage in Stage::ALL {
                    assert!(t.can_perform_action(role, action, Some(stage)));
                }
                assert!(t.can_perform_action(role, action, None));
            }
        }
    }

    #[test]
    fn only_archive_team_creates_among_non_bypass_roles() {
        let t = table();
        for role in Role::ALL.into_iter().filter(|r| !r.bypasses_stage_checks()) {
            assert_eq!(
                t.can_perform_action(role, Action::Create, None),
                role == Role::ArchiveTeam,
                "{role}"
            );
            assert_eq!(
                t.can_perform_action(role, Action::Create, Some(Stage::UnderLoanReview)),
                role == Role::ArchiveTeam,
                "{role}"
            );
        }
    }

    #[rstest]
    #[case(Role::OperationsTeam, Action::Approve, Stage::UnderOperationsReview, true)]
    #[case(Role::OperationsTeam, Action::Reject, Stage::UnderOperationsReview, true)]
    #[case(Role::OperationsTeam, Action::Approve, Stage::UnderLoanReview, false)]
    #[case(Role::OperationsTeam, Action::Disburse, Stage::Approved, false)]
    #[case(Role::CoreBanking, Action::Disburse, Stage::Approved, true)]
    #[case(Role::CoreBanking, Action::Reject, Stage::Approved, true)]
    #[case(Role::CoreBanking, Action::Approve, Stage::UnderOperationsReview, false)]
    #[case(Role::ArchiveTeam, Action::Approve, Stage::Submitted, true)]
    #[case(Role::ArchiveTeam, Action::Approve, Stage::UnderLoanReview, false)]
    #[case(Role::ArchiveTeam, Action::Approve, Stage::ReturnedForModification, false)]
    #[case(Role::ArchiveTeam, Action::Edit, Stage::ReturnedForModification, true)]
    #[case(Role::ArchiveTeam, Action::Edit, Stage::Approved, false)]
    #[case(Role::OperationsTeam, Action::Edit, Stage::UnderOperationsReview, true)]
    #[case(Role::Observer, Action::Comment, Stage::UnderLoanReview, false)]
    #[case(Role::Observer, Action::View, Stage::Disbursed, true)]
    #[case(Role::CoreBanking, Action::Comment, Stage::Submitted, true)]
    fn stage_matrix(
        #[case] role: Role,
        #[case] action: Action,
        #[case] stage: Stage,
        #[case] expected: bool,
    ) {
        assert_eq!(table().can_perform_action(role, action, Some(stage)), expected);
    }

    #[test]
    fn nobody_below_bypass_acts_on_disbursed() {
        let t = table();
        for role in Role::ALL.into_iter().filter(|r| !r.bypasses_stage_checks()) {
            for action in [Action::Approve, Action::Reject, Action::Disburse, Action::Edit] {
                assert!(!t.can_perform_action(role, action, Some(Stage::Disbursed)));
            }
        }
    }

    #[test]
    fn role_level_check_without_stage() {
        let t = table();
        assert!(t.can_perform_action(Role::OperationsTeam, Action::Approve, None));
        assert!(t.can_perform_action(Role::CoreBanking, Action::Disburse, None));
        assert!(!t.can_perform_action(Role::ArchiveTeam, Action::Disburse, None));
        assert!(!t.can_perform_action(Role::Observer, Action::Approve, None));
    }

    #[test]
    fn string_entry_point_fails_closed() {
        let t = table();
        assert!(t.can_perform("archive_team", "create", None));
        assert!(t.can_perform("OPERATIONS_TEAM", "approve", Some("under_operations_review")));
        assert!(!t.can_perform("superuser", "create", None));
        assert!(!t.can_perform("admin", "delete", None));
        assert!(!t.can_perform("admin", "approve", Some("archived")));
    }

    #[test]
    fn custom_tables_start_empty() {
        let t = PermissionTable::builder()
            .grant(Role::Observer, [Permission::CommentOnRequests])
            .build();
        assert!(t.can_perform_action(Role::Observer, Action::Comment, None));
        assert!(!t.can_perform_action(Role::Admin, Action::View, None));
        assert_eq!(
            t.permissions_for(Role::Observer),
            vec![Permission::CommentOnRequests]
        );
    }
}

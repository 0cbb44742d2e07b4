//! Stage, role, region, permission, and audit enums for Drawdown.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`,
//! which is also the form stored in SQL. The withdrawal stage machine lives on
//! [`Stage`]: `next()` is the transition table and `allowed_next_states()` is the
//! directed graph it walks.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Reviewer input driving a stage transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    /// Parse a decision, case-insensitively. Unknown values yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Workflow stage of a withdrawal request.
///
/// ```text
/// submitted → under_loan_review → under_operations_review → approved → disbursed
///                                        ↓ reject     ↑ approve
///                                 returned_for_modification
/// ```
///
/// Rejecting anywhere other than `under_operations_review` leaves the stage
/// unchanged. `disbursed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Submitted,
    UnderLoanReview,
    UnderOperationsReview,
    ReturnedForModification,
    Approved,
    Disbursed,
}

impl Stage {
    pub const ALL: [Self; 6] = [
        Self::Submitted,
        Self::UnderLoanReview,
        Self::UnderOperationsReview,
        Self::ReturnedForModification,
        Self::Approved,
        Self::Disbursed,
    ];

    /// Stages reachable by a single transition that actually moves the request.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Submitted => &[Self::UnderLoanReview],
            Self::UnderLoanReview => &[Self::UnderOperationsReview],
            Self::ReturnedForModification => &[Self::UnderOperationsReview],
            Self::UnderOperationsReview => &[Self::Approved, Self::ReturnedForModification],
            Self::Approved => &[Self::Disbursed],
            Self::Disbursed => &[],
        }
    }

    /// Check whether moving to `next` is an edge of the stage graph.
    ///
    /// Staying put is allowed for every non-terminal stage (no-op reject).
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        (next == self && !self.is_terminal()) || self.allowed_next_states().contains(&next)
    }

    /// The transition table. Returns `None` from the terminal stage.
    #[must_use]
    pub const fn next(self, decision: Decision) -> Option<Self> {
        match (self, decision) {
            (Self::Disbursed, _) => None,
            (Self::Submitted, Decision::Approve) => Some(Self::UnderLoanReview),
            (Self::UnderLoanReview | Self::ReturnedForModification, Decision::Approve) => {
                Some(Self::UnderOperationsReview)
            }
            (Self::UnderOperationsReview, Decision::Approve) => Some(Self::Approved),
            (Self::UnderOperationsReview, Decision::Reject) => Some(Self::ReturnedForModification),
            (Self::Approved, Decision::Approve) => Some(Self::Disbursed),
            (stage, Decision::Reject) => Some(stage),
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Disbursed)
    }

    /// Role responsible for acting on a request sitting in this stage.
    #[must_use]
    pub const fn responsible_role(self) -> Option<Role> {
        match self {
            Self::Submitted => Some(Role::ArchiveTeam),
            Self::UnderLoanReview | Self::ReturnedForModification => {
                Some(Role::LoanAdministrator)
            }
            Self::UnderOperationsReview => Some(Role::OperationsTeam),
            Self::Approved => Some(Role::CoreBanking),
            Self::Disbursed => None,
        }
    }

    /// Human-readable label used in status messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Submitted => "submission",
            Self::UnderLoanReview => "loan review",
            Self::UnderOperationsReview => "operations review",
            Self::ReturnedForModification => "modification",
            Self::Approved => "disbursement",
            Self::Disbursed => "completion",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::UnderLoanReview => "under_loan_review",
            Self::UnderOperationsReview => "under_operations_review",
            Self::ReturnedForModification => "returned_for_modification",
            Self::Approved => "approved",
            Self::Disbursed => "disbursed",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|stage| stage.as_str() == key)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Organisational role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    ArchiveTeam,
    OperationsTeam,
    CoreBanking,
    LoanAdministrator,
    Observer,
}

impl Role {
    pub const ALL: [Self; 6] = [
        Self::Admin,
        Self::ArchiveTeam,
        Self::OperationsTeam,
        Self::CoreBanking,
        Self::LoanAdministrator,
        Self::Observer,
    ];

    /// Roles that hold every permission and skip stage checks.
    #[must_use]
    pub const fn bypasses_stage_checks(self) -> bool {
        matches!(self, Self::Admin | Self::LoanAdministrator)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::ArchiveTeam => "archive_team",
            Self::OperationsTeam => "operations_team",
            Self::CoreBanking => "core_banking",
            Self::LoanAdministrator => "loan_administrator",
            Self::Observer => "observer",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|role| role.as_str() == key)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// Operational region a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Africa,
    Asia,
    EuropeLatinAmerica,
}

impl Region {
    pub const ALL: [Self; 3] = [Self::Africa, Self::Asia, Self::EuropeLatinAmerica];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Africa => "africa",
            Self::Asia => "asia",
            Self::EuropeLatinAmerica => "europe_latin_america",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Africa => "Africa",
            Self::Asia => "Asia",
            Self::EuropeLatinAmerica => "Europe & Latin America",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|region| region.as_str() == key)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Permission
// ---------------------------------------------------------------------------

/// Capability held by a role, independent of request stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewRequests,
    CreateRequests,
    EditRequests,
    ReviewLoans,
    ReviewOperations,
    ProcessDisbursements,
    CommentOnRequests,
    ViewAuditLog,
    ManageUsers,
}

impl Permission {
    pub const ALL: [Self; 9] = [
        Self::ViewRequests,
        Self::CreateRequests,
        Self::EditRequests,
        Self::ReviewLoans,
        Self::ReviewOperations,
        Self::ProcessDisbursements,
        Self::CommentOnRequests,
        Self::ViewAuditLog,
        Self::ManageUsers,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ViewRequests => "view_requests",
            Self::CreateRequests => "create_requests",
            Self::EditRequests => "edit_requests",
            Self::ReviewLoans => "review_loans",
            Self::ReviewOperations => "review_operations",
            Self::ProcessDisbursements => "process_disbursements",
            Self::CommentOnRequests => "comment_on_requests",
            Self::ViewAuditLog => "view_audit_log",
            Self::ManageUsers => "manage_users",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|p| p.as_str() == key)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// User-facing action checked against the permission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Approve,
    Reject,
    Disburse,
    Edit,
    Comment,
    View,
}

impl Action {
    pub const ALL: [Self; 7] = [
        Self::Create,
        Self::Approve,
        Self::Reject,
        Self::Disburse,
        Self::Edit,
        Self::Comment,
        Self::View,
    ];

    /// Action a decision amounts to at a given stage.
    ///
    /// Approving an `approved` request is the disbursement.
    #[must_use]
    pub const fn for_decision(decision: Decision, stage: Stage) -> Self {
        match (decision, stage) {
            (Decision::Approve, Stage::Approved) => Self::Disburse,
            (Decision::Approve, _) => Self::Approve,
            (Decision::Reject, _) => Self::Reject,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Disburse => "disburse",
            Self::Edit => "edit",
            Self::Comment => "comment",
            Self::View => "view",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|a| a.as_str() == key)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Type of action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Submitted,
    Approved,
    Rejected,
    Disbursed,
    Commented,
    Updated,
}

impl AuditAction {
    /// Audit action recorded for a transition out of `from`.
    #[must_use]
    pub const fn for_transition(decision: Decision, from: Stage) -> Self {
        match (decision, from) {
            (Decision::Reject, _) => Self::Rejected,
            (Decision::Approve, Stage::Submitted) => Self::Submitted,
            (Decision::Approve, Stage::Approved) => Self::Disbursed,
            (Decision::Approve, _) => Self::Approved,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Disbursed => "disbursed",
            Self::Commented => "commented",
            Self::Updated => "updated",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FallbackLevel
// ---------------------------------------------------------------------------

/// Which step of the assignment fallback chain produced the assignee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FallbackLevel {
    RoleMatch,
    Admin,
    AnyActiveUser,
}

impl FallbackLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RoleMatch => "role_match",
            Self::Admin => "admin",
            Self::AnyActiveUser => "any_active_user",
        }
    }

    /// Whether the ideal (role-matched) assignee was unavailable.
    #[must_use]
    pub const fn is_fallback(self) -> bool {
        !matches!(self, Self::RoleMatch)
    }
}

impl fmt::Display for FallbackLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AssignmentPolicy
// ---------------------------------------------------------------------------

/// Ordering applied among equally qualified assignment candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentPolicy {
    /// Oldest `last_assigned_at` first; never-assigned users lead. Ties by id.
    #[default]
    LeastRecentlyAssigned,
    /// Lexicographically smallest user id.
    FirstById,
}

impl AssignmentPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LeastRecentlyAssigned => "least_recently_assigned",
            Self::FirstById => "first_by_id",
        }
    }
}

impl fmt::Display for AssignmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(
        stage_under_ops,
        Stage,
        Stage::UnderOperationsReview,
        "under_operations_review"
    );
    test_serde_roundtrip!(
        stage_returned,
        Stage,
        Stage::ReturnedForModification,
        "returned_for_modification"
    );
    test_serde_roundtrip!(role_core_banking, Role, Role::CoreBanking, "core_banking");
    test_serde_roundtrip!(
        region_eu_latam,
        Region,
        Region::EuropeLatinAmerica,
        "europe_latin_america"
    );
    test_serde_roundtrip!(
        fallback_any,
        FallbackLevel,
        FallbackLevel::AnyActiveUser,
        "any_active_user"
    );
    test_serde_roundtrip!(
        policy_lra,
        AssignmentPolicy,
        AssignmentPolicy::LeastRecentlyAssigned,
        "least_recently_assigned"
    );

    // --- Transition table ---

    #[rstest]
    #[case(Stage::Submitted, Decision::Approve, Some(Stage::UnderLoanReview))]
    #[case(Stage::Submitted, Decision::Reject, Some(Stage::Submitted))]
    #[case(Stage::UnderLoanReview, Decision::Approve, Some(Stage::UnderOperationsReview))]
    #[case(Stage::UnderLoanReview, Decision::Reject, Some(Stage::UnderLoanReview))]
    #[case(
        Stage::ReturnedForModification,
        Decision::Approve,
        Some(Stage::UnderOperationsReview)
    )]
    #[case(
        Stage::ReturnedForModification,
        Decision::Reject,
        Some(Stage::ReturnedForModification)
    )]
    #[case(Stage::UnderOperationsReview, Decision::Approve, Some(Stage::Approved))]
    #[case(
        Stage::UnderOperationsReview,
        Decision::Reject,
        Some(Stage::ReturnedForModification)
    )]
    #[case(Stage::Approved, Decision::Approve, Some(Stage::Disbursed))]
    #[case(Stage::Approved, Decision::Reject, Some(Stage::Approved))]
    #[case(Stage::Disbursed, Decision::Approve, None)]
    #[case(Stage::Disbursed, Decision::Reject, None)]
    fn transition_table(
        #[case] from: Stage,
        #[case] decision: Decision,
        #[case] expected: Option<Stage>,
    ) {
        assert_eq!(from.next(decision), expected);
        // Same inputs, same answer.
        assert_eq!(from.next(decision), from.next(decision));
    }

    #[test]
    fn table_only_walks_graph_edges() {
        for stage in Stage::ALL {
            for decision in [Decision::Approve, Decision::Reject] {
                if let Some(next) = stage.next(decision) {
                    assert!(
                        stage.can_transition_to(next),
                        "{stage} --{decision}--> {next} is not a graph edge"
                    );
                }
            }
        }
    }

    #[test]
    fn approved_only_reachable_through_both_reviews() {
        // Breadth-first search over the table, tracking visited review stages.
        let mut frontier = vec![(Stage::Submitted, false, false)];
        let mut seen = std::collections::HashSet::new();
        while let Some((stage, loan, ops)) = frontier.pop() {
            if !seen.insert((stage, loan, ops)) {
                continue;
            }
            if stage == Stage::Approved {
                assert!(loan && ops, "reached approved without both reviews");
            }
            for decision in [Decision::Approve, Decision::Reject] {
                if let Some(next) = stage.next(decision) {
                    frontier.push((
                        next,
                        loan || stage == Stage::UnderLoanReview,
                        ops || stage == Stage::UnderOperationsReview,
                    ));
                }
            }
        }
    }

    #[test]
    fn disbursed_is_terminal() {
        assert!(Stage::Disbursed.is_terminal());
        assert!(Stage::Disbursed.allowed_next_states().is_empty());
        assert!(!Stage::Disbursed.can_transition_to(Stage::Disbursed));
        assert_eq!(Stage::Disbursed.responsible_role(), None);
    }

    #[test]
    fn responsible_roles() {
        assert_eq!(Stage::Submitted.responsible_role(), Some(Role::ArchiveTeam));
        assert_eq!(
            Stage::ReturnedForModification.responsible_role(),
            Some(Role::LoanAdministrator)
        );
        assert_eq!(
            Stage::UnderOperationsReview.responsible_role(),
            Some(Role::OperationsTeam)
        );
        assert_eq!(Stage::Approved.responsible_role(), Some(Role::CoreBanking));
    }

    #[test]
    fn decision_maps_to_action_and_audit_action() {
        assert_eq!(
            Action::for_decision(Decision::Approve, Stage::Approved),
            Action::Disburse
        );
        assert_eq!(
            Action::for_decision(Decision::Approve, Stage::UnderLoanReview),
            Action::Approve
        );
        assert_eq!(
            AuditAction::for_transition(Decision::Approve, Stage::Submitted),
            AuditAction::Submitted
        );
        assert_eq!(
            AuditAction::for_transition(Decision::Reject, Stage::Approved),
            AuditAction::Rejected
        );
    }

    #[rstest]
    #[case("admin", Some(Role::Admin))]
    #[case("  Loan_Administrator ", Some(Role::LoanAdministrator))]
    #[case("superuser", None)]
    #[case("", None)]
    fn role_parse(#[case] raw: &str, #[case] expected: Option<Role>) {
        assert_eq!(Role::parse(raw), expected);
    }

    #[test]
    fn parse_matches_as_str() {
        for stage in Stage::ALL {
            assert_eq!(Stage::parse(stage.as_str()), Some(stage));
        }
        for action in Action::ALL {
            assert_eq!(Action::parse(action.as_str()), Some(action));
        }
        for permission in Permission::ALL {
            assert_eq!(Permission::parse(permission.as_str()), Some(permission));
        }
        for region in Region::ALL {
            assert_eq!(Region::parse(region.as_str()), Some(region));
        }
        assert_eq!(Decision::parse("REJECT"), Some(Decision::Reject));
        assert_eq!(Decision::parse("maybe"), None);
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", Stage::UnderLoanReview), "under_loan_review");
        assert_eq!(format!("{}", Role::ArchiveTeam), "archive_team");
        assert_eq!(format!("{}", Region::Asia), "asia");
        assert_eq!(format!("{}", Permission::ManageUsers), "manage_users");
        assert_eq!(format!("{}", Action::Disburse), "disburse");
        assert_eq!(format!("{}", AuditAction::Commented), "commented");
        assert_eq!(format!("{}", FallbackLevel::Admin), "admin");
        assert_eq!(format!("{}", AssignmentPolicy::FirstById), "first_by_id");
    }
}

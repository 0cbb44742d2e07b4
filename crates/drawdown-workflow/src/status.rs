//! Human-readable status messages.
//!
//! The status of a request is regenerated on every transition from the
//! decision, the stage pair, the reviewer comments, and the region.

use drawdown_core::enums::{Decision, Region, Stage};

/// Status of a request created directly into loan review.
pub const CREATED_STATUS: &str = "Pending loan administrator review";

/// Status of a request created as a draft.
pub const DRAFT_STATUS: &str = "Draft, pending submission by archive team";

/// Compose the status for a transition from `from` to `to`.
///
/// Blank comments are treated as absent.
#[must_use]
pub fn compose_status(
    decision: Decision,
    from: Stage,
    to: Stage,
    comments: Option<&str>,
    region: Region,
) -> String {
    let comments = comments.map(str::trim).filter(|c| !c.is_empty());
    let region = region.label();

    match decision {
        Decision::Approve => {
            let base = match (from, to) {
                (Stage::Submitted, Stage::UnderLoanReview) => {
                    "Submitted, pending loan administrator review".to_string()
                }
                (Stage::UnderLoanReview, Stage::UnderOperationsReview) => {
                    format!("Approved by loan administrator, pending {region} operations review")
                }
                (Stage::ReturnedForModification, Stage::UnderOperationsReview) => {
                    format!("Modified and resubmitted, pending {region} operations review")
                }
                (Stage::UnderOperationsReview, Stage::Approved) => {
                    format!("Approved by {region} operations, pending core banking disbursement")
                }
                (Stage::Approved, Stage::Disbursed) => "Disbursed by core banking".to_string(),
                (_, to) => format!("Moved to {}", to.label()),
            };
            match comments {
                Some(c) => format!("{base} - {c}"),
                None => base,
            }
        }
        Decision::Reject => {
            let comments = comments.unwrap_or_default();
            if from == Stage::UnderOperationsReview && to == Stage::ReturnedForModification {
                format!("Returned for modification by {region} operations: {comments}")
            } else {
                format!("Rejected at {}: {comments}", from.label())
            }
        }
    }
}

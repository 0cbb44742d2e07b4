//! # drawdown-workflow
//!
//! The withdrawal request workflow: regional routing, the role-permission
//! table, assignee resolution, status messages, the audit logger, and the
//! [`WorkflowEngine`](engine::WorkflowEngine) that ties them together over a
//! [`WorkflowStore`](drawdown_core::store::WorkflowStore).
//!
//! A transition validates input, loads the request, authorizes the actor,
//! computes the next stage, resolves an assignee, persists with a version
//! check, appends an audit entry, and notifies the new assignee. Audit and
//! notification failures never abort a committed change.

pub mod assignment;
pub mod audit;
pub mod engine;
pub mod error;
pub mod form;
pub mod notify;
pub mod permissions;
pub mod region;
pub mod status;

pub use engine::{WorkflowEngine, WorkflowOutcome};
pub use error::{WorkflowError, WorkflowWarning};

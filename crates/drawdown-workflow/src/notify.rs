//! Notification seam.
//!
//! Delivery (email, in-app) lives outside the workflow. The engine calls
//! [`Notifier::notify`] after a change is committed and ignores the outcome.

use drawdown_core::enums::{Region, Stage};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationEvent {
    /// A request landed in the recipient's queue.
    Assigned,
    /// A request came back for modification.
    Returned,
    /// A reviewer rejected without moving the request.
    Rejected,
    /// The request was paid out.
    Disbursed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationContext {
    pub request_id: String,
    pub reference_number: String,
    pub stage: Stage,
    pub region: Region,
    pub status: String,
}

pub trait Notifier {
    fn notify(&self, event: NotificationEvent, recipient_user_id: &str, context: &NotificationContext);
}

/// Emits notifications as structured log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, event: NotificationEvent, recipient_user_id: &str, context: &NotificationContext) {
        tracing::info!(
            ?event,
            recipient = recipient_user_id,
            request_id = %context.request_id,
            reference = %context.reference_number,
            stage = %context.stage,
            region = %context.region,
            status = %context.status,
            "notification"
        );
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _: NotificationEvent, _: &str, _: &NotificationContext) {}
}

//! Entity structs for Drawdown domain objects.
//!
//! Each entity maps to a table in the reference libSQL store. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema`.

mod audit;
mod request;
mod user;

pub use audit::{AuditEntry, NewAuditEntry};
pub use request::{NewWithdrawalRequest, WithdrawalRequest};
pub use user::UserProfile;

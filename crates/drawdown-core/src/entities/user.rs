use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Region, Role};

/// A member of staff as seen by the workflow: role, region, and availability.
///
/// Owned by user management; the workflow only reads it, apart from stamping
/// `last_assigned_at` when the user receives a request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub regional_assignment: Option<Region>,
    pub is_active: bool,
    pub last_assigned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

//! ID prefix constants.
//!
//! Every entity ID is `{prefix}-{8 hex chars}`, e.g. `wdr-a3f8b2c1`.

pub const PREFIX_REQUEST: &str = "wdr";
pub const PREFIX_USER: &str = "usr";
pub const PREFIX_AUDIT: &str = "aud";

pub const ALL_PREFIXES: &[&str] = &[PREFIX_REQUEST, PREFIX_USER, PREFIX_AUDIT];

/// Check whether `id` carries the given prefix.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('-') && rest.len() > 1)
}

/// Upper bound on rows any list command fetches.
pub const MAX_LIMIT: u32 = 500;

/// Pick the row limit: a command's own `--limit`, else the global one, else
/// the configured default. Zero counts as unset; the result is capped at
/// [`MAX_LIMIT`].
#[must_use]
pub fn effective_limit(local: Option<u32>, global: Option<u32>, configured: u32) -> u32 {
    local
        .filter(|n| *n > 0)
        .or_else(|| global.filter(|n| *n > 0))
        .unwrap_or(configured)
        .clamp(1, MAX_LIMIT)
}

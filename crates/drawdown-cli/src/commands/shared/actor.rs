use crate::cli::GlobalFlags;

/// The `--as` user ID, required by every command that changes a request.
pub fn require_actor(flags: &GlobalFlags) -> anyhow::Result<&str> {
    flags
        .actor
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| anyhow::anyhow!("this command needs an acting user: pass --as <USER_ID>"))
}

#[cfg(test)]
mod tests {
    use super::require_actor;
    use crate::cli::{GlobalFlags, OutputFormat};

    fn flags(actor: Option<&str>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            limit: None,
            quiet: false,
            verbose: false,
            actor: actor.map(String::from),
            db: None,
        }
    }

    #[test]
    fn missing_or_blank_actor_is_an_error() {
        assert!(require_actor(&flags(None)).is_err());
        assert!(require_actor(&flags(Some("  "))).is_err());
    }

    #[test]
    fn actor_is_trimmed() {
        assert_eq!(require_actor(&flags(Some(" usr-1 "))).unwrap(), "usr-1");
    }
}

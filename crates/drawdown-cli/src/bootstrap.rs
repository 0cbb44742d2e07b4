use std::path::PathBuf;

use anyhow::Context;
use drawdown_config::DrawdownConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, then the layered config, then apply flag overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<DrawdownConfig> {
    load_dotenv()?;
    let mut config = DrawdownConfig::load().context("failed to load drawdown config")?;
    if let Some(path) = &flags.db {
        config.database.path.clone_from(path);
    }
    Ok(config)
}

fn load_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path: PathBuf = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

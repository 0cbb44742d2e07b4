use std::path::Path;

use anyhow::Context;
use drawdown_config::DrawdownConfig;
use drawdown_db::service::DrawdownService;
use drawdown_workflow::WorkflowEngine;
use drawdown_workflow::permissions::PermissionTable;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub engine: WorkflowEngine<DrawdownService>,
    pub config: DrawdownConfig,
}

impl AppContext {
    /// Open the configured database and build the workflow engine over it.
    pub async fn init(config: DrawdownConfig) -> anyhow::Result<Self> {
        if !config.database.is_in_memory() {
            ensure_parent_dir(Path::new(&config.database.path))?;
        }

        let service = DrawdownService::new_local(&config.database.path)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;
        tracing::debug!(path = %config.database.path, "database opened");

        let engine = WorkflowEngine::new(service, PermissionTable::standard(), &config.workflow);
        Ok(Self { engine, config })
    }

    pub const fn service(&self) -> &DrawdownService {
        self.engine.store()
    }
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))
        }
        _ => Ok(()),
    }
}

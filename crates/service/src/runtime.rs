//! Runtime environment helpers
//!
//! Startup checks plus backend construction, so binaries and the server crate
//! only need the loaded configuration.

use std::sync::Arc;

use configs::{AppConfig, StoreBackend};
use tracing::warn;

use crate::storage::{open_store, DocumentStore};

/// Ensure expected directories exist and open the configured document store.
pub async fn prepare_store(cfg: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match cfg.store.backend {
        StoreBackend::File => common::env::ensure_env(&cfg.server.static_dir, &cfg.store.data_dir).await?,
        StoreBackend::Firestore => {
            if tokio::fs::metadata(&cfg.server.static_dir).await.is_err() {
                warn!(static_dir = %cfg.server.static_dir, "static assets directory not found; /static will 404");
            }
        }
    }
    open_store(&cfg.store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_backend_gets_its_data_dir() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("clinic_runtime_{}", uuid::Uuid::new_v4()));
        let mut cfg = AppConfig::default();
        cfg.store.data_dir = dir.to_string_lossy().to_string();
        let store = prepare_store(&cfg).await?;
        assert!(store.list("staff").await?.is_empty());
        assert!(tokio::fs::metadata(&dir).await?.is_dir());
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}

use crate::config::AppConfig;
use crate::services::storage::LocalBlobStore;
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &AppConfig) -> anyhow::Result<Arc<LocalBlobStore>> {
    let root = &config.upload_dir;

    if !tokio::fs::try_exists(root).await? {
        info!("🪣 Upload directory '{}' not found, creating...", root.display());
        tokio::fs::create_dir_all(root).await?;
    }
    info!("✅ Upload directory '{}' is ready", root.display());

    Ok(Arc::new(LocalBlobStore::new(root.clone())))
}

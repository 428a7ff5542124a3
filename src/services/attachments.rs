use crate::api::error::AppError;
use crate::entities::complaints;
use crate::models::{Scope, Upload};
use crate::services::complaint_service::find_scoped;
use crate::services::partial_update::PartialUpdate;
use crate::services::storage::{BlobDeletion, BlobStore};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Links uploaded files to complaint rows and removes them again.
///
/// Blob deletion and the row update are not transactional. A crash between
/// the two leaves either a dangling path or an orphaned blob.
pub struct AttachmentManager {
    db: DatabaseConnection,
    blobs: Arc<dyn BlobStore>,
}

impl AttachmentManager {
    pub fn new(db: DatabaseConnection, blobs: Arc<dyn BlobStore>) -> Self {
        Self { db, blobs }
    }

    pub async fn attach(&self, upload: &Upload) -> Result<String, AppError> {
        let path = self
            .blobs
            .put(&upload.field_name, &upload.file_name, upload.data.clone())
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store attachment: {}", e)))?;

        tracing::info!(
            "📎 Stored attachment '{}' ({} bytes) at {}",
            upload.file_name,
            upload.data.len(),
            path
        );
        Ok(path)
    }

    /// Removes a blob stored for a write that never reached the row. Failures
    /// are logged only; the caller is already reporting another error.
    pub async fn discard(&self, path: &str) {
        match self.blobs.delete(path).await {
            Ok(_) => tracing::info!("🧹 Discarded unreferenced attachment {}", path),
            Err(e) => tracing::error!("Failed to discard attachment {}: {}", path, e),
        }
    }

    /// Deletes the blob behind the complaint's attachment and clears the path.
    ///
    /// The path is cleared even if the blob could not be removed; that failure
    /// is reported afterwards as `BlobDeleteFailed`.
    pub async fn detach(&self, scope: Scope, id: i32) -> Result<complaints::Model, AppError> {
        let complaint = find_scoped(&self.db, scope, id)
            .await?
            .ok_or_else(|| scope.not_found())?;
        let path = complaint.attachment_path.ok_or(AppError::NoAttachment)?;

        let removal = self.blobs.delete(&path).await;
        match &removal {
            Ok(BlobDeletion::Removed) => tracing::info!("🗑️  Deleted attachment {}", path),
            Ok(BlobDeletion::AlreadyAbsent) => {
                tracing::warn!("Attachment {} was already missing from storage", path)
            }
            Err(e) => tracing::error!("Failed to delete attachment {}: {}", path, e),
        }

        let cleared = PartialUpdate::new()
            .assign(complaints::Column::AttachmentPath, None::<String>)
            .execute(&self.db, id, scope.owner())
            .await?
            .ok_or_else(|| scope.not_found())?;

        removal.map_err(|e| AppError::BlobDeleteFailed(e.to_string()))?;
        Ok(cleared)
    }

    /// Returns the stored path and bytes of a visible complaint's attachment.
    pub async fn download(&self, scope: Scope, id: i32) -> Result<(String, Vec<u8>), AppError> {
        let complaint = find_scoped(&self.db, scope, id)
            .await?
            .ok_or_else(|| scope.not_found())?;
        let path = complaint
            .attachment_path
            .ok_or_else(|| AppError::NotFound("Attachment not found".to_string()))?;

        if !self.blobs.exists(&path).await? {
            tracing::warn!("Complaint {} references missing attachment {}", id, path);
            return Err(AppError::NotFound("Attachment not found".to_string()));
        }

        let data = self.blobs.read(&path).await?;
        Ok((path, data))
    }
}

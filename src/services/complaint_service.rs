use crate::api::error::AppError;
use crate::entities::{complaints, prelude::*};
use crate::models::{ComplaintChanges, NewComplaint, Scope, Upload};
use crate::services::attachments::AttachmentManager;
use crate::services::partial_update::{PartialUpdate, delete_statement};
use crate::services::storage::BlobStore;
use crate::utils::validation::validate_rating;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;

/// Looks up a complaint visible in `scope`.
pub(crate) async fn find_scoped<C: ConnectionTrait>(
    db: &C,
    scope: Scope,
    id: i32,
) -> Result<Option<complaints::Model>, AppError> {
    let mut query = Complaints::find_by_id(id);
    if let Some(owner) = scope.owner() {
        query = query.filter(complaints::Column::UserId.eq(owner));
    }
    Ok(query.one(db).await?)
}

pub struct ComplaintService {
    db: DatabaseConnection,
    attachments: AttachmentManager,
}

impl ComplaintService {
    pub fn new(db: DatabaseConnection, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            attachments: AttachmentManager::new(db.clone(), blobs),
            db,
        }
    }

    pub fn attachments(&self) -> &AttachmentManager {
        &self.attachments
    }

    /// Admins get every complaint by id; owners get their own, newest first.
    pub async fn list(&self, scope: Scope) -> Result<Vec<complaints::Model>, AppError> {
        let query = match scope {
            Scope::Admin => Complaints::find().order_by_asc(complaints::Column::Id),
            Scope::Owner(user_id) => Complaints::find()
                .filter(complaints::Column::UserId.eq(user_id))
                .order_by_desc(complaints::Column::Date),
        };
        Ok(query.all(&self.db).await?)
    }

    pub async fn get(&self, scope: Scope, id: i32) -> Result<complaints::Model, AppError> {
        find_scoped(&self.db, scope, id)
            .await?
            .ok_or_else(|| scope.not_found())
    }

    pub async fn create(
        &self,
        scope: Scope,
        payload: NewComplaint,
        upload: Option<Upload>,
    ) -> Result<complaints::Model, AppError> {
        let attachment_path = match &upload {
            Some(upload) => Some(self.attachments.attach(upload).await?),
            None => None,
        };
        let user_id = match scope {
            Scope::Admin => payload.user_id,
            Scope::Owner(user_id) => Some(user_id),
        };

        let inserted = complaints::ActiveModel {
            subject: Set(payload.subject),
            description: Set(payload.description),
            date: Set(chrono::Utc::now()),
            status: Set(payload.status),
            complaint_type: Set(payload.complaint_type),
            priority: Set(payload.priority),
            attachment_path: Set(attachment_path.clone()),
            user_id: Set(user_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await;

        let complaint = match inserted {
            Ok(complaint) => complaint,
            Err(e) => {
                if let Some(path) = &attachment_path {
                    self.attachments.discard(path).await;
                }
                return Err(e.into());
            }
        };

        tracing::info!("📝 Complaint {} created (user: {:?})", complaint.id, user_id);
        Ok(complaint)
    }

    /// Applies only the supplied fields. A new upload replaces
    /// `attachment_path`; the previous blob is left in place. The new blob is
    /// removed again when the row is missing or the write fails.
    pub async fn update(
        &self,
        scope: Scope,
        id: i32,
        changes: ComplaintChanges,
        upload: Option<Upload>,
    ) -> Result<complaints::Model, AppError> {
        let update = PartialUpdate::new()
            .set(complaints::Column::Subject, changes.subject)
            .set(complaints::Column::Description, changes.description)
            .set(complaints::Column::Status, changes.status)
            .set(complaints::Column::ComplaintType, changes.complaint_type)
            .set(complaints::Column::Priority, changes.priority);

        if update.is_empty() && upload.is_none() {
            return Err(AppError::NoFieldsToUpdate);
        }

        let attachment_path = match &upload {
            Some(upload) => Some(self.attachments.attach(upload).await?),
            None => None,
        };

        let result = update
            .set(complaints::Column::AttachmentPath, attachment_path.clone())
            .execute(&self.db, id, scope.owner())
            .await
            .and_then(|row| row.ok_or_else(|| scope.not_found()));

        let updated = match result {
            Ok(updated) => updated,
            Err(e) => {
                if let Some(path) = &attachment_path {
                    self.attachments.discard(path).await;
                }
                return Err(e);
            }
        };

        tracing::info!("✏️  Complaint {} updated", id);
        Ok(updated)
    }

    /// Removes the row and returns it. The attachment blob is not deleted.
    pub async fn delete(&self, scope: Scope, id: i32) -> Result<complaints::Model, AppError> {
        let stmt = self
            .db
            .get_database_backend()
            .build(&delete_statement(id, scope.owner()));

        let deleted = Complaints::find()
            .from_raw_sql(stmt)
            .one(&self.db)
            .await?
            .ok_or_else(|| scope.not_found())?;

        if let Some(path) = &deleted.attachment_path {
            tracing::warn!("Complaint {} deleted, attachment {} left in storage", id, path);
        }
        tracing::info!("🗑️  Complaint {} deleted", id);
        Ok(deleted)
    }

    /// Records a 1..=5 rating and an optional comment. The rating is checked
    /// before the store is touched.
    pub async fn submit_feedback(
        &self,
        scope: Scope,
        id: i32,
        rating: i64,
        comment: Option<String>,
    ) -> Result<complaints::Model, AppError> {
        let rating = validate_rating(rating)?;

        PartialUpdate::new()
            .assign(complaints::Column::Rating, rating)
            .assign(complaints::Column::FeedbackComment, comment)
            .execute(&self.db, id, scope.owner())
            .await?
            .ok_or_else(|| scope.not_found())
    }
}

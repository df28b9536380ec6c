use super::models::{ActiveModel, Attachment, AttachmentCreate, Column, Entity};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::identity::Actor;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

/// Newest upload first
pub async fn list_attachments<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
) -> BusinessResult<Vec<Attachment>> {
    Entity::find()
        .filter(Column::TrialId.eq(trial_id))
        .order_by_desc(Column::UploadedAt)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_attachment"))
}

/// Records metadata for a file that has already been uploaded
pub async fn record_attachment<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    data: AttachmentCreate,
    actor: Option<&Actor>,
) -> BusinessResult<Attachment> {
    let attachment = ActiveModel {
        id: Set(Uuid::new_v4()),
        trial_id: Set(trial_id),
        file_name: Set(data.file_name),
        file_path: Set(data.file_path),
        file_type: Set(data.file_type),
        file_size: Set(data.file_size),
        description: Set(data.description),
        attachment_type: Set(data.attachment_type),
        uploaded_by: Set(actor.map(|a| a.user_id)),
        uploaded_at: Set(chrono::Utc::now()),
    };

    attachment
        .insert(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_attachment"))
}

pub async fn delete_attachment<C: ConnectionTrait>(db: &C, id: Uuid) -> BusinessResult<()> {
    Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_attachment"))?;
    Ok(())
}

use super::models::{ActiveModel, Column, Entity, Note, NoteCreate, NoteUpdate};
use crate::common::errors::{BusinessError, BusinessResult, DbErrorExt};
use crate::common::identity::Actor;
use crate::{not_found, validation_error};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

fn required_title(title: &str) -> BusinessResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(validation_error!("title", "Note title is required."));
    }
    Ok(title.to_string())
}

/// Notes of a trial, newest first
pub async fn list_notes<C: ConnectionTrait>(db: &C, trial_id: Uuid) -> BusinessResult<Vec<Note>> {
    Entity::find()
        .filter(Column::TrialId.eq(trial_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_note"))
}

/// Stores a note authored by `actor`
pub async fn create_note<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    data: NoteCreate,
    actor: Option<&Actor>,
) -> BusinessResult<Note> {
    let actor = actor.ok_or(BusinessError::Unauthenticated)?;
    let now = chrono::Utc::now();
    let note = ActiveModel {
        id: Set(Uuid::new_v4()),
        trial_id: Set(trial_id),
        title: Set(required_title(&data.title)?),
        content: Set(data.content),
        author_id: Set(actor.user_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    note.insert(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_note"))
}

pub async fn update_note<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    data: NoteUpdate,
) -> BusinessResult<Note> {
    let existing = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_note"))?
        .ok_or_else(|| not_found!("Note", id))?;

    let mut note: ActiveModel = existing.into();
    if let Some(title) = data.title {
        note.title = Set(required_title(&title)?);
    }
    if let Some(content) = data.content {
        note.content = Set(content);
    }
    note.updated_at = Set(chrono::Utc::now());

    note.update(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_note"))
}

pub async fn delete_note<C: ConnectionTrait>(db: &C, id: Uuid) -> BusinessResult<()> {
    let result = Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_note"))?;
    if result.rows_affected == 0 {
        return Err(not_found!("Note", id));
    }
    Ok(())
}

use super::models::{ActiveModel, Column, Entity, Task, TaskCreate, TaskUpdate};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::not_found;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

pub async fn list_tasks<C: ConnectionTrait>(db: &C, trial_id: Uuid) -> BusinessResult<Vec<Task>> {
    Entity::find()
        .filter(Column::TrialId.eq(trial_id))
        .order_by_asc(Column::DueDate)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_task"))
}

pub async fn create_task<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    data: TaskCreate,
) -> BusinessResult<Task> {
    let now = chrono::Utc::now();
    let task = ActiveModel {
        id: Set(Uuid::new_v4()),
        trial_id: Set(trial_id),
        title: Set(data.title),
        description: Set(data.description),
        due_date: Set(data.due_date),
        status: Set(data.status),
        responsible_person_id: Set(data.responsible_person_id),
        priority: Set(data.priority),
        created_at: Set(now),
        updated_at: Set(now),
    };

    task.insert(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_task"))
}

pub async fn update_task<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    data: TaskUpdate,
) -> BusinessResult<Task> {
    let existing = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_task"))?
        .ok_or_else(|| not_found!("Task", id))?;

    let mut task: ActiveModel = existing.into();
    if let Some(title) = data.title {
        task.title = Set(title);
    }
    if let Some(description) = data.description {
        task.description = Set(description);
    }
    if let Some(due_date) = data.due_date {
        task.due_date = Set(due_date);
    }
    if let Some(status) = data.status {
        task.status = Set(status);
    }
    if let Some(responsible_person_id) = data.responsible_person_id {
        task.responsible_person_id = Set(responsible_person_id);
    }
    if let Some(priority) = data.priority {
        task.priority = Set(priority);
    }
    task.updated_at = Set(chrono::Utc::now());

    task.update(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_task"))
}

pub async fn delete_task<C: ConnectionTrait>(db: &C, id: Uuid) -> BusinessResult<()> {
    Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_task"))?;
    Ok(())
}

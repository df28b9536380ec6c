use super::models::{ActiveModel, Column, Entity, Variable, VariableCreate, VariableUpdate};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::{not_found, validation_error};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_name(name: &str) -> BusinessResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(validation_error!("name", "Variable name is required."));
    }
    Ok(name.to_string())
}

pub async fn list_variables<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
) -> BusinessResult<Vec<Variable>> {
    Entity::find()
        .filter(Column::TrialId.eq(trial_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_variable"))
}

pub async fn get_variable<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> BusinessResult<Option<Variable>> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_variable"))
}

pub async fn create_variable<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    data: VariableCreate,
) -> BusinessResult<Variable> {
    let now = chrono::Utc::now();
    let variable = ActiveModel {
        id: Set(Uuid::new_v4()),
        trial_id: Set(trial_id),
        name: Set(required_name(&data.name)?),
        unit: Set(clean(data.unit)),
        frequency: Set(clean(data.frequency)),
        description: Set(clean(data.description)),
        data_type: Set(clean(data.data_type)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    variable
        .insert(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_variable"))
}

pub async fn update_variable<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    data: VariableUpdate,
) -> BusinessResult<Variable> {
    let existing = get_variable(db, id)
        .await?
        .ok_or_else(|| not_found!("Variable", id))?;

    let mut variable: ActiveModel = existing.into();
    if let Some(name) = data.name {
        variable.name = Set(required_name(&name)?);
    }
    if let Some(unit) = data.unit {
        variable.unit = Set(clean(unit));
    }
    if let Some(frequency) = data.frequency {
        variable.frequency = Set(clean(frequency));
    }
    if let Some(description) = data.description {
        variable.description = Set(clean(description));
    }
    if let Some(data_type) = data.data_type {
        variable.data_type = Set(clean(data_type));
    }
    variable.updated_at = Set(chrono::Utc::now());

    variable
        .update(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_variable"))
}

/// Deleting a variable also drops the entries recorded for it
pub async fn delete_variable(db: &DatabaseConnection, id: Uuid) -> BusinessResult<()> {
    let txn = db
        .begin()
        .await
        .map_err(|e| e.to_business_error("field_trial_variable"))?;

    crate::measurements::models::Entity::delete_many()
        .filter(crate::measurements::models::Column::VariableId.eq(id))
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial_data"))?;

    let result = Entity::delete_by_id(id)
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial_variable"))?;
    if result.rows_affected == 0 {
        return Err(not_found!("Variable", id));
    }

    txn.commit()
        .await
        .map_err(|e| e.to_business_error("field_trial_variable"))
}

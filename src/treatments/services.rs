use super::models::{ActiveModel, Column, Entity, Treatment, TreatmentCreate, TreatmentUpdate};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::{not_found, plots, validation_error};
use sea_orm::sea_query::Expr;
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
        return Err(validation_error!("name", "Treatment name is required."));
    }
    Ok(name.to_string())
}

/// Treatments of a trial in creation order
pub async fn list_treatments<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
) -> BusinessResult<Vec<Treatment>> {
    Entity::find()
        .filter(Column::TrialId.eq(trial_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_treatment"))
}

pub async fn create_treatment<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    data: TreatmentCreate,
) -> BusinessResult<Treatment> {
    let now = chrono::Utc::now();
    let treatment = ActiveModel {
        id: Set(Uuid::new_v4()),
        trial_id: Set(trial_id),
        name: Set(required_name(&data.name)?),
        description: Set(clean(data.description)),
        application_method: Set(clean(data.application_method)),
        rate: Set(clean(data.rate)),
        timing: Set(clean(data.timing)),
        color: Set(clean(data.color)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    treatment
        .insert(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_treatment"))
}

pub async fn update_treatment<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    data: TreatmentUpdate,
) -> BusinessResult<Treatment> {
    let existing = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_treatment"))?
        .ok_or_else(|| not_found!("Treatment", id))?;

    let mut treatment: ActiveModel = existing.into();
    if let Some(name) = data.name {
        treatment.name = Set(required_name(&name)?);
    }
    if let Some(description) = data.description {
        treatment.description = Set(clean(description));
    }
    if let Some(application_method) = data.application_method {
        treatment.application_method = Set(clean(application_method));
    }
    if let Some(rate) = data.rate {
        treatment.rate = Set(clean(rate));
    }
    if let Some(timing) = data.timing {
        treatment.timing = Set(clean(timing));
    }
    if let Some(color) = data.color {
        treatment.color = Set(clean(color));
    }
    treatment.updated_at = Set(chrono::Utc::now());

    treatment
        .update(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_treatment"))
}

/// Deletes a treatment. Plots that referenced it keep existing and lose
/// their treatment assignment.
pub async fn delete_treatment(db: &DatabaseConnection, id: Uuid) -> BusinessResult<()> {
    let txn = db
        .begin()
        .await
        .map_err(|e| e.to_business_error("field_trial_treatment"))?;

    plots::models::Entity::update_many()
        .col_expr(
            plots::models::Column::TreatmentId,
            Expr::value(Option::<Uuid>::None),
        )
        .filter(plots::models::Column::TreatmentId.eq(id))
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial_plot"))?;

    let result = Entity::delete_by_id(id)
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial_treatment"))?;
    if result.rows_affected == 0 {
        return Err(not_found!("Treatment", id));
    }

    txn.commit()
        .await
        .map_err(|e| e.to_business_error("field_trial_treatment"))
}

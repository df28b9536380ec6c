use super::models::{
    ActiveModel, Column, Entity, MeasurementDraft, MeasurementEntry, ValidMeasurement,
};
use super::validation::{INVALID_PLOT, INVALID_VARIABLE, validate_measurement};
use crate::common::errors::{BusinessError, BusinessResult, DbErrorExt};
use crate::common::identity::Actor;
use crate::variables::models::Variable;
use crate::{not_found, plots, validation_error, variables};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

/// Entries of a trial, most recent measurement date first
pub async fn list_measurements<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
) -> BusinessResult<Vec<MeasurementEntry>> {
    Entity::find()
        .filter(Column::TrialId.eq(trial_id))
        .order_by_desc(Column::MeasurementDate)
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_data"))
}

/// Rejects references to a plot or variable of another trial
async fn ensure_same_trial<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    valid: &ValidMeasurement,
) -> BusinessResult<()> {
    let plot = plots::services::get_plot(db, valid.plot_id).await?;
    if plot.is_none_or(|plot| plot.trial_id != trial_id) {
        return Err(validation_error!("plot_id", INVALID_PLOT));
    }

    let variable = variables::services::get_variable(db, valid.variable_id).await?;
    if variable.is_none_or(|variable| variable.trial_id != trial_id) {
        return Err(validation_error!("variable_id", INVALID_VARIABLE));
    }
    Ok(())
}

/// Validates and stores a new entry on behalf of `actor`.
///
/// `variables` is the catalog the form was filled from; it only feeds the
/// missing-value message.
pub async fn create_measurement<C: ConnectionTrait>(
    db: &C,
    actor: Option<&Actor>,
    trial_id: Uuid,
    draft: &MeasurementDraft,
    variables: &[Variable],
) -> BusinessResult<MeasurementEntry> {
    let (actor, valid) = validate_measurement(actor, draft, variables)?;
    ensure_same_trial(db, trial_id, &valid).await?;

    let now = chrono::Utc::now();
    let entry = ActiveModel {
        id: Set(Uuid::new_v4()),
        trial_id: Set(trial_id),
        plot_id: Set(valid.plot_id),
        variable_id: Set(valid.variable_id),
        value: Set(valid.value),
        measurement_date: Set(valid.measurement_date),
        recorded_by: Set(actor.user_id),
        collector_name: Set(actor.collector_name()),
        notes: Set(valid.notes),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let entry = entry
        .insert(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_data"))?;
    tracing::debug!("Recorded entry {} on plot {}", entry.id, entry.plot_id);
    Ok(entry)
}

/// Merges `update` onto the stored entry and re-validates the result as a
/// whole before writing
pub async fn update_measurement<C: ConnectionTrait>(
    db: &C,
    actor: Option<&Actor>,
    id: Uuid,
    update: MeasurementDraft,
    variables: &[Variable],
) -> BusinessResult<MeasurementEntry> {
    if actor.is_none() {
        return Err(BusinessError::Unauthenticated);
    }

    let existing = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_data"))?
        .ok_or_else(|| not_found!("Measurement entry", id))?;

    let merged = MeasurementDraft::from_entry(&existing).merged(update);
    let (actor, valid) = validate_measurement(actor, &merged, variables)?;
    ensure_same_trial(db, existing.trial_id, &valid).await?;

    let mut entry: ActiveModel = existing.into();
    entry.plot_id = Set(valid.plot_id);
    entry.variable_id = Set(valid.variable_id);
    entry.value = Set(valid.value);
    entry.measurement_date = Set(valid.measurement_date);
    entry.notes = Set(valid.notes);
    entry.recorded_by = Set(actor.user_id);
    entry.collector_name = Set(actor.collector_name());
    entry.updated_at = Set(chrono::Utc::now());

    entry
        .update(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_data"))
}

pub async fn delete_measurement<C: ConnectionTrait>(db: &C, id: Uuid) -> BusinessResult<()> {
    let result = Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_data"))?;
    if result.rows_affected == 0 {
        return Err(not_found!("Measurement entry", id));
    }
    Ok(())
}

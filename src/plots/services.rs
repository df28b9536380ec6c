use super::models::{ActiveModel, Column, Entity, Plot, PlotCreate, PlotUpdate};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::{measurements, not_found, treatments, validation_error};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

fn required_plot_number(plot_number: &str) -> BusinessResult<String> {
    let plot_number = plot_number.trim();
    if plot_number.is_empty() {
        return Err(validation_error!("plot_number", "Plot number is required."));
    }
    Ok(plot_number.to_string())
}

/// Checks that `treatment_id` names a treatment of the same trial
async fn ensure_trial_treatment<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    treatment_id: Uuid,
) -> BusinessResult<()> {
    let treatment = treatments::models::Entity::find_by_id(treatment_id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_treatment"))?;

    match treatment {
        Some(treatment) if treatment.trial_id == trial_id => Ok(()),
        _ => Err(validation_error!(
            "treatment_id",
            "Please select a treatment of this trial."
        )),
    }
}

async fn resolve_treatment_label<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    label: &str,
) -> BusinessResult<Uuid> {
    let label = label.trim();
    treatments::models::Entity::find()
        .filter(treatments::models::Column::TrialId.eq(trial_id))
        .filter(treatments::models::Column::Name.eq(label))
        .one(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_treatment"))?
        .map(|treatment| treatment.id)
        .ok_or_else(|| validation_error!("treatment", format!("Unknown treatment '{label}'.")))
}

/// Plots of a trial ordered by plot number
pub async fn list_plots<C: ConnectionTrait>(db: &C, trial_id: Uuid) -> BusinessResult<Vec<Plot>> {
    Entity::find()
        .filter(Column::TrialId.eq(trial_id))
        .order_by_asc(Column::PlotNumber)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_plot"))
}

pub async fn get_plot<C: ConnectionTrait>(db: &C, id: Uuid) -> BusinessResult<Option<Plot>> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_plot"))
}

pub async fn create_plot<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    data: PlotCreate,
) -> BusinessResult<Plot> {
    let plot_number = required_plot_number(&data.plot_number)?;

    let treatment_id = match (data.treatment_id, data.treatment.as_deref()) {
        (Some(treatment_id), _) => {
            ensure_trial_treatment(db, trial_id, treatment_id).await?;
            Some(treatment_id)
        }
        (None, Some(label)) if !label.trim().is_empty() => {
            Some(resolve_treatment_label(db, trial_id, label).await?)
        }
        _ => None,
    };

    let now = chrono::Utc::now();
    let plot = ActiveModel {
        id: Set(Uuid::new_v4()),
        trial_id: Set(trial_id),
        plot_number: Set(plot_number),
        treatment_id: Set(treatment_id),
        repetition: Set(data.repetition),
        geojson: Set(data.geojson),
        area: Set(data.area),
        created_at: Set(now),
        updated_at: Set(now),
    };

    plot.insert(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_plot"))
}

pub async fn update_plot<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    data: PlotUpdate,
) -> BusinessResult<Plot> {
    let existing = get_plot(db, id)
        .await?
        .ok_or_else(|| not_found!("Plot", id))?;
    let trial_id = existing.trial_id;

    let mut plot: ActiveModel = existing.into();
    if let Some(plot_number) = data.plot_number {
        plot.plot_number = Set(required_plot_number(&plot_number)?);
    }
    if let Some(treatment_id) = data.treatment_id {
        if let Some(treatment_id) = treatment_id {
            ensure_trial_treatment(db, trial_id, treatment_id).await?;
        }
        plot.treatment_id = Set(treatment_id);
    }
    if let Some(repetition) = data.repetition {
        plot.repetition = Set(repetition);
    }
    if let Some(geojson) = data.geojson {
        plot.geojson = Set(geojson);
    }
    if let Some(area) = data.area {
        plot.area = Set(area);
    }
    plot.updated_at = Set(chrono::Utc::now());

    plot.update(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_plot"))
}

/// Deletes a plot together with the entries recorded on it. Either both go
/// or neither does.
pub async fn delete_plot(db: &DatabaseConnection, id: Uuid) -> BusinessResult<()> {
    let txn = db
        .begin()
        .await
        .map_err(|e| e.to_business_error("field_trial_plot"))?;

    measurements::models::Entity::delete_many()
        .filter(measurements::models::Column::PlotId.eq(id))
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial_data"))?;

    let result = Entity::delete_by_id(id)
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial_plot"))?;
    if result.rows_affected == 0 {
        return Err(not_found!("Plot", id));
    }

    txn.commit()
        .await
        .map_err(|e| e.to_business_error("field_trial_plot"))
}

use super::models::{ActiveModel, Column, Entity, Layout, LayoutData};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::{duplicate_resource, not_found};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
};
use uuid::Uuid;

/// A trial without a layout is valid and yields `None`
pub async fn get_layout<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
) -> BusinessResult<Option<Layout>> {
    Entity::find()
        .filter(Column::TrialId.eq(trial_id))
        .one(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_layout"))
}

pub async fn create_layout<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    data: LayoutData,
) -> BusinessResult<Layout> {
    if get_layout(db, trial_id).await?.is_some() {
        return Err(duplicate_resource!("field trial layout", "trial_id"));
    }

    let now = chrono::Utc::now();
    let layout = ActiveModel {
        id: Set(Uuid::new_v4()),
        trial_id: Set(trial_id),
        design_type: Set(data.design_type),
        replications: Set(data.replications),
        plot_width: Set(data.plot_width),
        plot_length: Set(data.plot_length),
        plot_unit: Set(data.plot_unit),
        row_spacing: Set(data.row_spacing),
        total_plots: Set(data.total_plots),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let layout = layout
        .insert(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_layout"))?;
    tracing::info!("Created layout {} for trial {trial_id}", layout.id);
    Ok(layout)
}

pub async fn update_layout<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    data: LayoutData,
) -> BusinessResult<Layout> {
    let existing = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_layout"))?
        .ok_or_else(|| not_found!("Layout", id))?;

    let mut layout: ActiveModel = existing.into();
    layout.design_type = Set(data.design_type);
    layout.replications = Set(data.replications);
    layout.plot_width = Set(data.plot_width);
    layout.plot_length = Set(data.plot_length);
    layout.plot_unit = Set(data.plot_unit);
    layout.row_spacing = Set(data.row_spacing);
    layout.total_plots = Set(data.total_plots);
    layout.updated_at = Set(chrono::Utc::now());

    layout
        .update(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_layout"))
}

use crate::common::collection::Identified;
use crate::treatments::models::Treatment;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "field_trial_plots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub trial_id: Uuid,
    pub plot_number: String,
    pub treatment_id: Option<Uuid>,
    pub repetition: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub geojson: Option<Json>,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))", nullable)]
    pub area: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type Plot = Model;

impl Identified for Model {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::trials::models::Entity",
        from = "Column::TrialId",
        to = "crate::trials::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Trial,
    #[sea_orm(
        belongs_to = "crate::treatments::models::Entity",
        from = "Column::TreatmentId",
        to = "crate::treatments::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Treatment,
    #[sea_orm(has_many = "crate::measurements::models::Entity")]
    MeasurementEntries,
}

impl Related<crate::trials::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trial.def()
    }
}

impl Related<crate::treatments::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Treatment.def()
    }
}

impl Related<crate::measurements::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MeasurementEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Create payload. Older callers send the treatment by its label in
/// `treatment`; it is resolved to an id of the same trial on insert.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotCreate {
    pub plot_number: String,
    pub treatment_id: Option<Uuid>,
    pub treatment: Option<String>,
    pub repetition: Option<String>,
    pub geojson: Option<Json>,
    pub area: Option<Decimal>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub treatment_id: Option<Option<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub repetition: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub geojson: Option<Option<Json>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub area: Option<Option<Decimal>>,
}

/// A plot as displayed, with the treatment name looked up from the current
/// catalog rather than stored on the plot
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlotView {
    pub id: Uuid,
    pub plot_number: String,
    pub treatment_id: Option<Uuid>,
    pub treatment_name: Option<String>,
    pub repetition: Option<String>,
    pub area: Option<Decimal>,
}

impl PlotView {
    pub fn resolve(plot: &Plot, treatments: &[Treatment]) -> Self {
        let treatment_name = plot.treatment_id.and_then(|treatment_id| {
            treatments
                .iter()
                .find(|treatment| treatment.id == treatment_id)
                .map(|treatment| treatment.name.clone())
        });

        Self {
            id: plot.id,
            plot_number: plot.plot_number.clone(),
            treatment_id: plot.treatment_id,
            treatment_name,
            repetition: plot.repetition.clone(),
            area: plot.area,
        }
    }

    pub fn resolve_all(plots: &[Plot], treatments: &[Treatment]) -> Vec<Self> {
        plots
            .iter()
            .map(|plot| Self::resolve(plot, treatments))
            .collect()
    }
}

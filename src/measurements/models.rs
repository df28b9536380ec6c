use crate::common::collection::Identified;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "field_trial_data")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub trial_id: Uuid,
    pub plot_id: Uuid,
    pub variable_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub value: String,
    pub measurement_date: NaiveDate,
    pub recorded_by: Uuid,
    pub collector_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type MeasurementEntry = Model;

impl Model {
    /// Label used for the collector facet
    pub fn collector(&self) -> String {
        self.collector_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| self.recorded_by.to_string(), ToString::to_string)
    }
}

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
        belongs_to = "crate::plots::models::Entity",
        from = "Column::PlotId",
        to = "crate::plots::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Plot,
    #[sea_orm(
        belongs_to = "crate::variables::models::Entity",
        from = "Column::VariableId",
        to = "crate::variables::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Variable,
}

impl Related<crate::trials::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trial.def()
    }
}

impl Related<crate::plots::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plot.def()
    }
}

impl Related<crate::variables::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Entry form as typed in. Every field is raw text because the form can be
/// submitted half-filled; nothing is trusted until it passes validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementDraft {
    pub plot_id: Option<String>,
    pub measurement_date: Option<String>,
    pub variable_id: Option<String>,
    pub value: Option<String>,
    pub notes: Option<String>,
}

impl MeasurementDraft {
    /// Draft pre-filled from a stored entry, as when the edit dialog opens
    pub fn from_entry(entry: &MeasurementEntry) -> Self {
        Self {
            plot_id: Some(entry.plot_id.to_string()),
            measurement_date: Some(entry.measurement_date.format("%Y-%m-%d").to_string()),
            variable_id: Some(entry.variable_id.to_string()),
            value: Some(entry.value.clone()),
            notes: entry.notes.clone(),
        }
    }

    /// Overlays the fields present in `update`
    #[must_use]
    pub fn merged(mut self, update: MeasurementDraft) -> Self {
        if update.plot_id.is_some() {
            self.plot_id = update.plot_id;
        }
        if update.measurement_date.is_some() {
            self.measurement_date = update.measurement_date;
        }
        if update.variable_id.is_some() {
            self.variable_id = update.variable_id;
        }
        if update.value.is_some() {
            self.value = update.value;
        }
        if update.notes.is_some() {
            self.notes = update.notes;
        }
        self
    }
}

/// A draft that passed every check
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidMeasurement {
    pub plot_id: Uuid,
    pub measurement_date: NaiveDate,
    pub variable_id: Uuid,
    pub value: String,
    pub notes: Option<String>,
}

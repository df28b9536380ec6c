use crate::common::collection::Identified;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "field_trial_variables")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub trial_id: Uuid,
    pub name: String,
    pub unit: Option<String>,
    pub frequency: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub data_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type Variable = Model;

impl Model {
    /// "Yield (kg/ha)", or just the name when there is no unit
    pub fn display_name(&self) -> String {
        match self.unit.as_deref().map(str::trim) {
            Some(unit) if !unit.is_empty() => format!("{} ({unit})", self.name),
            _ => self.name.clone(),
        }
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
    #[sea_orm(has_many = "crate::measurements::models::Entity")]
    MeasurementEntries,
}

impl Related<crate::trials::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trial.def()
    }
}

impl Related<crate::measurements::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MeasurementEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableCreate {
    pub name: String,
    pub unit: Option<String>,
    pub frequency: Option<String>,
    pub description: Option<String>,
    pub data_type: Option<String>,
}

/// What the variable dialog submits; `_editIdx` is dialog bookkeeping
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableForm {
    pub name: String,
    pub unit: Option<String>,
    pub frequency: Option<String>,
    pub description: Option<String>,
    pub data_type: Option<String>,
    #[serde(rename = "_editIdx", skip_serializing)]
    pub edit_index: Option<usize>,
}

impl From<VariableForm> for VariableCreate {
    fn from(form: VariableForm) -> Self {
        Self {
            name: form.name,
            unit: form.unit,
            frequency: form.frequency,
            description: form.description,
            data_type: form.data_type,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub unit: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub frequency: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub data_type: Option<Option<String>>,
}

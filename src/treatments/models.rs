use crate::common::collection::Identified;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "field_trial_treatments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub trial_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub application_method: Option<String>,
    pub rate: Option<String>,
    pub timing: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type Treatment = Model;

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
    #[sea_orm(has_many = "crate::plots::models::Entity")]
    Plots,
}

impl Related<crate::trials::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trial.def()
    }
}

impl Related<crate::plots::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Canonical create payload
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreatmentCreate {
    pub name: String,
    pub description: Option<String>,
    pub application_method: Option<String>,
    pub rate: Option<String>,
    pub timing: Option<String>,
    pub color: Option<String>,
}

/// What the treatment dialog submits. `application` is the dialog's name for
/// `application_method`, and `_editIdx` is the row index the dialog tracks;
/// neither is a column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreatmentForm {
    pub name: String,
    pub description: Option<String>,
    pub application: Option<String>,
    pub application_method: Option<String>,
    pub rate: Option<String>,
    pub timing: Option<String>,
    pub color: Option<String>,
    #[serde(rename = "_editIdx", skip_serializing)]
    pub edit_index: Option<usize>,
}

impl From<TreatmentForm> for TreatmentCreate {
    fn from(form: TreatmentForm) -> Self {
        Self {
            name: form.name,
            description: form.description,
            application_method: form.application.or(form.application_method),
            rate: form.rate,
            timing: form.timing,
            color: form.color,
        }
    }
}

/// Partial update using column names only. Dialog-only keys such as
/// `application` or `_editIdx` are not part of this type and are dropped
/// during deserialization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreatmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub application_method: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub rate: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub timing: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub color: Option<Option<String>>,
}

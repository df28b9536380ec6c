use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum TrialStatus {
    #[default]
    #[sea_orm(string_value = "planned")]
    Planned,
    /// Older records and screens call this state "ongoing"
    #[sea_orm(string_value = "active")]
    #[serde(alias = "ongoing")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StringList(pub Vec<String>);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct IdList(pub Vec<Uuid>);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "field_trials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub trial_code: String,
    pub crop: String,
    pub variety_hybrid: Option<String>,
    pub trial_type: Option<String>,
    pub season: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: TrialStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub objective: Option<String>,
    pub farm_name: Option<String>,
    pub field_location: Option<String>,
    pub gps_coordinates: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))", nullable)]
    pub trial_area: Option<Decimal>,
    pub responsible_agronomist_id: Option<Uuid>,
    #[sea_orm(column_type = "Json")]
    pub responsible_agronomist_ids: IdList,
    #[sea_orm(column_type = "Json")]
    pub tags: StringList,
    pub trial_category: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))", nullable)]
    pub budget: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub spent: Decimal,
    pub completion_percentage: i32,
    pub notifications_enabled: bool,
    pub is_draft: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type Trial = Model;

impl Model {
    /// Whether `user_id` leads this trial, either as the single responsible
    /// agronomist or as one of the listed ones
    pub fn is_led_by(&self, user_id: Uuid) -> bool {
        self.responsible_agronomist_id == Some(user_id)
            || self.responsible_agronomist_ids.0.contains(&user_id)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "crate::layouts::models::Entity")]
    Layout,
    #[sea_orm(has_many = "crate::treatments::models::Entity")]
    Treatments,
    #[sea_orm(has_many = "crate::variables::models::Entity")]
    Variables,
    #[sea_orm(has_many = "crate::plots::models::Entity")]
    Plots,
    #[sea_orm(has_many = "crate::measurements::models::Entity")]
    MeasurementEntries,
    #[sea_orm(has_many = "super::team::models::Entity")]
    TeamMembers,
    #[sea_orm(has_many = "super::tasks::models::Entity")]
    Tasks,
}

impl Related<crate::layouts::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Layout.def()
    }
}

impl Related<crate::treatments::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Treatments.def()
    }
}

impl Related<crate::variables::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variables.def()
    }
}

impl Related<crate::plots::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plots.def()
    }
}

impl Related<crate::measurements::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MeasurementEntries.def()
    }
}

impl Related<super::team::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamMembers.def()
    }
}

impl Related<super::tasks::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Payload for creating a trial. `trial_code` is generated when absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialCreate {
    pub name: String,
    pub trial_code: Option<String>,
    pub crop: String,
    pub variety_hybrid: Option<String>,
    pub trial_type: Option<String>,
    pub season: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: TrialStatus,
    pub objective: Option<String>,
    pub farm_name: Option<String>,
    pub field_location: Option<String>,
    pub gps_coordinates: Option<String>,
    pub trial_area: Option<Decimal>,
    pub responsible_agronomist_id: Option<Uuid>,
    pub responsible_agronomist_ids: Vec<Uuid>,
    pub tags: Vec<String>,
    pub trial_category: Option<String>,
    pub budget: Option<Decimal>,
    pub spent: Option<Decimal>,
    pub completion_percentage: Option<i32>,
    pub notifications_enabled: Option<bool>,
    pub is_draft: Option<bool>,
}

/// Partial update. `None` leaves a field untouched; for nullable columns
/// `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub variety_hybrid: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub trial_type: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub season: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TrialStatus>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub objective: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub farm_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub field_location: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub gps_coordinates: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub trial_area: Option<Option<Decimal>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub responsible_agronomist_id: Option<Option<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_agronomist_ids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub trial_category: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub budget: Option<Option<Decimal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_percentage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_draft: Option<bool>,
}

/// Which trials a listing may return
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrialScope {
    /// No ownership restriction
    Public,
    /// Trials the user leads or is a team member of
    AssignedTo(Uuid),
}

/// A task as entered in the creation wizard. Entries without a title or due
/// date are skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDraft {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub status: Option<super::tasks::models::TaskStatus>,
    pub responsible: Option<Uuid>,
}

/// Trial fields plus the secondary records created alongside it
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialCreateWithDetails {
    #[serde(flatten)]
    pub trial: TrialCreate,
    #[serde(default)]
    pub collaborators: Vec<Uuid>,
    #[serde(default)]
    pub roles: std::collections::HashMap<Uuid, super::team::models::TeamRole>,
    #[serde(default)]
    pub tasks: Vec<TaskDraft>,
    #[serde(default)]
    pub attachments: Vec<super::attachments::models::AttachmentCreate>,
}

/// Result of a compound creation: the trial always exists, failed secondary
/// writes are listed and can be retried
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrialCreation {
    pub trial: Trial,
    pub failed_steps: Vec<super::setup_steps::models::SetupStep>,
}

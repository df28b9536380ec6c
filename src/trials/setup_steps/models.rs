use crate::trials::attachments::models::AttachmentCreate;
use crate::trials::tasks::models::TaskCreate;
use crate::trials::team::models::TeamRole;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum SetupStepKind {
    #[sea_orm(string_value = "team_member")]
    TeamMember,
    #[sea_orm(string_value = "task")]
    Task,
    #[sea_orm(string_value = "attachment")]
    Attachment,
}

/// A secondary write of a compound trial creation. Serialized as the step
/// payload so it can be replayed later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SetupAction {
    TeamMember { user_id: Uuid, role: TeamRole },
    Task(TaskCreate),
    Attachment(AttachmentCreate),
}

impl SetupAction {
    pub fn kind(&self) -> SetupStepKind {
        match self {
            SetupAction::TeamMember { .. } => SetupStepKind::TeamMember,
            SetupAction::Task(_) => SetupStepKind::Task,
            SetupAction::Attachment(_) => SetupStepKind::Attachment,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "field_trial_setup_steps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub trial_id: Uuid,
    pub step_kind: SetupStepKind,
    #[sea_orm(column_type = "Json")]
    pub payload: Json,
    #[sea_orm(column_type = "Text")]
    pub last_error: String,
    pub attempts: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type SetupStep = Model;

impl Model {
    pub fn action(&self) -> Result<SetupAction, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
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
}

impl Related<crate::trials::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trial.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Outcome of replaying the recorded steps of one trial
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RetryReport {
    pub resolved: usize,
    pub still_failing: Vec<SetupStep>,
}

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

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
pub enum AttachmentType {
    #[sea_orm(string_value = "protocol")]
    Protocol,
    #[sea_orm(string_value = "pre_trial_data")]
    PreTrialData,
    #[default]
    #[sea_orm(string_value = "document")]
    Document,
    #[sea_orm(string_value = "image")]
    Image,
}

/// Metadata of a file stored elsewhere. Only the object path is kept here.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "field_trial_attachments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub trial_id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub attachment_type: AttachmentType,
    pub uploaded_by: Option<Uuid>,
    pub uploaded_at: DateTime<Utc>,
}

pub type Attachment = Model;

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

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentCreate {
    pub file_name: String,
    pub file_path: String,
    pub file_type: String,
    #[serde(default)]
    pub file_size: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attachment_type: AttachmentType,
}

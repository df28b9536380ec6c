use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum DesignType {
    #[sea_orm(string_value = "RCBD")]
    #[serde(rename = "RCBD")]
    Rcbd,
    #[sea_orm(string_value = "Split-Plot")]
    #[serde(rename = "Split-Plot")]
    SplitPlot,
    #[sea_orm(string_value = "Latin Square")]
    #[serde(rename = "Latin Square")]
    LatinSquare,
    #[sea_orm(string_value = "Factorial")]
    Factorial,
    #[sea_orm(string_value = "Custom")]
    Custom,
}

impl DesignType {
    pub fn label(self) -> &'static str {
        match self {
            DesignType::Rcbd => "RCBD",
            DesignType::SplitPlot => "Split-Plot",
            DesignType::LatinSquare => "Latin Square",
            DesignType::Factorial => "Factorial",
            DesignType::Custom => "Custom",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        [
            DesignType::Rcbd,
            DesignType::SplitPlot,
            DesignType::LatinSquare,
            DesignType::Factorial,
            DesignType::Custom,
        ]
        .into_iter()
        .find(|design| design.label().eq_ignore_ascii_case(label))
    }
}

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
#[serde(rename_all = "lowercase")]
pub enum PlotUnit {
    #[default]
    #[sea_orm(string_value = "m")]
    M,
    #[sea_orm(string_value = "ft")]
    Ft,
}

impl PlotUnit {
    /// Unknown units fall back to metres
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("ft") {
            PlotUnit::Ft
        } else {
            PlotUnit::M
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "field_trial_layouts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub trial_id: Uuid,
    pub design_type: Option<DesignType>,
    pub replications: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub plot_width: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub plot_length: Decimal,
    pub plot_unit: PlotUnit,
    /// Centimetres
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub row_spacing: Decimal,
    pub total_plots: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type Layout = Model;

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

/// Full layout payload, used for both create and update
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutData {
    pub design_type: Option<DesignType>,
    pub replications: i32,
    pub plot_width: Decimal,
    pub plot_length: Decimal,
    pub plot_unit: PlotUnit,
    pub row_spacing: Decimal,
    pub total_plots: i32,
}

impl From<&Layout> for LayoutData {
    fn from(layout: &Layout) -> Self {
        Self {
            design_type: layout.design_type,
            replications: layout.replications,
            plot_width: layout.plot_width,
            plot_length: layout.plot_length,
            plot_unit: layout.plot_unit,
            row_spacing: layout.row_spacing,
            total_plots: layout.total_plots,
        }
    }
}

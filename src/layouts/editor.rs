//! Edit-in-place state for a trial layout.
//!
//! The editor keeps the last persisted layout next to a draft. Numeric input
//! arrives as raw text and is coerced, never rejected: anything that does not
//! parse becomes `0` and the draft stays editable.

use super::models::{DesignType, Layout, LayoutData, PlotUnit};
use super::services::{create_layout, update_layout};
use crate::common::errors::BusinessResult;
use crate::validation_error;
use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutField {
    DesignType,
    Replications,
    PlotWidth,
    PlotLength,
    PlotUnit,
    RowSpacing,
    TotalPlots,
}

fn coerce_int(raw: &str) -> i32 {
    raw.trim().parse().unwrap_or(0)
}

fn coerce_decimal(raw: &str) -> Decimal {
    Decimal::from_str(raw.trim()).unwrap_or(Decimal::ZERO)
}

/// Working copy of a layout while it is being edited
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDraft {
    pub design_type: Option<DesignType>,
    pub replications: i32,
    pub plot_width: Decimal,
    pub plot_length: Decimal,
    pub plot_unit: PlotUnit,
    pub row_spacing: Decimal,
    pub total_plots: i32,
}

impl LayoutDraft {
    pub fn from_layout(layout: Option<&Layout>) -> Self {
        layout.map_or_else(Self::default, |layout| {
            let data = LayoutData::from(layout);
            Self {
                design_type: data.design_type,
                replications: data.replications,
                plot_width: data.plot_width,
                plot_length: data.plot_length,
                plot_unit: data.plot_unit,
                row_spacing: data.row_spacing,
                total_plots: data.total_plots,
            }
        })
    }

    pub fn set_field(&mut self, field: LayoutField, raw: &str) {
        match field {
            LayoutField::DesignType => self.design_type = DesignType::from_label(raw),
            LayoutField::Replications => self.replications = coerce_int(raw),
            LayoutField::PlotWidth => self.plot_width = coerce_decimal(raw),
            LayoutField::PlotLength => self.plot_length = coerce_decimal(raw),
            LayoutField::PlotUnit => self.plot_unit = PlotUnit::from_label(raw),
            LayoutField::RowSpacing => self.row_spacing = coerce_decimal(raw),
            LayoutField::TotalPlots => self.total_plots = coerce_int(raw),
        }
    }

    /// Opt-in checks for callers that must not persist a degenerate layout
    pub fn validate_strict(&self) -> BusinessResult<()> {
        if self.design_type.is_none() {
            return Err(validation_error!("design_type", "Please select a design type."));
        }
        if self.replications < 1 {
            return Err(validation_error!(
                "replications",
                "Replications must be at least 1."
            ));
        }
        if self.total_plots < 0 {
            return Err(validation_error!(
                "total_plots",
                "Total plots cannot be negative."
            ));
        }
        for (field, value) in [
            ("plot_width", self.plot_width),
            ("plot_length", self.plot_length),
            ("row_spacing", self.row_spacing),
        ] {
            if value < Decimal::ZERO {
                return Err(validation_error!(field, format!("{field} cannot be negative.")));
            }
        }
        Ok(())
    }

    pub fn to_data(&self) -> LayoutData {
        LayoutData {
            design_type: self.design_type,
            replications: self.replications,
            plot_width: self.plot_width,
            plot_length: self.plot_length,
            plot_unit: self.plot_unit,
            row_spacing: self.row_spacing,
            total_plots: self.total_plots,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LayoutEditor {
    trial_id: Uuid,
    persisted: Option<Layout>,
    draft: LayoutDraft,
    editing: bool,
}

impl LayoutEditor {
    pub fn new(trial_id: Uuid, persisted: Option<Layout>) -> Self {
        let draft = LayoutDraft::from_layout(persisted.as_ref());
        Self {
            trial_id,
            persisted,
            draft,
            editing: false,
        }
    }

    pub fn persisted(&self) -> Option<&Layout> {
        self.persisted.as_ref()
    }

    pub fn draft(&self) -> &LayoutDraft {
        &self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn begin_edit(&mut self) {
        self.editing = true;
    }

    pub fn set_field(&mut self, field: LayoutField, raw: &str) {
        self.draft.set_field(field, raw);
    }

    /// Drops the draft and goes back to the persisted snapshot
    pub fn cancel(&mut self) {
        self.draft = LayoutDraft::from_layout(self.persisted.as_ref());
        self.editing = false;
    }

    /// Creates or updates the layout. On success both the snapshot and the
    /// draft are re-seeded from what the store returned; on failure the
    /// editor stays in edit mode with the draft untouched.
    pub async fn save<C: ConnectionTrait>(&mut self, db: &C) -> BusinessResult<&Layout> {
        let data = self.draft.to_data();
        let saved = match &self.persisted {
            Some(layout) => update_layout(db, layout.id, data).await?,
            None => create_layout(db, self.trial_id, data).await?,
        };

        self.draft = LayoutDraft::from_layout(Some(&saved));
        self.editing = false;
        Ok(self.persisted.insert(saved))
    }
}

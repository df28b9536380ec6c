use crate::layouts::models::Layout;
use crate::measurements::models::MeasurementEntry;
use crate::plots::models::Plot;
use crate::treatments::models::Treatment;
use crate::trials::models::{Trial, TrialStatus};
use crate::variables::models::Variable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ENTRIES_PER_PAGE: usize = 10;

/// One filter dimension: either no restriction or one exact value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Facet<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(expected) => expected == value,
        }
    }
}

/// Distinct values of each entry dimension, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryFacets {
    pub dates: Vec<NaiveDate>,
    pub plot_ids: Vec<Uuid>,
    pub variable_ids: Vec<Uuid>,
    pub collectors: Vec<String>,
}

fn push_distinct<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if !values.contains(&value) {
        values.push(value);
    }
}

impl EntryFacets {
    pub fn from_entries(entries: &[MeasurementEntry]) -> Self {
        let mut facets = Self::default();
        for entry in entries {
            push_distinct(&mut facets.dates, entry.measurement_date);
            push_distinct(&mut facets.plot_ids, entry.plot_id);
            push_distinct(&mut facets.variable_ids, entry.variable_id);
            push_distinct(&mut facets.collectors, entry.collector());
        }
        facets
    }
}

/// AND of all dimensions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryFilter {
    pub date: Facet<NaiveDate>,
    pub plot: Facet<Uuid>,
    pub variable: Facet<Uuid>,
    pub collector: Facet<String>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &MeasurementEntry) -> bool {
        self.date.matches(&entry.measurement_date)
            && self.plot.matches(&entry.plot_id)
            && self.variable.matches(&entry.variable_id)
            && self.collector.matches(&entry.collector())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, already clamped
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrialSummary {
    pub trial_id: Uuid,
    pub treatments: usize,
    pub variables: usize,
    pub plots: usize,
    pub entries: usize,
    pub collection_dates: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrialKpis {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub with_entries: usize,
    pub trial_types: Vec<String>,
    pub crops: Vec<String>,
}

/// Search box plus the status, type and crop dropdowns of the trial list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialListingFilter {
    pub search: String,
    pub status: Facet<TrialStatus>,
    pub trial_type: Facet<String>,
    pub crop: Facet<String>,
}

impl TrialListingFilter {
    pub fn matches(&self, trial: &Trial) -> bool {
        let query = self.search.trim().to_lowercase();
        let contains = |field: &str| field.to_lowercase().contains(&query);
        let matches_search = query.is_empty()
            || contains(&trial.name)
            || contains(&trial.trial_code)
            || contains(&trial.crop)
            || trial.variety_hybrid.as_deref().is_some_and(contains);

        let matches_type = match &self.trial_type {
            Facet::All => true,
            Facet::Only(expected) => trial.trial_type.as_deref() == Some(expected.as_str()),
        };

        matches_search
            && self.status.matches(&trial.status)
            && matches_type
            && self.crop.matches(&trial.crop)
    }
}

/// Display values for entry rows, resolved against the loaded catalogs.
/// Unknown ids fall back to the raw id.
#[derive(Debug, Clone, Copy)]
pub struct EntryLookup<'a> {
    pub plots: &'a [Plot],
    pub treatments: &'a [Treatment],
    pub variables: &'a [Variable],
}

impl<'a> EntryLookup<'a> {
    pub fn new(plots: &'a [Plot], treatments: &'a [Treatment], variables: &'a [Variable]) -> Self {
        Self {
            plots,
            treatments,
            variables,
        }
    }

    fn plot(&self, plot_id: Uuid) -> Option<&'a Plot> {
        self.plots.iter().find(|plot| plot.id == plot_id)
    }

    fn variable(&self, variable_id: Uuid) -> Option<&'a Variable> {
        self.variables.iter().find(|variable| variable.id == variable_id)
    }

    pub fn plot_label(&self, plot_id: Uuid) -> String {
        self.plot(plot_id)
            .map_or_else(|| plot_id.to_string(), |plot| plot.plot_number.clone())
    }

    /// Empty when the plot is unknown or has no treatment
    pub fn plot_treatment(&self, plot_id: Uuid) -> String {
        self.plot(plot_id)
            .and_then(|plot| plot.treatment_id)
            .and_then(|treatment_id| {
                self.treatments
                    .iter()
                    .find(|treatment| treatment.id == treatment_id)
            })
            .map(|treatment| treatment.name.clone())
            .unwrap_or_default()
    }

    pub fn variable_name(&self, variable_id: Uuid) -> String {
        self.variable(variable_id)
            .map_or_else(|| variable_id.to_string(), |variable| variable.name.clone())
    }

    pub fn variable_unit(&self, variable_id: Uuid) -> Option<String> {
        self.variable(variable_id)
            .and_then(|variable| variable.unit.clone())
    }

    pub fn row(&self, entry: &MeasurementEntry) -> EntryRow {
        EntryRow {
            id: entry.id,
            measurement_date: entry.measurement_date,
            plot: self.plot_label(entry.plot_id),
            treatment: self.plot_treatment(entry.plot_id),
            variable: self.variable_name(entry.variable_id),
            unit: self.variable_unit(entry.variable_id),
            value: entry.value.clone(),
            collector: entry.collector(),
            notes: entry.notes.clone(),
        }
    }
}

/// One line of the entry grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRow {
    pub id: Uuid,
    pub measurement_date: NaiveDate,
    pub plot: String,
    pub treatment: String,
    pub variable: String,
    pub unit: Option<String>,
    pub value: String,
    pub collector: String,
    pub notes: Option<String>,
}

/// A trial in the overview list with its catalog sizes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialCard {
    pub trial: Trial,
    pub layout: Option<Layout>,
    pub treatments_count: u64,
    pub variables_count: u64,
    pub entries_count: u64,
}

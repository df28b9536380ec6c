/// Shared builders for test objects across the suite.
///
/// They follow the object hierarchy Trial → {Layout, Treatments, Variables}
/// → Plots → Measurement entries, and unwrap freely: a failing builder means
/// the test setup itself is broken.
use crate::common::identity::Actor;
use crate::measurements::models::{MeasurementDraft, MeasurementEntry};
use crate::plots::models::{Plot, PlotCreate};
use crate::treatments::models::{Treatment, TreatmentCreate};
use crate::trials::models::{Trial, TrialCreate};
use crate::variables::models::{Variable, VariableCreate};
use chrono::NaiveDate;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

pub fn test_actor() -> Actor {
    Actor::new(Uuid::new_v4()).with_display_name("Field Tech")
}

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("Invalid test date")
}

pub async fn create_test_trial<C: ConnectionTrait>(db: &C, name: &str) -> Trial {
    crate::trials::services::create_trial(
        db,
        TrialCreate {
            name: name.to_string(),
            crop: "Corn".to_string(),
            ..TrialCreate::default()
        },
    )
    .await
    .expect("Failed to create test trial")
}

pub async fn create_test_treatment<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    name: &str,
) -> Treatment {
    crate::treatments::services::create_treatment(
        db,
        trial_id,
        TreatmentCreate {
            name: name.to_string(),
            application_method: Some("Soil".to_string()),
            ..TreatmentCreate::default()
        },
    )
    .await
    .expect("Failed to create test treatment")
}

pub async fn create_test_variable<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    name: &str,
    unit: &str,
) -> Variable {
    crate::variables::services::create_variable(
        db,
        trial_id,
        VariableCreate {
            name: name.to_string(),
            unit: Some(unit.to_string()),
            ..VariableCreate::default()
        },
    )
    .await
    .expect("Failed to create test variable")
}

pub async fn create_test_plot<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    plot_number: &str,
    treatment_id: Option<Uuid>,
) -> Plot {
    crate::plots::services::create_plot(
        db,
        trial_id,
        PlotCreate {
            plot_number: plot_number.to_string(),
            treatment_id,
            ..PlotCreate::default()
        },
    )
    .await
    .expect("Failed to create test plot")
}

pub fn entry_draft(
    plot_id: Uuid,
    variable_id: Uuid,
    measured_on: &str,
    value: &str,
) -> MeasurementDraft {
    MeasurementDraft {
        plot_id: Some(plot_id.to_string()),
        measurement_date: Some(measured_on.to_string()),
        variable_id: Some(variable_id.to_string()),
        value: Some(value.to_string()),
        notes: None,
    }
}

pub async fn create_test_entry<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    draft: &MeasurementDraft,
) -> MeasurementEntry {
    let actor = test_actor();
    crate::measurements::services::create_measurement(db, Some(&actor), trial_id, draft, &[])
        .await
        .expect("Failed to create test entry")
}

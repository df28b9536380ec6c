use super::models::{TreatmentCreate, TreatmentForm, TreatmentUpdate};
use super::services::{create_treatment, delete_treatment, list_treatments, update_treatment};
use crate::common::collection::{Collection, CollectionEvent};
use crate::common::errors::BusinessError;
use crate::config::test_helpers::setup_test_db;
use crate::plots;
use crate::test_helpers::{create_test_plot, create_test_treatment, create_test_trial};
use serde_json::json;

#[test]
fn test_form_maps_application_and_drops_edit_index() {
    let form: TreatmentForm = serde_json::from_value(json!({
        "name": "Control",
        "description": "No nitrogen applied",
        "application": "Soil",
        "rate": "0 kg N/ha",
        "timing": "Pre-sowing",
        "_editIdx": 2
    }))
    .unwrap();
    assert_eq!(form.edit_index, Some(2));

    let create = TreatmentCreate::from(form);
    assert_eq!(create.application_method.as_deref(), Some("Soil"));

    let persisted = serde_json::to_value(&create).unwrap();
    assert!(persisted.get("application").is_none());
    assert!(persisted.get("_editIdx").is_none());
}

#[tokio::test]
async fn test_application_round_trip() {
    let db = setup_test_db().await;
    let trial = create_test_trial(&db, "Treatments").await;

    let form: TreatmentForm = serde_json::from_value(json!({
        "name": "High N",
        "application": "Soil",
        "rate": "180 kg N/ha"
    }))
    .unwrap();
    let created = create_treatment(&db, trial.id, form.into()).await.unwrap();
    assert_eq!(created.application_method.as_deref(), Some("Soil"));

    // The edit dialog resubmits the row with its UI-only keys attached
    let update: TreatmentUpdate = serde_json::from_value(json!({
        "rate": "200 kg N/ha",
        "application": "Foliar",
        "_editIdx": 0
    }))
    .unwrap();
    let updated = update_treatment(&db, created.id, update).await.unwrap();

    assert_eq!(updated.rate.as_deref(), Some("200 kg N/ha"));
    assert_eq!(
        updated.application_method.as_deref(),
        Some("Soil"),
        "`application` on an update is ignored"
    );
    assert!(serde_json::to_value(&updated).unwrap().get("application").is_none());
    assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
async fn test_treatments_listed_in_creation_order() {
    let db = setup_test_db().await;
    let trial = create_test_trial(&db, "Treatments").await;
    let other = create_test_trial(&db, "Other").await;

    for name in ["Control", "Low N", "Medium N", "High N"] {
        create_test_treatment(&db, trial.id, name).await;
    }
    create_test_treatment(&db, other.id, "Elsewhere").await;

    let names: Vec<String> = list_treatments(&db, trial.id)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Control", "Low N", "Medium N", "High N"]);
}

#[tokio::test]
async fn test_create_treatment_requires_name() {
    let db = setup_test_db().await;
    let trial = create_test_trial(&db, "Treatments").await;

    let result = create_treatment(
        &db,
        trial.id,
        TreatmentCreate {
            name: "  ".to_string(),
            ..TreatmentCreate::default()
        },
    )
    .await;
    assert!(matches!(result, Err(BusinessError::ValidationError { .. })));
}

#[tokio::test]
async fn test_delete_treatment_unassigns_plots() {
    let db = setup_test_db().await;
    let trial = create_test_trial(&db, "Treatments").await;
    let control = create_test_treatment(&db, trial.id, "Control").await;
    let plot = create_test_plot(&db, trial.id, "P1", Some(control.id)).await;

    delete_treatment(&db, control.id).await.unwrap();

    let plot = plots::services::get_plot(&db, plot.id).await.unwrap().unwrap();
    assert_eq!(plot.treatment_id, None, "Plot survives without its treatment");
    assert!(list_treatments(&db, trial.id).await.unwrap().is_empty());

    assert!(matches!(
        delete_treatment(&db, control.id).await,
        Err(BusinessError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_catalog_cache_follows_writes() {
    let db = setup_test_db().await;
    let trial = create_test_trial(&db, "Treatments").await;
    let mut catalog = Collection::new(list_treatments(&db, trial.id).await.unwrap());

    let control = create_test_treatment(&db, trial.id, "Control").await;
    catalog.apply(CollectionEvent::Created(control.clone()));

    let renamed = update_treatment(
        &db,
        control.id,
        TreatmentUpdate {
            name: Some("Untreated control".to_string()),
            ..TreatmentUpdate::default()
        },
    )
    .await
    .unwrap();
    catalog.apply(CollectionEvent::Updated(renamed.clone()));

    assert_eq!(catalog.items(), list_treatments(&db, trial.id).await.unwrap());
    assert_eq!(catalog.version(), 2);

    delete_treatment(&db, renamed.id).await.unwrap();
    catalog.apply(CollectionEvent::Deleted(renamed.id));
    assert!(catalog.is_empty());
}

use super::models::{VariableCreate, VariableForm, VariableUpdate};
use super::services::{create_variable, delete_variable, list_variables, update_variable};
use crate::common::errors::BusinessError;
use crate::config::test_helpers::setup_test_db;
use crate::measurements;
use crate::test_helpers::{
    create_test_entry, create_test_plot, create_test_trial, create_test_variable, entry_draft,
};
use sea_orm::ConnectionTrait;
use serde_json::json;

#[test]
fn test_form_drops_edit_index() {
    let form: VariableForm = serde_json::from_value(json!({
        "name": "Plant Height",
        "unit": "cm",
        "frequency": "Weekly",
        "_editIdx": 1
    }))
    .unwrap();

    let create = VariableCreate::from(form);
    assert_eq!(create.name, "Plant Height");
    assert!(serde_json::to_value(&create).unwrap().get("_editIdx").is_none());
}

#[tokio::test]
async fn test_variable_crud() {
    let db = setup_test_db().await;
    let trial = create_test_trial(&db, "Variables").await;

    let created = create_variable(
        &db,
        trial.id,
        VariableCreate {
            name: " Yield ".to_string(),
            unit: Some("kg/ha".to_string()),
            frequency: Some("At harvest".to_string()),
            description: Some("   ".to_string()),
            data_type: Some("number".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(created.name, "Yield");
    assert_eq!(created.description, None, "Blank text is stored as absent");
    assert_eq!(created.display_name(), "Yield (kg/ha)");

    let update: VariableUpdate = serde_json::from_value(json!({
        "unit": null,
        "frequency": "Weekly"
    }))
    .unwrap();
    let updated = update_variable(&db, created.id, update).await.unwrap();
    assert_eq!(updated.unit, None);
    assert_eq!(updated.frequency.as_deref(), Some("Weekly"));
    assert_eq!(updated.display_name(), "Yield");

    assert_eq!(list_variables(&db, trial.id).await.unwrap(), vec![updated.clone()]);

    delete_variable(&db, updated.id).await.unwrap();
    assert!(list_variables(&db, trial.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_variable_drops_its_entries() {
    let db = setup_test_db().await;
    let trial = create_test_trial(&db, "Variables").await;
    let plot = create_test_plot(&db, trial.id, "P1", None).await;
    let yield_var = create_test_variable(&db, trial.id, "Yield", "kg/ha").await;
    let height = create_test_variable(&db, trial.id, "Plant Height", "cm").await;

    let yield_entry = entry_draft(plot.id, yield_var.id, "2025-06-01", "450");
    create_test_entry(&db, trial.id, &yield_entry).await;
    let height_entry = entry_draft(plot.id, height.id, "2025-06-01", "182");
    create_test_entry(&db, trial.id, &height_entry).await;

    delete_variable(&db, yield_var.id).await.unwrap();

    let remaining = measurements::services::list_measurements(&db, trial.id)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].variable_id, height.id);
}

#[tokio::test]
async fn test_update_missing_variable_is_not_found() {
    let db = setup_test_db().await;
    let result = update_variable(&db, uuid::Uuid::new_v4(), VariableUpdate::default()).await;
    assert!(matches!(result, Err(BusinessError::NotFound { .. })));
}

#[tokio::test]
async fn test_failed_variable_delete_keeps_its_entries() {
    let db = setup_test_db().await;
    let trial = create_test_trial(&db, "Variables").await;
    let plot = create_test_plot(&db, trial.id, "P1", None).await;
    let yield_var = create_test_variable(&db, trial.id, "Yield", "kg/ha").await;
    let draft = entry_draft(plot.id, yield_var.id, "2025-06-01", "450");
    create_test_entry(&db, trial.id, &draft).await;

    db.execute_unprepared(
        "CREATE TRIGGER reject_variable_delete BEFORE DELETE ON field_trial_variables \
         BEGIN SELECT RAISE(ABORT, 'store rejected'); END",
    )
    .await
    .unwrap();

    assert!(delete_variable(&db, yield_var.id).await.is_err());
    assert_eq!(list_variables(&db, trial.id).await.unwrap().len(), 1);
    let entries = measurements::services::list_measurements(&db, trial.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1, "Entries survive a rolled-back delete");
}

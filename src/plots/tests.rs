use super::models::{PlotCreate, PlotUpdate, PlotView};
use super::services::{create_plot, delete_plot, get_plot, list_plots, update_plot};
use crate::common::errors::BusinessError;
use crate::config::test_helpers::setup_test_db;
use crate::test_helpers::{
    create_test_entry, create_test_plot, create_test_treatment, create_test_trial,
    create_test_variable, entry_draft,
};
use crate::treatments::models::TreatmentUpdate;
use crate::{measurements, treatments};
use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;
use serde_json::json;

#[tokio::test]
async fn test_plots_listed_by_plot_number() {
    let db = setup_test_db().await;
    let trial = create_test_trial(&db, "Plots").await;

    for number in ["P3", "P1", "P2"] {
        create_test_plot(&db, trial.id, number, None).await;
    }

    let numbers: Vec<String> = list_plots(&db, trial.id)
        .await
        .unwrap()
        .into_iter()
        .map(|plot| plot.plot_number)
        .collect();
    assert_eq!(numbers, vec!["P1", "P2", "P3"]);
}

#[tokio::test]
async fn test_legacy_treatment_label_resolves_to_id() {
    let db = setup_test_db().await;
    let trial = create_test_trial(&db, "Plots").await;
    let high_n = create_test_treatment(&db, trial.id, "High N").await;

    let payload: PlotCreate = serde_json::from_value(json!({
        "plot_number": "P2",
        "treatment": "High N",
        "repetition": "1"
    }))
    .unwrap();
    let plot = create_plot(&db, trial.id, payload).await.unwrap();
    assert_eq!(plot.treatment_id, Some(high_n.id));

    let unknown = create_plot(
        &db,
        trial.id,
        PlotCreate {
            plot_number: "P3".to_string(),
            treatment: Some("Ultra N".to_string()),
            ..PlotCreate::default()
        },
    )
    .await;
    assert!(matches!(
        unknown,
        Err(BusinessError::ValidationError { ref field, .. }) if field == "treatment"
    ));
}

#[tokio::test]
async fn test_treatment_of_another_trial_is_rejected() {
    let db = setup_test_db().await;
    let trial = create_test_trial(&db, "Plots").await;
    let other = create_test_trial(&db, "Other").await;
    let foreign = create_test_treatment(&db, other.id, "Control").await;

    let result = create_plot(
        &db,
        trial.id,
        PlotCreate {
            plot_number: "P1".to_string(),
            treatment_id: Some(foreign.id),
            ..PlotCreate::default()
        },
    )
    .await;
    assert!(matches!(result, Err(BusinessError::ValidationError { .. })));
}

#[tokio::test]
async fn test_view_follows_treatment_rename() {
    let db = setup_test_db().await;
    let trial = create_test_trial(&db, "Plots").await;
    let control = create_test_treatment(&db, trial.id, "Control").await;
    let plot = create_test_plot(&db, trial.id, "P1", Some(control.id)).await;
    let bare = create_test_plot(&db, trial.id, "P2", None).await;

    treatments::services::update_treatment(
        &db,
        control.id,
        TreatmentUpdate {
            name: Some("Untreated".to_string()),
            ..TreatmentUpdate::default()
        },
    )
    .await
    .unwrap();
    let catalog = treatments::services::list_treatments(&db, trial.id)
        .await
        .unwrap();

    let views = PlotView::resolve_all(&[plot, bare], &catalog);
    assert_eq!(views[0].treatment_name.as_deref(), Some("Untreated"));
    assert_eq!(views[1].treatment_name, None);
}

#[tokio::test]
async fn test_update_plot_can_clear_treatment() {
    let db = setup_test_db().await;
    let trial = create_test_trial(&db, "Plots").await;
    let control = create_test_treatment(&db, trial.id, "Control").await;
    let plot = create_test_plot(&db, trial.id, "P1", Some(control.id)).await;

    let update: PlotUpdate = serde_json::from_value(json!({
        "treatment_id": null,
        "area": 15.0
    }))
    .unwrap();
    let updated = update_plot(&db, plot.id, update).await.unwrap();

    assert_eq!(updated.treatment_id, None);
    assert_eq!(updated.area, Some(Decimal::from(15)));
    assert_eq!(updated.plot_number, "P1");
}

#[tokio::test]
async fn test_delete_plot_removes_its_entries() {
    let db = setup_test_db().await;
    let trial = create_test_trial(&db, "Plots").await;
    let variable = create_test_variable(&db, trial.id, "Yield", "kg/ha").await;
    let p1 = create_test_plot(&db, trial.id, "P1", None).await;
    let p2 = create_test_plot(&db, trial.id, "P2", None).await;
    create_test_entry(&db, trial.id, &entry_draft(p1.id, variable.id, "2025-06-01", "450")).await;
    create_test_entry(&db, trial.id, &entry_draft(p2.id, variable.id, "2025-06-01", "380")).await;

    delete_plot(&db, p1.id).await.unwrap();

    assert_eq!(get_plot(&db, p1.id).await.unwrap(), None);
    let remaining = measurements::services::list_measurements(&db, trial.id)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].plot_id, p2.id);
}

#[tokio::test]
async fn test_failed_plot_delete_keeps_its_entries() {
    let db = setup_test_db().await;
    let trial = create_test_trial(&db, "Plots").await;
    let variable = create_test_variable(&db, trial.id, "Yield", "kg/ha").await;
    let plot = create_test_plot(&db, trial.id, "P1", None).await;
    let draft = entry_draft(plot.id, variable.id, "2025-06-01", "450");
    create_test_entry(&db, trial.id, &draft).await;

    db.execute_unprepared(
        "CREATE TRIGGER reject_plot_delete BEFORE DELETE ON field_trial_plots \
         BEGIN SELECT RAISE(ABORT, 'store rejected'); END",
    )
    .await
    .unwrap();

    assert!(matches!(
        delete_plot(&db, plot.id).await,
        Err(BusinessError::PersistenceError { .. })
    ));
    assert!(get_plot(&db, plot.id).await.unwrap().is_some());
    let entries = measurements::services::list_measurements(&db, trial.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1, "Entries survive a rolled-back delete");
}

#[tokio::test]
async fn test_delete_missing_plot_is_not_found() {
    let db = setup_test_db().await;
    assert!(matches!(
        delete_plot(&db, uuid::Uuid::new_v4()).await,
        Err(BusinessError::NotFound { .. })
    ));
}

use super::ledger::MeasurementLedger;
use super::models::{MeasurementDraft, MeasurementEntry};
use super::services::{
    create_measurement, delete_measurement, list_measurements, update_measurement,
};
use crate::common::errors::BusinessError;
use crate::common::identity::{Actor, IdentityProvider, StaticIdentity};
use crate::common::notifications::{ChannelNotifier, Severity};
use crate::config::test_helpers::setup_test_db;
use crate::test_helpers::{
    create_test_entry, create_test_plot, create_test_treatment, create_test_trial,
    create_test_variable, date, entry_draft, test_actor,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

struct Scenario {
    db: DatabaseConnection,
    trial_id: Uuid,
    p1: Uuid,
    p2: Uuid,
    yield_var: crate::variables::models::Variable,
}

/// T1 with P1 → Control, P2 → High N and a "Yield (kg/ha)" variable
async fn scenario() -> Scenario {
    let db = setup_test_db().await;
    let trial = create_test_trial(&db, "T1").await;
    let control = create_test_treatment(&db, trial.id, "Control").await;
    let high_n = create_test_treatment(&db, trial.id, "High N").await;
    let p1 = create_test_plot(&db, trial.id, "P1", Some(control.id)).await;
    let p2 = create_test_plot(&db, trial.id, "P2", Some(high_n.id)).await;
    let yield_var = create_test_variable(&db, trial.id, "Yield", "kg/ha").await;

    Scenario {
        db,
        trial_id: trial.id,
        p1: p1.id,
        p2: p2.id,
        yield_var,
    }
}

impl Scenario {
    async fn record(&self, plot_id: Uuid, measured_on: &str, value: &str) -> MeasurementEntry {
        let draft = entry_draft(plot_id, self.yield_var.id, measured_on, value);
        create_test_entry(&self.db, self.trial_id, &draft).await
    }
}

#[tokio::test]
async fn test_entry_is_recorded_for_the_actor() {
    let s = scenario().await;
    let actor = Actor::new(Uuid::new_v4()).with_display_name("Amina");

    let entry = create_measurement(
        &s.db,
        Some(&actor),
        s.trial_id,
        &entry_draft(s.p1, s.yield_var.id, "2025-06-01", " 450 "),
        &[],
    )
    .await
    .unwrap();

    assert_eq!(entry.value, "450");
    assert_eq!(entry.measurement_date, date("2025-06-01"));
    assert_eq!(entry.recorded_by, actor.user_id);
    assert_eq!(entry.collector_name.as_deref(), Some("Amina"));
    assert_eq!(entry.collector(), "Amina");
}

#[tokio::test]
async fn test_newest_measurement_date_listed_first() {
    let s = scenario().await;
    s.record(s.p2, "2025-05-01", "380").await;
    let june = s.record(s.p1, "2025-06-01", "450").await;

    let listed = list_measurements(&s.db, s.trial_id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0], june);
}

#[tokio::test]
async fn test_signed_out_user_writes_nothing() {
    let s = scenario().await;
    let identity = StaticIdentity::anonymous();

    let result = create_measurement(
        &s.db,
        identity.current_actor().as_ref(),
        s.trial_id,
        &entry_draft(s.p1, s.yield_var.id, "2025-06-01", "450"),
        &[],
    )
    .await;

    assert_eq!(result, Err(BusinessError::Unauthenticated));
    assert!(list_measurements(&s.db, s.trial_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cross_trial_references_are_rejected() {
    let s = scenario().await;
    let other = create_test_trial(&s.db, "T2").await;
    let foreign_plot = create_test_plot(&s.db, other.id, "X1", None).await;
    let actor = test_actor();

    let result = create_measurement(
        &s.db,
        Some(&actor),
        s.trial_id,
        &entry_draft(foreign_plot.id, s.yield_var.id, "2025-06-01", "450"),
        &[],
    )
    .await;
    assert!(matches!(
        result,
        Err(BusinessError::ValidationError { ref field, .. }) if field == "plot_id"
    ));

    // Well-formed id that matches nothing at all
    let result = create_measurement(
        &s.db,
        Some(&actor),
        s.trial_id,
        &entry_draft(s.p1, Uuid::new_v4(), "2025-06-01", "450"),
        &[],
    )
    .await;
    assert!(matches!(
        result,
        Err(BusinessError::ValidationError { ref field, .. }) if field == "variable_id"
    ));
    assert!(list_measurements(&s.db, s.trial_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_merges_and_revalidates() {
    let s = scenario().await;
    let actor = test_actor();
    let entry = s.record(s.p1, "2025-06-01", "450").await;

    let updated = update_measurement(
        &s.db,
        Some(&actor),
        entry.id,
        MeasurementDraft {
            value: Some("470".to_string()),
            ..MeasurementDraft::default()
        },
        &[],
    )
    .await
    .unwrap();
    assert_eq!(updated.value, "470");
    assert_eq!(updated.plot_id, s.p1, "Untouched fields keep their stored value");
    assert_eq!(updated.measurement_date, date("2025-06-01"));

    let blank = update_measurement(
        &s.db,
        Some(&actor),
        entry.id,
        MeasurementDraft {
            value: Some("  ".to_string()),
            ..MeasurementDraft::default()
        },
        std::slice::from_ref(&s.yield_var),
    )
    .await;
    assert_eq!(
        blank.unwrap_err().user_message(),
        "Please enter a value for Yield."
    );

    let unauthenticated =
        update_measurement(&s.db, None, entry.id, MeasurementDraft::default(), &[]).await;
    assert_eq!(unauthenticated, Err(BusinessError::Unauthenticated));
}

#[tokio::test]
async fn test_delete_measurement() {
    let s = scenario().await;
    let entry = s.record(s.p1, "2025-06-01", "450").await;

    delete_measurement(&s.db, entry.id).await.unwrap();
    assert!(list_measurements(&s.db, s.trial_id).await.unwrap().is_empty());
    assert!(matches!(
        delete_measurement(&s.db, entry.id).await,
        Err(BusinessError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_ledger_tracks_writes() {
    let s = scenario().await;
    let actor = test_actor();
    let (notifier, mut notifications) = ChannelNotifier::new();
    let mut ledger = MeasurementLedger::new(s.trial_id, Vec::new(), Arc::new(notifier));

    let created = ledger
        .create(
            &s.db,
            Some(&actor),
            &entry_draft(s.p1, s.yield_var.id, "2025-06-01", "450"),
            &[],
        )
        .await
        .unwrap();
    assert_eq!(ledger.entries(), std::slice::from_ref(&created));
    assert_eq!(ledger.version(), 1);

    let updated = ledger
        .update(
            &s.db,
            Some(&actor),
            created.id,
            MeasurementDraft {
                notes: Some("Lodging on the east edge".to_string()),
                ..MeasurementDraft::default()
            },
            &[],
        )
        .await
        .unwrap();
    assert_eq!(ledger.entries(), std::slice::from_ref(&updated));

    ledger.delete(&s.db, created.id).await.unwrap();
    assert!(ledger.entries().is_empty());
    assert_eq!(ledger.version(), 3);
    assert_eq!(ledger.error(), None);
    assert!(notifications.try_recv().is_err(), "No notification on success");
}

#[tokio::test]
async fn test_ledger_validation_failure_is_inline_only() {
    let s = scenario().await;
    let (notifier, mut notifications) = ChannelNotifier::new();
    let mut ledger = MeasurementLedger::new(s.trial_id, Vec::new(), Arc::new(notifier));
    let actor = test_actor();

    let draft = MeasurementDraft {
        plot_id: Some("P1".to_string()),
        ..entry_draft(s.p1, s.yield_var.id, "2025-06-01", "450")
    };
    assert!(ledger.create(&s.db, Some(&actor), &draft, &[]).await.is_err());
    assert_eq!(ledger.error(), Some("Please select a valid plot."));
    assert!(ledger.entries().is_empty());
    assert!(notifications.try_recv().is_err());

    assert!(ledger.create(&s.db, None, &draft, &[]).await.is_err());
    assert_eq!(ledger.error(), Some("User not authenticated"));
    assert!(notifications.try_recv().is_err());
}

#[tokio::test]
async fn test_ledger_store_failure_uses_both_channels() {
    let s = scenario().await;
    let (notifier, mut notifications) = ChannelNotifier::new();
    let mut ledger = MeasurementLedger::new(s.trial_id, Vec::new(), Arc::new(notifier));

    let missing = Uuid::new_v4();
    assert!(ledger.delete(&s.db, missing).await.is_err());

    let inline = ledger.error().map(ToString::to_string).unwrap();
    assert!(inline.contains(&missing.to_string()));

    let notification = notifications.try_recv().unwrap();
    assert_eq!(notification.severity, Severity::Error);
    assert_eq!(notification.message, format!("Error deleting entry: {inline}"));
}

#[tokio::test]
async fn test_ledger_refresh_replaces_entries() {
    let s = scenario().await;
    let (notifier, _notifications) = ChannelNotifier::new();
    let mut ledger = MeasurementLedger::new(s.trial_id, Vec::new(), Arc::new(notifier));

    s.record(s.p2, "2025-05-01", "380").await;
    ledger.refresh(&s.db).await;

    assert_eq!(ledger.entries().len(), 1);
    assert_eq!(ledger.version(), 1);
}

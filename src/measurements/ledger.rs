//! View state for a trial's measurement entries.
//!
//! Failures reach the user two ways. Every failure sets the inline `error`
//! shown above the form. Failures coming back from the store additionally
//! push a blocking notification; validation and sign-in problems do not,
//! since they never left the form.

use super::models::{MeasurementDraft, MeasurementEntry};
use super::services;
use crate::common::collection::{Collection, CollectionEvent};
use crate::common::errors::{BusinessError, BusinessResult};
use crate::common::identity::Actor;
use crate::common::notifications::{Notification, Notifier};
use crate::variables::models::Variable;
use sea_orm::ConnectionTrait;
use std::sync::Arc;
use uuid::Uuid;

pub struct MeasurementLedger {
    trial_id: Uuid,
    entries: Collection<MeasurementEntry>,
    error: Option<String>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for MeasurementLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasurementLedger")
            .field("trial_id", &self.trial_id)
            .field("entries", &self.entries.len())
            .field("version", &self.entries.version())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl MeasurementLedger {
    pub fn new(
        trial_id: Uuid,
        entries: Vec<MeasurementEntry>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            trial_id,
            entries: Collection::new(entries),
            error: None,
            notifier,
        }
    }

    pub fn trial_id(&self) -> Uuid {
        self.trial_id
    }

    pub fn entries(&self) -> &[MeasurementEntry] {
        self.entries.items()
    }

    pub fn version(&self) -> u64 {
        self.entries.version()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn fail(&mut self, prefix: &str, err: &BusinessError) {
        self.error = Some(err.user_message());
        if !err.is_local() {
            tracing::error!("{prefix}: {err}");
            self.notifier
                .notify(Notification::error(format!("{prefix}: {}", err.user_message())));
        }
    }

    /// Reloads the entries from the store. A failed reload keeps the current
    /// entries and only sets the inline error.
    pub async fn refresh<C: ConnectionTrait>(&mut self, db: &C) {
        match services::list_measurements(db, self.trial_id).await {
            Ok(entries) => {
                self.entries.apply(CollectionEvent::Replaced(entries));
                self.error = None;
            }
            Err(err) => {
                tracing::warn!("Could not reload entries of trial {}: {err}", self.trial_id);
                self.error = Some(err.user_message());
            }
        }
    }

    pub async fn create<C: ConnectionTrait>(
        &mut self,
        db: &C,
        actor: Option<&Actor>,
        draft: &MeasurementDraft,
        variables: &[Variable],
    ) -> BusinessResult<MeasurementEntry> {
        match services::create_measurement(db, actor, self.trial_id, draft, variables).await {
            Ok(entry) => {
                self.entries.apply(CollectionEvent::Created(entry.clone()));
                self.error = None;
                Ok(entry)
            }
            Err(err) => {
                self.fail("Error saving entry", &err);
                Err(err)
            }
        }
    }

    pub async fn update<C: ConnectionTrait>(
        &mut self,
        db: &C,
        actor: Option<&Actor>,
        id: Uuid,
        update: MeasurementDraft,
        variables: &[Variable],
    ) -> BusinessResult<MeasurementEntry> {
        match services::update_measurement(db, actor, id, update, variables).await {
            Ok(entry) => {
                self.entries.apply(CollectionEvent::Updated(entry.clone()));
                self.error = None;
                Ok(entry)
            }
            Err(err) => {
                self.fail("Error saving entry", &err);
                Err(err)
            }
        }
    }

    pub async fn delete<C: ConnectionTrait>(&mut self, db: &C, id: Uuid) -> BusinessResult<()> {
        match services::delete_measurement(db, id).await {
            Ok(()) => {
                self.entries.apply(CollectionEvent::Deleted(id));
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.fail("Error deleting entry", &err);
                Err(err)
            }
        }
    }
}

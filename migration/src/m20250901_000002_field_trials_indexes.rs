use crate::m20250901_000001_field_trials_schema::{
    FieldTrialAttachments, FieldTrialData, FieldTrialPlots, FieldTrialTasks,
    FieldTrialTreatments, FieldTrialVariables, FieldTrials,
};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            // Trigram extension backs the free-text trial search
            manager
                .get_connection()
                .execute_unprepared("CREATE EXTENSION IF NOT EXISTS pg_trgm")
                .await?;
        }

        // ============ FIELD TRIALS ============
        manager
            .create_index(
                Index::create()
                    .name("idx_field_trials_created_at")
                    .table(FieldTrials::Table)
                    .col(FieldTrials::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_field_trials_responsible_agronomist_id")
                    .table(FieldTrials::Table)
                    .col(FieldTrials::ResponsibleAgronomistId)
                    .to_owned(),
            )
            .await?;

        // ============ CATALOGS ============
        manager
            .create_index(
                Index::create()
                    .name("idx_field_trial_treatments_trial_id")
                    .table(FieldTrialTreatments::Table)
                    .col(FieldTrialTreatments::TrialId)
                    .col(FieldTrialTreatments::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_field_trial_variables_trial_id")
                    .table(FieldTrialVariables::Table)
                    .col(FieldTrialVariables::TrialId)
                    .col(FieldTrialVariables::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_field_trial_plots_trial_id")
                    .table(FieldTrialPlots::Table)
                    .col(FieldTrialPlots::TrialId)
                    .col(FieldTrialPlots::PlotNumber)
                    .to_owned(),
            )
            .await?;

        // ============ LEDGER ============
        manager
            .create_index(
                Index::create()
                    .name("idx_field_trial_data_trial_date")
                    .table(FieldTrialData::Table)
                    .col(FieldTrialData::TrialId)
                    .col(FieldTrialData::MeasurementDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_field_trial_tasks_trial_due_date")
                    .table(FieldTrialTasks::Table)
                    .col(FieldTrialTasks::TrialId)
                    .col(FieldTrialTasks::DueDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_field_trial_attachments_trial_id")
                    .table(FieldTrialAttachments::Table)
                    .col(FieldTrialAttachments::TrialId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_field_trial_attachments_trial_id",
            "idx_field_trial_tasks_trial_due_date",
            "idx_field_trial_data_trial_date",
            "idx_field_trial_plots_trial_id",
            "idx_field_trial_variables_trial_id",
            "idx_field_trial_treatments_trial_id",
            "idx_field_trials_responsible_agronomist_id",
            "idx_field_trials_created_at",
        ] {
            manager
                .get_connection()
                .execute_unprepared(&format!("DROP INDEX IF EXISTS {name}"))
                .await
                .ok();
        }
        Ok(())
    }
}

use crate::m20250901_000001_field_trials_schema::{
    id_column, timestamp_column, trial_foreign_key,
};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FieldTrialNotes::Table)
                    .if_not_exists()
                    .col(id_column(FieldTrialNotes::Id))
                    .col(ColumnDef::new(FieldTrialNotes::TrialId).uuid().not_null())
                    .col(ColumnDef::new(FieldTrialNotes::Title).string().not_null())
                    .col(ColumnDef::new(FieldTrialNotes::Content).text().not_null())
                    .col(ColumnDef::new(FieldTrialNotes::AuthorId).uuid().not_null())
                    .col(timestamp_column(FieldTrialNotes::CreatedAt))
                    .col(timestamp_column(FieldTrialNotes::UpdatedAt))
                    .foreign_key(&mut trial_foreign_key(
                        FieldTrialNotes::Table,
                        FieldTrialNotes::TrialId,
                        "fk_field_trial_notes_trial_id",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_field_trial_notes_trial_id")
                    .table(FieldTrialNotes::Table)
                    .col(FieldTrialNotes::TrialId)
                    .col(FieldTrialNotes::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The index goes with the table
        manager
            .drop_table(Table::drop().table(FieldTrialNotes::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum FieldTrialNotes {
    Table,
    Id,
    TrialId,
    Title,
    Content,
    AuthorId,
    CreatedAt,
    UpdatedAt,
}

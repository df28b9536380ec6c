use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

pub(crate) fn id_column<T: IntoIden>(iden: T) -> ColumnDef {
    ColumnDef::new(iden).uuid().not_null().primary_key().to_owned()
}

pub(crate) fn timestamp_column<T: IntoIden>(iden: T) -> ColumnDef {
    ColumnDef::new(iden)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

/// Every child table hangs off `field_trials` and disappears with it.
pub(crate) fn trial_foreign_key<T>(table: T, column: T, name: &str) -> ForeignKeyCreateStatement
where
    T: IntoIden + Copy + 'static,
{
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(FieldTrials::Table, FieldTrials::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::NoAction)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FieldTrials::Table)
                    .if_not_exists()
                    .col(id_column(FieldTrials::Id))
                    .col(ColumnDef::new(FieldTrials::Name).string().not_null())
                    .col(
                        ColumnDef::new(FieldTrials::TrialCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(FieldTrials::Crop).string().not_null())
                    .col(ColumnDef::new(FieldTrials::VarietyHybrid).string())
                    .col(ColumnDef::new(FieldTrials::TrialType).string())
                    .col(ColumnDef::new(FieldTrials::Season).string())
                    .col(ColumnDef::new(FieldTrials::StartDate).date())
                    .col(ColumnDef::new(FieldTrials::EndDate).date())
                    .col(
                        ColumnDef::new(FieldTrials::Status)
                            .string()
                            .not_null()
                            .default("planned"),
                    )
                    .col(ColumnDef::new(FieldTrials::Objective).text())
                    .col(ColumnDef::new(FieldTrials::FarmName).string())
                    .col(ColumnDef::new(FieldTrials::FieldLocation).string())
                    .col(ColumnDef::new(FieldTrials::GpsCoordinates).string())
                    .col(ColumnDef::new(FieldTrials::TrialArea).decimal_len(16, 4))
                    .col(ColumnDef::new(FieldTrials::ResponsibleAgronomistId).uuid())
                    .col(
                        ColumnDef::new(FieldTrials::ResponsibleAgronomistIds)
                            .json()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FieldTrials::Tags).json().not_null())
                    .col(ColumnDef::new(FieldTrials::TrialCategory).string())
                    .col(ColumnDef::new(FieldTrials::Budget).decimal_len(16, 4))
                    .col(
                        ColumnDef::new(FieldTrials::Spent)
                            .decimal_len(16, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(FieldTrials::CompletionPercentage)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(FieldTrials::NotificationsEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(FieldTrials::IsDraft)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp_column(FieldTrials::CreatedAt))
                    .col(timestamp_column(FieldTrials::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FieldTrialLayouts::Table)
                    .if_not_exists()
                    .col(id_column(FieldTrialLayouts::Id))
                    .col(
                        ColumnDef::new(FieldTrialLayouts::TrialId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(FieldTrialLayouts::DesignType).string())
                    .col(
                        ColumnDef::new(FieldTrialLayouts::Replications)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(FieldTrialLayouts::PlotWidth)
                            .decimal_len(16, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(FieldTrialLayouts::PlotLength)
                            .decimal_len(16, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(FieldTrialLayouts::PlotUnit)
                            .string()
                            .not_null()
                            .default("m"),
                    )
                    .col(
                        ColumnDef::new(FieldTrialLayouts::RowSpacing)
                            .decimal_len(16, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(FieldTrialLayouts::TotalPlots)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(timestamp_column(FieldTrialLayouts::CreatedAt))
                    .col(timestamp_column(FieldTrialLayouts::UpdatedAt))
                    .foreign_key(&mut trial_foreign_key(
                        FieldTrialLayouts::Table,
                        FieldTrialLayouts::TrialId,
                        "fk_field_trial_layouts_trial_id",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FieldTrialTreatments::Table)
                    .if_not_exists()
                    .col(id_column(FieldTrialTreatments::Id))
                    .col(ColumnDef::new(FieldTrialTreatments::TrialId).uuid().not_null())
                    .col(ColumnDef::new(FieldTrialTreatments::Name).string().not_null())
                    .col(ColumnDef::new(FieldTrialTreatments::Description).text())
                    .col(ColumnDef::new(FieldTrialTreatments::ApplicationMethod).string())
                    .col(ColumnDef::new(FieldTrialTreatments::Rate).string())
                    .col(ColumnDef::new(FieldTrialTreatments::Timing).string())
                    .col(ColumnDef::new(FieldTrialTreatments::Color).string())
                    .col(timestamp_column(FieldTrialTreatments::CreatedAt))
                    .col(timestamp_column(FieldTrialTreatments::UpdatedAt))
                    .foreign_key(&mut trial_foreign_key(
                        FieldTrialTreatments::Table,
                        FieldTrialTreatments::TrialId,
                        "fk_field_trial_treatments_trial_id",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FieldTrialVariables::Table)
                    .if_not_exists()
                    .col(id_column(FieldTrialVariables::Id))
                    .col(ColumnDef::new(FieldTrialVariables::TrialId).uuid().not_null())
                    .col(ColumnDef::new(FieldTrialVariables::Name).string().not_null())
                    .col(ColumnDef::new(FieldTrialVariables::Unit).string())
                    .col(ColumnDef::new(FieldTrialVariables::Frequency).string())
                    .col(ColumnDef::new(FieldTrialVariables::Description).text())
                    .col(ColumnDef::new(FieldTrialVariables::DataType).string())
                    .col(timestamp_column(FieldTrialVariables::CreatedAt))
                    .col(timestamp_column(FieldTrialVariables::UpdatedAt))
                    .foreign_key(&mut trial_foreign_key(
                        FieldTrialVariables::Table,
                        FieldTrialVariables::TrialId,
                        "fk_field_trial_variables_trial_id",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FieldTrialPlots::Table)
                    .if_not_exists()
                    .col(id_column(FieldTrialPlots::Id))
                    .col(ColumnDef::new(FieldTrialPlots::TrialId).uuid().not_null())
                    .col(ColumnDef::new(FieldTrialPlots::PlotNumber).string().not_null())
                    .col(ColumnDef::new(FieldTrialPlots::TreatmentId).uuid())
                    .col(ColumnDef::new(FieldTrialPlots::Repetition).string())
                    .col(ColumnDef::new(FieldTrialPlots::Geojson).json())
                    .col(ColumnDef::new(FieldTrialPlots::Area).decimal_len(16, 4))
                    .col(timestamp_column(FieldTrialPlots::CreatedAt))
                    .col(timestamp_column(FieldTrialPlots::UpdatedAt))
                    .foreign_key(&mut trial_foreign_key(
                        FieldTrialPlots::Table,
                        FieldTrialPlots::TrialId,
                        "fk_field_trial_plots_trial_id",
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_field_trial_plots_treatment_id")
                            .from(FieldTrialPlots::Table, FieldTrialPlots::TreatmentId)
                            .to(FieldTrialTreatments::Table, FieldTrialTreatments::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FieldTrialData::Table)
                    .if_not_exists()
                    .col(id_column(FieldTrialData::Id))
                    .col(ColumnDef::new(FieldTrialData::TrialId).uuid().not_null())
                    .col(ColumnDef::new(FieldTrialData::PlotId).uuid().not_null())
                    .col(ColumnDef::new(FieldTrialData::VariableId).uuid().not_null())
                    .col(ColumnDef::new(FieldTrialData::Value).text().not_null())
                    .col(ColumnDef::new(FieldTrialData::MeasurementDate).date().not_null())
                    .col(ColumnDef::new(FieldTrialData::RecordedBy).uuid().not_null())
                    .col(ColumnDef::new(FieldTrialData::CollectorName).string())
                    .col(ColumnDef::new(FieldTrialData::Notes).text())
                    .col(timestamp_column(FieldTrialData::CreatedAt))
                    .col(timestamp_column(FieldTrialData::UpdatedAt))
                    .foreign_key(&mut trial_foreign_key(
                        FieldTrialData::Table,
                        FieldTrialData::TrialId,
                        "fk_field_trial_data_trial_id",
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_field_trial_data_plot_id")
                            .from(FieldTrialData::Table, FieldTrialData::PlotId)
                            .to(FieldTrialPlots::Table, FieldTrialPlots::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_field_trial_data_variable_id")
                            .from(FieldTrialData::Table, FieldTrialData::VariableId)
                            .to(FieldTrialVariables::Table, FieldTrialVariables::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FieldTrialTeams::Table)
                    .if_not_exists()
                    .col(id_column(FieldTrialTeams::Id))
                    .col(ColumnDef::new(FieldTrialTeams::TrialId).uuid().not_null())
                    .col(ColumnDef::new(FieldTrialTeams::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(FieldTrialTeams::Role)
                            .string()
                            .not_null()
                            .default("viewer"),
                    )
                    .col(timestamp_column(FieldTrialTeams::AddedAt))
                    .foreign_key(&mut trial_foreign_key(
                        FieldTrialTeams::Table,
                        FieldTrialTeams::TrialId,
                        "fk_field_trial_teams_trial_id",
                    ))
                    .to_owned(),
            )
            .await?;

        // One membership row per user and trial
        manager
            .create_index(
                Index::create()
                    .name("uq_field_trial_teams_trial_user")
                    .table(FieldTrialTeams::Table)
                    .col(FieldTrialTeams::TrialId)
                    .col(FieldTrialTeams::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FieldTrialTasks::Table)
                    .if_not_exists()
                    .col(id_column(FieldTrialTasks::Id))
                    .col(ColumnDef::new(FieldTrialTasks::TrialId).uuid().not_null())
                    .col(ColumnDef::new(FieldTrialTasks::Title).string().not_null())
                    .col(ColumnDef::new(FieldTrialTasks::Description).text())
                    .col(ColumnDef::new(FieldTrialTasks::DueDate).date().not_null())
                    .col(
                        ColumnDef::new(FieldTrialTasks::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(FieldTrialTasks::ResponsiblePersonId).uuid())
                    .col(
                        ColumnDef::new(FieldTrialTasks::Priority)
                            .string()
                            .not_null()
                            .default("medium"),
                    )
                    .col(timestamp_column(FieldTrialTasks::CreatedAt))
                    .col(timestamp_column(FieldTrialTasks::UpdatedAt))
                    .foreign_key(&mut trial_foreign_key(
                        FieldTrialTasks::Table,
                        FieldTrialTasks::TrialId,
                        "fk_field_trial_tasks_trial_id",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FieldTrialAttachments::Table)
                    .if_not_exists()
                    .col(id_column(FieldTrialAttachments::Id))
                    .col(ColumnDef::new(FieldTrialAttachments::TrialId).uuid().not_null())
                    .col(ColumnDef::new(FieldTrialAttachments::FileName).string().not_null())
                    .col(ColumnDef::new(FieldTrialAttachments::FilePath).string().not_null())
                    .col(ColumnDef::new(FieldTrialAttachments::FileType).string().not_null())
                    .col(
                        ColumnDef::new(FieldTrialAttachments::FileSize)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(FieldTrialAttachments::Description).text())
                    .col(
                        ColumnDef::new(FieldTrialAttachments::AttachmentType)
                            .string()
                            .not_null()
                            .default("document"),
                    )
                    .col(ColumnDef::new(FieldTrialAttachments::UploadedBy).uuid())
                    .col(timestamp_column(FieldTrialAttachments::UploadedAt))
                    .foreign_key(&mut trial_foreign_key(
                        FieldTrialAttachments::Table,
                        FieldTrialAttachments::TrialId,
                        "fk_field_trial_attachments_trial_id",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FieldTrialSetupSteps::Table)
                    .if_not_exists()
                    .col(id_column(FieldTrialSetupSteps::Id))
                    .col(ColumnDef::new(FieldTrialSetupSteps::TrialId).uuid().not_null())
                    .col(ColumnDef::new(FieldTrialSetupSteps::StepKind).string().not_null())
                    .col(ColumnDef::new(FieldTrialSetupSteps::Payload).json().not_null())
                    .col(ColumnDef::new(FieldTrialSetupSteps::LastError).text().not_null())
                    .col(
                        ColumnDef::new(FieldTrialSetupSteps::Attempts)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(timestamp_column(FieldTrialSetupSteps::CreatedAt))
                    .col(timestamp_column(FieldTrialSetupSteps::UpdatedAt))
                    .foreign_key(&mut trial_foreign_key(
                        FieldTrialSetupSteps::Table,
                        FieldTrialSetupSteps::TrialId,
                        "fk_field_trial_setup_steps_trial_id",
                    ))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children first so foreign keys never dangle
        manager
            .drop_table(Table::drop().table(FieldTrialSetupSteps::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FieldTrialAttachments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FieldTrialTasks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FieldTrialTeams::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FieldTrialData::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FieldTrialPlots::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FieldTrialVariables::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FieldTrialTreatments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FieldTrialLayouts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FieldTrials::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
pub(crate) enum FieldTrials {
    Table,
    Id,
    Name,
    TrialCode,
    Crop,
    VarietyHybrid,
    TrialType,
    Season,
    StartDate,
    EndDate,
    Status,
    Objective,
    FarmName,
    FieldLocation,
    GpsCoordinates,
    TrialArea,
    ResponsibleAgronomistId,
    ResponsibleAgronomistIds,
    Tags,
    TrialCategory,
    Budget,
    Spent,
    CompletionPercentage,
    NotificationsEnabled,
    IsDraft,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
pub(crate) enum FieldTrialLayouts {
    Table,
    Id,
    TrialId,
    DesignType,
    Replications,
    PlotWidth,
    PlotLength,
    PlotUnit,
    RowSpacing,
    TotalPlots,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
pub(crate) enum FieldTrialTreatments {
    Table,
    Id,
    TrialId,
    Name,
    Description,
    ApplicationMethod,
    Rate,
    Timing,
    Color,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
pub(crate) enum FieldTrialVariables {
    Table,
    Id,
    TrialId,
    Name,
    Unit,
    Frequency,
    Description,
    DataType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
pub(crate) enum FieldTrialPlots {
    Table,
    Id,
    TrialId,
    PlotNumber,
    TreatmentId,
    Repetition,
    Geojson,
    Area,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
pub(crate) enum FieldTrialData {
    Table,
    Id,
    TrialId,
    PlotId,
    VariableId,
    Value,
    MeasurementDate,
    RecordedBy,
    CollectorName,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
pub(crate) enum FieldTrialTeams {
    Table,
    Id,
    TrialId,
    UserId,
    Role,
    AddedAt,
}

#[derive(DeriveIden, Clone, Copy)]
pub(crate) enum FieldTrialTasks {
    Table,
    Id,
    TrialId,
    Title,
    Description,
    DueDate,
    Status,
    ResponsiblePersonId,
    Priority,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
pub(crate) enum FieldTrialAttachments {
    Table,
    Id,
    TrialId,
    FileName,
    FilePath,
    FileType,
    FileSize,
    Description,
    AttachmentType,
    UploadedBy,
    UploadedAt,
}

#[derive(DeriveIden, Clone, Copy)]
pub(crate) enum FieldTrialSetupSteps {
    Table,
    Id,
    TrialId,
    StepKind,
    Payload,
    LastError,
    Attempts,
    CreatedAt,
    UpdatedAt,
}

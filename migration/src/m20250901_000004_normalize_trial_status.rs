use crate::m20250901_000001_field_trials_schema::FieldTrials;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    /// Rewrites the legacy "ongoing" status so every stored row decodes
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let update = Query::update()
            .table(FieldTrials::Table)
            .value(FieldTrials::Status, "active")
            .and_where(Expr::col(FieldTrials::Status).eq("ongoing"))
            .to_owned();

        let db = manager.get_connection();
        db.execute(db.get_database_backend().build(&update)).await?;
        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // Which rows were "ongoing" is not recorded
        Ok(())
    }
}

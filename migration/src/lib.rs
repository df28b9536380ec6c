pub use sea_orm_migration::prelude::*;

mod m20250901_000001_field_trials_schema;
mod m20250901_000002_field_trials_indexes;
mod m20250901_000003_field_trial_notes;
mod m20250901_000004_normalize_trial_status;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_field_trials_schema::Migration),
            Box::new(m20250901_000002_field_trials_indexes::Migration),
            Box::new(m20250901_000003_field_trial_notes::Migration),
            Box::new(m20250901_000004_normalize_trial_status::Migration),
        ]
    }
}

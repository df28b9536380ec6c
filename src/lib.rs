pub mod common;
pub mod config;

pub mod layouts;
pub mod measurements;
pub mod plots;
pub mod summaries;
pub mod treatments;
pub mod trials;
pub mod variables;

#[cfg(test)]
pub mod test_helpers;

use crate::config::Config;
use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

/// Installs the fmt subscriber. Safe to call more than once; later calls
/// leave the first subscriber in place.
pub fn init_tracing() {
    if tracing_subscriber::fmt().try_init().is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Opens the store and brings its schema up to date
pub async fn connect(config: &Config) -> anyhow::Result<DatabaseConnection> {
    let url = config
        .db_url
        .as_deref()
        .context("No database URL configured")?;

    let db = Database::connect(url)
        .await
        .context("Could not connect to the database")?;
    tracing::info!(
        "Connected to the database for {} ({} deployment)",
        config.app_name,
        config.deployment.to_uppercase()
    );

    Migrator::up(&db, None)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("DB migrations complete");

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_runs_migrations() {
        init_tracing();
        init_tracing();

        let db = connect(&Config::for_tests()).await.unwrap();
        db.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_without_url_fails() {
        let config = Config {
            db_url: None,
            ..Config::for_tests()
        };
        let err = connect(&config).await.unwrap_err();
        assert_eq!(err.to_string(), "No database URL configured");
    }
}

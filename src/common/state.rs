use crate::config::Config;
use sea_orm::DatabaseConnection;

/// Store handle plus configuration, cloned into every component that talks
/// to the store
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        Self { db, config }
    }
}

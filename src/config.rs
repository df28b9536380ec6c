use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub db_url: Option<String>,
    pub app_name: String,
    pub deployment: String,
    /// Upper bound for a single store round-trip feeding a composed view
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load from .env file if available
        let db_url = match env::var("DB_URL") {
            Ok(url) => Some(url),
            Err(_) => Some(format!(
                "{}://{}:{}@{}:{}/{}",
                env::var("DB_PREFIX").unwrap_or_else(|_| "postgresql".to_string()),
                env::var("DB_USER").context("DB_USER must be set")?,
                env::var("DB_PASSWORD").context("DB_PASSWORD must be set")?,
                env::var("DB_HOST").context("DB_HOST must be set")?,
                env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string()),
                env::var("DB_NAME").context("DB_NAME must be set")?,
            )),
        };

        let request_timeout_secs = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("REQUEST_TIMEOUT_SECS is not a number: {raw}"))?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Config {
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "field-trials".to_string()),
            deployment: env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            request_timeout: Duration::from_secs(request_timeout_secs),
            db_url,
        })
    }

    pub fn for_tests() -> Self {
        Config {
            app_name: "field-trials-test".to_string(),
            deployment: "test".to_string(),
            request_timeout: Duration::from_secs(5),
            db_url: Some("sqlite::memory:".to_string()),
        }
    }
}

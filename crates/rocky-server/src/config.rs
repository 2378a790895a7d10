//! Server configuration from the environment.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use rocky_db::DbConfig;
use rocky_remote::RemoteConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db: DbConfig,
    pub katalogus: RemoteConfig,
    pub octopoes: RemoteConfig,
}

impl ServerConfig {
    /// Read the configuration, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let db = DbConfig::from_vars(|key| env::var(key).ok());

        let timeout = Duration::from_secs(
            env::var("REMOTE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("REMOTE_TIMEOUT_SECS must be a whole number of seconds")?,
        );

        let katalogus = RemoteConfig::new(
            env::var("KATALOGUS_API").context("KATALOGUS_API must be set")?,
        )
        .with_timeout(timeout);
        let octopoes = RemoteConfig::new(
            env::var("OCTOPOES_API").context("OCTOPOES_API must be set")?,
        )
        .with_timeout(timeout);

        Ok(Self {
            db,
            katalogus,
            octopoes,
        })
    }
}

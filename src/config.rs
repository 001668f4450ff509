use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env(database_url: Option<String>) -> anyhow::Result<Self> {
        Self::from_vars(database_url, |key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. An explicit `database_url`
    /// wins over `DATABASE_URL`.
    pub fn from_vars<F>(database_url: Option<String>, var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match database_url {
            Some(url) => url,
            None => var("DATABASE_URL").context("DATABASE_URL is not set")?,
        };
        let max_connections = var("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(1);
        Ok(Self {
            database_url,
            max_connections,
        })
    }
}

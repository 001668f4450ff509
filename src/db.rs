use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

/// Builds the pool without touching the server; the first connection is made when a
/// transaction is opened, so an unreachable database surfaces as a failed store operation.
pub fn pool(config: &AppConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_lazy(&config.database_url)
        .context("parse database url")?;
    Ok(db)
}

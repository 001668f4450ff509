//! Command-line interface for provisioning the admin panel superuser.
//!
//! # Usage
//!
//! ```bash
//! create-superuser admin@example.com mypassword --first-name Admin --last-name User
//! ```
//!
//! When the database only lives inside the compose network, run it from the api
//! container:
//!
//! ```bash
//! docker-compose -f docker/compose/docker-compose.yml run --rm api \
//!     create-superuser <email> <password> [--first-name FIRST] [--last-name LAST]
//! ```

use clap::Parser;
use tracing::info;

use crate::auth::Argon2Hasher;
use crate::config::AppConfig;
use crate::db;
use crate::users::{ensure_superuser, PgUserStore, SuperuserRequest};

/// Create a superuser for the admin panel.
#[derive(Parser, Debug, Clone)]
#[command(name = "create-superuser", version, about = "Create a superuser for the admin panel")]
pub struct Args {
    /// Email address for the superuser.
    pub email: String,

    /// Password for the superuser.
    pub password: String,

    /// First name of the superuser.
    #[arg(long)]
    pub first_name: Option<String>,

    /// Last name of the superuser.
    #[arg(long)]
    pub last_name: Option<String>,

    /// Database connection URL.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

impl Args {
    pub fn into_parts(self) -> (Option<String>, SuperuserRequest) {
        let request = SuperuserRequest {
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
        };
        (self.database_url, request)
    }
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    let (database_url, request) = args.into_parts();
    let config = AppConfig::from_env(database_url)?;
    let db = db::pool(&config)?;
    let store = PgUserStore::new(db.clone());

    let result = ensure_superuser(&store, &Argon2Hasher, &request).await;
    db.close().await;
    let outcome = result?;

    for line in outcome.messages(&request.email) {
        println!("{line}");
    }
    info!(user_id = %outcome.id(), "done");
    Ok(())
}

/// Failure report: the error itself, then one line per cause.
pub fn error_lines(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut lines = vec![format!("Error creating superuser: {err}")];
    let mut cause = err.source();
    while let Some(c) = cause {
        lines.push(format!("Caused by: {c}"));
        cause = c.source();
    }
    lines
}

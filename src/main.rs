use std::process::ExitCode;

use clap::Parser;

mod auth;
mod cli;
mod config;
mod db;
mod users;

use crate::cli::Args;

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "create_superuser=info,sqlx=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    // stdout is reserved for outcome messages
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();

    tokio::select! {
        res = cli::run(args) => match res {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                for line in cli::error_lines(&*e) {
                    eprintln!("{line}");
                }
                ExitCode::FAILURE
            }
        },
        Ok(()) = tokio::signal::ctrl_c() => {
            // Dropping the run future drops the open transaction, which rolls it back.
            println!("\nOperation cancelled by user.");
            ExitCode::FAILURE
        }
    }
}

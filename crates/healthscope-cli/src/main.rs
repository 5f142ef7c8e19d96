//! HealthScope CLI - Personal symptom tracker
//!
//! Usage:
//!   healthscope launch                          Resolve the launch gate
//!   healthscope onboard --name Ana              Create the profile
//!   healthscope log headache --severity mild    Log a symptom
//!   healthscope insights --range month          Show insights and statistics

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let data_dir = commands::resolve_data_dir(cli.data_dir.as_deref())?;

    match cli.command {
        Commands::Launch => commands::cmd_launch(&data_dir, cli.config.as_deref()).await,
        Commands::Onboard { name, age, email } => {
            let store = commands::open_store(&data_dir)?;
            commands::cmd_onboard(&store, &name, age.as_deref(), email.as_deref())
        }
        Commands::Log {
            category,
            severity,
            notes,
            duration,
            at,
        } => {
            let repository = commands::open_repository(&data_dir)?;
            commands::cmd_log(
                &repository,
                &category,
                &severity,
                notes.as_deref(),
                duration.as_deref(),
                at.as_deref(),
            )
            .map(|_| ())
        }
        Commands::List {
            category,
            recent,
            json,
        } => {
            let repository = commands::open_repository(&data_dir)?;
            commands::cmd_list(&repository, category.as_deref(), recent, json)
        }
        Commands::Edit {
            id,
            category,
            severity,
            notes,
            duration,
            at,
        } => {
            let repository = commands::open_repository(&data_dir)?;
            commands::cmd_edit(
                &repository,
                id,
                commands::EntryChanges {
                    category,
                    severity,
                    notes,
                    duration,
                    at,
                },
            )
            .map(|_| ())
        }
        Commands::Delete { id } => {
            let repository = commands::open_repository(&data_dir)?;
            commands::cmd_delete(&repository, id)
        }
        Commands::Insights { range, json } => {
            let repository = commands::open_repository(&data_dir)?;
            commands::cmd_insights(repository, &range, json)
        }
        Commands::Profile => {
            let store = commands::open_store(&data_dir)?;
            commands::cmd_profile(&store)
        }
        Commands::Notifications { state } => {
            let account = commands::open_account(&data_dir)?;
            commands::cmd_notifications(&account, state.is_on())
        }
        Commands::Reset { yes } => {
            let account = commands::open_account(&data_dir)?;
            let confirmation = commands::confirm(
                "This will delete all logged symptoms. This action cannot be undone.",
                yes,
            )?;
            commands::cmd_reset(&account, confirmation)
        }
        Commands::DeleteAccount { yes } => {
            let account = commands::open_account(&data_dir)?;
            let confirmation = commands::confirm(
                "This will delete all your data and reset the app. This action cannot be undone.",
                yes,
            )?;
            commands::cmd_delete_account(&account, confirmation)
        }
    }
}

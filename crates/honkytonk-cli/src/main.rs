//! `honkytonk`: run syncs once (for cron), manage channels and inspect sync status
//! directly against the database.
//!
//! Reads the same environment as the API server (`DATABASE_URL`, source credentials, ...).

use anyhow::Context;
use clap::{Parser, Subcommand};
use honkytonk_cli::{
    channels_table, init_tracing, status_table, sync_outcomes_table, OutputFormat, SyncOutcome,
    SyncTarget,
};
use honkytonk_core::models::{ChannelCategory, CreateChannelRequest};
use honkytonk_core::Config;
use honkytonk_db::Repositories;
use honkytonk_sources::{build_client, YouTubeApiClient};
use honkytonk_sync::{ChannelRegistry, SyncRunner};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "honkytonk", about = "Honkytonk Hub maintenance CLI")]
struct Cli {
    /// Output format
    #[arg(long, value_enum, global = true, default_value = "table")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run sync jobs once and print the recorded runs. Exits non-zero if any run failed.
    Sync {
        #[arg(value_enum)]
        job: SyncTarget,
    },
    /// Channel operations
    Channels {
        #[command(subcommand)]
        sub: ChannelCommands,
    },
    /// Latest run of every sync job
    Status,
}

#[derive(Subcommand)]
enum ChannelCommands {
    /// List all channels, including inactive ones
    List,
    /// Register a channel by UC… id, @handle or channel URL
    Add {
        input: String,
        /// Display name (defaults to the YouTube title, or the id)
        #[arg(long)]
        name: Option<String>,
        /// artist, label, media or other
        #[arg(long)]
        category: Option<ChannelCategory>,
    },
    /// Remove a channel by its YouTube channel id
    Remove { channel_id: String },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections().min(5))
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")?;
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    let repos = Repositories::new(pool);

    match cli.command {
        Commands::Sync { job } => {
            let runner = SyncRunner::from_config(&config, &repos)
                .context("Failed to build sync jobs")?;

            let mut outcomes = Vec::new();
            for kind in job.kinds() {
                outcomes.push(SyncOutcome::new(kind, runner.run(kind).await));
            }

            match cli.format {
                OutputFormat::Json => print_json(&outcomes)?,
                OutputFormat::Table => println!("{}", sync_outcomes_table(&outcomes)),
            }

            if outcomes.iter().any(SyncOutcome::failed) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Channels { sub } => match sub {
            ChannelCommands::List => {
                let channels = repos.channels.list_all().await?;
                match cli.format {
                    OutputFormat::Json => print_json(&channels)?,
                    OutputFormat::Table => println!("{}", channels_table(&channels)),
                }
            }
            ChannelCommands::Add {
                input,
                name,
                category,
            } => {
                let sources = config.sources();
                let youtube_api = match sources.youtube_api_key.as_deref() {
                    Some(key) => Some(YouTubeApiClient::new(
                        build_client(sources.http_timeout_secs)?,
                        &sources.youtube_api_base_url,
                        key,
                    )),
                    None => None,
                };
                let registry = ChannelRegistry::new(repos.channels.clone(), youtube_api);
                let channel = registry
                    .register(&CreateChannelRequest {
                        channel: input,
                        name,
                        category,
                    })
                    .await?;
                match cli.format {
                    OutputFormat::Json => print_json(&channel)?,
                    OutputFormat::Table => println!("{}", channels_table(&[channel])),
                }
            }
            ChannelCommands::Remove { channel_id } => {
                let removed = repos.channels.delete_by_channel_id(&channel_id).await?;
                if !removed {
                    eprintln!("No channel registered with id {}", channel_id);
                    return Ok(ExitCode::FAILURE);
                }
                match cli.format {
                    OutputFormat::Json => print_json(&serde_json::json!({ "removed": channel_id }))?,
                    OutputFormat::Table => println!("Removed channel {}", channel_id),
                }
            }
        },
        Commands::Status => {
            let latest = repos.sync_runs.latest_per_job().await?;
            match cli.format {
                OutputFormat::Json => print_json(&latest)?,
                OutputFormat::Table => println!("{}", status_table(&latest)),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

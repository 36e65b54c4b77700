//! Heirloom command line: entry point for one-shot verifications.

use anyhow::Context;
use clap::Parser;
use heirloom_types::{DeploymentStage, VerificationQuery};
use heirloom_utils::LogFormat;
use heirloom_verification::{DeathVerificationService, ServiceConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "heirloom", about = "Multi-source death verification")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "HEIRLOOM_CONFIG")]
    config: Option<PathBuf>,

    /// Deployment stage: "development", "staging"/"test", or "production".
    #[arg(long, env = "HEIRLOOM_STAGE")]
    stage: Option<DeploymentStage>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "HEIRLOOM_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "HEIRLOOM_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Verify whether a person is deceased.
    Verify {
        /// Full name, e.g. "John Q Doe".
        #[arg(long)]
        name: String,

        /// Date of birth, YYYY-MM-DD.
        #[arg(long)]
        dob: String,

        /// ISO 3166-1 alpha-2 country code.
        #[arg(long)]
        country: String,

        /// National identifier (e.g. SSN).
        #[arg(long)]
        national_id: Option<String>,

        /// Last known location, used as a hint for obituary search.
        #[arg(long)]
        location: Option<String>,

        /// Claimed date of death, YYYY-MM-DD.
        #[arg(long)]
        date_of_death: Option<String>,
    },
    /// Probe every source and report availability.
    Health,
    /// Print cache statistics for a freshly wired service.
    CacheStats,
    /// Print the effective configuration as TOML.
    Config,
}

fn load_config(cli: &Cli) -> anyhow::Result<ServiceConfig> {
    let mut config = match &cli.config {
        Some(path) => ServiceConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServiceConfig::default(),
    };
    if let Some(stage) = cli.stage {
        config.stage = stage;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    heirloom_utils::init_tracing(&config.log_level, config.log_format);

    if let Some(path) = &cli.config {
        tracing::info!("loaded config from {}", path.display());
    }

    match cli.command {
        Command::Config => {
            println!("{}", config.to_toml_string()?);
        }
        Command::Health => {
            let service = DeathVerificationService::from_config(&config)?;
            let report = service.check_api_health().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::CacheStats => {
            let service = DeathVerificationService::from_config(&config)?;
            println!("{}", serde_json::to_string_pretty(&service.cache_stats())?);
        }
        Command::Verify {
            name,
            dob,
            country,
            national_id,
            location,
            date_of_death,
        } => {
            let service = DeathVerificationService::from_config(&config)?;
            tracing::info!(stage = %config.stage, "verifying {name}");

            let mut query = VerificationQuery::new(&name, dob, &country);
            if let Some(id) = national_id {
                query = query.with_national_id(id);
            }
            if let Some(location) = location {
                query = query.with_last_known_location(location);
            }
            if let Some(date) = date_of_death {
                query = query.with_claimed_date_of_death(date);
            }

            let verdict = service.verify_death(query).await;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
    }

    Ok(())
}

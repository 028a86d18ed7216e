mod benchmark;
mod locations;
mod output;
mod reps;
mod routes;
mod schedule;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fieldroute_client::{ApiClient, ApiError};
use fieldroute_core::AppConfig;
use tracing_subscriber::EnvFilter;

use benchmark::BenchmarkCommands;
use locations::LocationsCommands;
use reps::RepsCommands;
use routes::RoutesCommands;
use schedule::{ForceMajeureCommands, ScheduleCommands};

#[derive(Debug, Parser)]
#[command(name = "fieldroute")]
#[command(about = "Field-sales route planning command line interface")]
struct Cli {
    /// Backend base URL; overrides `FIELDROUTE_API_URL`
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate a CSV or JSON locations file locally
    Import {
        /// Path to the file
        file: PathBuf,
        /// Also check house numbers, time windows and priorities
        #[arg(long)]
        strict: bool,
        /// Read `.txt` files as CSV
        #[arg(long)]
        accept_txt: bool,
        /// Print the normalized locations as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Validate a locations file, then upload it to the backend
    Upload {
        /// Path to the file
        file: PathBuf,
        /// Also check house numbers, time windows and priorities
        #[arg(long)]
        strict: bool,
    },
    /// Show backend health
    Health,
    /// Stored locations
    Locations {
        #[command(subcommand)]
        command: LocationsCommands,
    },
    /// Optimize a route over stored locations
    Optimize {
        /// Location id to include (repeatable)
        #[arg(long = "location", required = true)]
        locations: Vec<String>,
        /// Model to use, or "auto"
        #[arg(long, default_value = "auto")]
        model: String,
        /// Maximum stops per route
        #[arg(long)]
        max_stops: Option<u32>,
        /// Maximum route distance in kilometres
        #[arg(long)]
        max_distance_km: Option<f64>,
        /// Working day start (HH:MM)
        #[arg(long)]
        start_time: Option<String>,
        /// Working day end (HH:MM)
        #[arg(long)]
        end_time: Option<String>,
    },
    /// Stored routes
    Routes {
        #[command(subcommand)]
        command: RoutesCommands,
    },
    /// Per-model optimization metrics
    Metrics {
        /// Only metrics recorded for this route
        #[arg(long)]
        route: Option<String>,
    },
    /// Model benchmarks
    Benchmark {
        #[command(subcommand)]
        command: BenchmarkCommands,
    },
    /// Sales reps
    Reps {
        #[command(subcommand)]
        command: RepsCommands,
    },
    /// Monthly visit planning
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommands,
    },
    /// Incidents that move a rep's visits to other reps
    ForceMajeure {
        #[command(subcommand)]
        command: ForceMajeureCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = resolve_config(cli.api_url.clone())?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, api = %config.api_base_url, "configuration loaded");

    let Some(command) = cli.command else {
        println!("fieldroute: no command given; run with --help for usage");
        return Ok(());
    };

    match run(command, &config).await {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast::<ApiError>() {
            Ok(api_err) => {
                eprintln!("{}", output::error_json(&api_err));
                std::process::exit(1);
            }
            Err(other) => Err(other),
        },
    }
}

async fn run(command: Commands, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Commands::Import {
            file,
            strict,
            accept_txt,
            json,
        } => locations::run_import(config, &file, strict, accept_txt, json).await,
        Commands::Upload { file, strict } => {
            locations::run_upload(&client(config)?, config, &file, strict).await
        }
        Commands::Health => routes::run_health(&client(config)?).await,
        Commands::Locations { command } => match command {
            LocationsCommands::List => locations::run_locations_list(&client(config)?).await,
        },
        Commands::Optimize {
            locations,
            model,
            max_stops,
            max_distance_km,
            start_time,
            end_time,
        } => {
            let constraints = fieldroute_client::types::Constraints {
                max_stops_per_route: max_stops,
                max_distance_km,
                start_time,
                end_time,
                ..Default::default()
            };
            routes::run_optimize(&client(config)?, &locations, &model, &constraints).await
        }
        Commands::Routes { command } => match command {
            RoutesCommands::List { skip, limit } => {
                routes::run_routes_list(&client(config)?, skip, limit).await
            }
            RoutesCommands::Show { id } => routes::run_routes_show(&client(config)?, &id).await,
        },
        Commands::Metrics { route } => {
            routes::run_metrics(&client(config)?, route.as_deref()).await
        }
        Commands::Benchmark { command } => benchmark::run(&client(config)?, config, command).await,
        Commands::Reps { command } => reps::run(&client(config)?, command).await,
        Commands::Schedule { command } => schedule::run_schedule(&client(config)?, command).await,
        Commands::ForceMajeure { command } => {
            schedule::run_force_majeure(&client(config)?, command).await
        }
    }
}

/// Reads configuration from the process environment, which `main` has
/// already populated from `.env`, then applies the `--api-url` override.
fn resolve_config(api_url: Option<String>) -> anyhow::Result<AppConfig> {
    let mut config = fieldroute_core::load_app_config_from_env()?;
    if let Some(url) = api_url {
        config.api_base_url = url;
    }
    Ok(config)
}

fn client(config: &AppConfig) -> anyhow::Result<ApiClient> {
    Ok(ApiClient::from_config(config)?)
}

#[cfg(test)]
mod tests;

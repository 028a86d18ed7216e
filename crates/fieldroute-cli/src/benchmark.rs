use std::path::{Path, PathBuf};

use clap::Subcommand;
use fieldroute_client::types::{BenchmarkLocation, BenchmarkRequest};
use fieldroute_client::ApiClient;
use fieldroute_core::AppConfig;
use fieldroute_ingest::{FileIngestor, IngestConfig};

#[derive(Debug, Subcommand)]
pub enum BenchmarkCommands {
    /// Compare models from past runs and show recommendations
    Compare,
    /// Show background benchmark tasks
    Status,
    /// Run every model over the locations in a file
    Run {
        /// CSV or JSON locations file
        #[arg(long)]
        file: PathBuf,
        /// Runs per model
        #[arg(long, default_value = "3")]
        iterations: u32,
    },
}

pub(crate) async fn run(client: &ApiClient, config: &AppConfig, command: BenchmarkCommands) -> anyhow::Result<()> {
    match command {
        BenchmarkCommands::Compare => run_compare(client).await,
        BenchmarkCommands::Status => run_status(client).await,
        BenchmarkCommands::Run { file, iterations } => run_benchmark(client, config, &file, iterations).await,
    }
}

async fn run_compare(client: &ApiClient) -> anyhow::Result<()> {
    let comparison = client.compare_models().await?;
    if comparison.models.is_empty() {
        println!("no benchmark data yet; run `benchmark run --file <locations>` first");
        return Ok(());
    }

    let header = format!(
        "{:<20}{:<10}{:<10}{:<12}{:<10}USES",
        "MODEL", "AVG MS", "QUALITY", "COST RUB", "SUCCESS"
    );
    println!("{header}");
    for model in &comparison.models {
        println!(
            "{:<20}{:<10.0}{:<10.2}{:<12.0}{:<10}{}",
            model.name,
            model.avg_response_time_ms,
            model.avg_quality_score,
            model.total_cost_rub,
            format!("{:.0}%", model.success_rate * 100.0),
            model.usage_count
        );
    }

    if !comparison.recommendations.is_empty() {
        println!();
        for rec in &comparison.recommendations {
            println!("{}: {} ({})", rec.scenario, rec.recommended_model, rec.reason);
        }
    }
    Ok(())
}

async fn run_status(client: &ApiClient) -> anyhow::Result<()> {
    let tasks = client.benchmark_status().await?;
    if tasks.is_empty() {
        println!("no benchmark tasks");
        return Ok(());
    }
    println!("{:<40}STATUS", "TASK");
    for (task, status) in &tasks {
        println!("{task:<40}{status}");
    }
    Ok(())
}

/// Validates the locations file locally, then benchmarks on its records.
async fn run_benchmark(client: &ApiClient, config: &AppConfig, file: &Path, iterations: u32) -> anyhow::Result<()> {
    let batch = FileIngestor::new(IngestConfig::from_config(config))
        .process_path(file)
        .await?;
    let locations = batch.into_ready().map_err(|errors| {
        anyhow::anyhow!(
            "{}: {} validation error(s); run `import` to see them",
            file.display(),
            errors.len()
        )
    })?;

    let request = BenchmarkRequest {
        test_locations: locations.iter().map(BenchmarkLocation::from).collect(),
        num_iterations: iterations,
    };
    let run = client.run_benchmark(&request).await?;

    if let Some(seconds) = run.duration_seconds {
        println!("benchmark finished in {seconds:.1}s");
    }
    let header = format!(
        "{:<20}{:<7}{:<10}{:<10}{:<12}SUCCESS",
        "MODEL", "TESTS", "AVG MS", "QUALITY", "COST RUB"
    );
    println!("{header}");
    for result in &run.results {
        println!(
            "{:<20}{:<7}{:<10.0}{:<10.2}{:<12.0}{:.0}%",
            result.model,
            result.num_tests,
            result.avg_response_time_ms,
            result.avg_quality_score,
            result.total_cost_rub,
            result.success_rate * 100.0
        );
    }
    Ok(())
}

use clap::Subcommand;
use fieldroute_client::types::{Constraints, MetricsReport};
use fieldroute_client::ApiClient;

use crate::output::{or_dash, print_locations, truncate};

#[derive(Debug, Subcommand)]
pub enum RoutesCommands {
    /// List stored routes, newest first
    List {
        /// Number of routes to skip
        #[arg(long, default_value = "0")]
        skip: u32,
        /// Maximum number of routes to show
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Show one route with its stops and metrics
    Show {
        /// Route id
        id: String,
    },
}

/// Show backend health. An unhealthy backend is reported, not an error.
///
/// # Errors
///
/// Returns an error if the backend cannot be reached.
pub(crate) async fn run_health(client: &ApiClient) -> anyhow::Result<()> {
    let health = client.check_health().await?;
    println!(
        "backend {}: {}",
        client.base_url(),
        if health.is_healthy() { "healthy" } else { "UNHEALTHY" }
    );
    for (service, state) in &health.services {
        println!("  {service:<16}{state}");
    }
    Ok(())
}

/// Optimize a route over the given stored locations.
///
/// # Errors
///
/// Returns an error if the request fails.
pub(crate) async fn run_optimize(
    client: &ApiClient,
    location_ids: &[String],
    model: &str,
    constraints: &Constraints,
) -> anyhow::Result<()> {
    let route = client.optimize(location_ids, model, constraints).await?;

    println!("Route: {} ({})", route.name, route.id);
    println!("Model: {}", route.model_used);
    if let Some(reason) = &route.fallback_reason {
        println!("Fallback: {reason}");
    }
    println!(
        "Distance: {:.1} km  Time: {:.2} h  Cost: {:.0} RUB",
        route.total_distance_km, route.total_time_hours, route.total_cost_rub
    );
    if let Some(score) = route.quality_score {
        println!("Quality: {score:.2}");
    }
    println!();
    for (i, id) in route.locations.iter().enumerate() {
        println!("{:>3}. {id}", i + 1);
    }
    Ok(())
}

/// List stored routes.
///
/// # Errors
///
/// Returns an error if the request fails.
pub(crate) async fn run_routes_list(client: &ApiClient, skip: u32, limit: u32) -> anyhow::Result<()> {
    let page = client.fetch_routes(skip, limit).await?;
    if page.items.is_empty() {
        println!("no routes found (total {})", page.total);
        return Ok(());
    }

    let header = format!(
        "{:<38}{:<26}{:<7}{:<11}{:<9}CREATED",
        "ID", "NAME", "STOPS", "KM", "HOURS"
    );
    println!("{header}");
    for route in &page.items {
        println!(
            "{:<38}{:<26}{:<7}{:<11.1}{:<9.2}{}",
            route.id,
            truncate(&route.name, 23),
            route.locations_order.len(),
            route.total_distance,
            route.total_time,
            or_dash(route.created_at.as_deref()),
        );
    }
    println!();
    println!(
        "showing {}-{} of {}",
        u64::from(skip) + 1,
        u64::from(skip) + page.items.len() as u64,
        page.total
    );
    Ok(())
}

/// Show one route.
///
/// # Errors
///
/// Returns an error if the route does not exist or the request fails.
pub(crate) async fn run_routes_show(client: &ApiClient, id: &str) -> anyhow::Result<()> {
    let detail = client.fetch_route_details(id).await?;
    let route = &detail.route;

    println!("Route: {} ({})", route.name, route.id);
    println!(
        "Distance: {:.1} km  Time: {:.2} h  Cost: {:.0} RUB",
        route.total_distance, route.total_time, route.total_cost
    );
    println!("Created: {}", or_dash(route.created_at.as_deref()));
    println!();

    if detail.locations_data.is_empty() {
        for (i, location_id) in route.locations_order.iter().enumerate() {
            println!("{:>3}. {location_id}", i + 1);
        }
    } else {
        print_locations(&detail.locations_data);
    }

    if !detail.metrics.is_empty() {
        println!();
        println!("Metrics:");
        for metric in &detail.metrics {
            println!("  {metric}");
        }
    }
    Ok(())
}

/// Show per-model metrics, optionally for one route.
///
/// # Errors
///
/// Returns an error if the request fails.
pub(crate) async fn run_metrics(client: &ApiClient, route: Option<&str>) -> anyhow::Result<()> {
    let report = match route {
        Some(id) => client.fetch_route_metrics(id).await?,
        None => client.get_metrics().await?,
    };
    print_metrics(&report);
    Ok(())
}

fn print_metrics(report: &MetricsReport) {
    if report.summary.is_empty() {
        println!("no metrics recorded yet; run `optimize` first");
    } else {
        let header = format!("{:<20}{:<8}{:<14}QUALITY", "MODEL", "RUNS", "AVG MS");
        println!("{header}");
        for model in &report.summary {
            println!(
                "{:<20}{:<8}{:<14.0}{:.2}",
                model.model, model.total_runs, model.avg_response_time_ms, model.avg_quality_score
            );
        }
    }

    if !report.recent_optimizations.is_empty() {
        println!();
        println!("{:<38}{:<20}CREATED", "OPTIMIZATION", "MODEL");
        for run in &report.recent_optimizations {
            println!(
                "{:<38}{:<20}{}",
                run.optimization_id,
                run.model_used,
                or_dash(run.created_at.as_deref())
            );
        }
    }
}

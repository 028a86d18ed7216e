//! Monthly visit planning and force-majeure handling.

use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use fieldroute_client::types::{
    DailyRoute, ForceMajeureEvent, ForceMajeureKind, ForceMajeureRequest, MonthlyPlan, VisitStatus,
};
use fieldroute_client::ApiClient;

use crate::output::or_dash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VisitStatusArg {
    Planned,
    Completed,
    Skipped,
    Cancelled,
}

impl From<VisitStatusArg> for VisitStatus {
    fn from(arg: VisitStatusArg) -> Self {
        match arg {
            VisitStatusArg::Planned => VisitStatus::Planned,
            VisitStatusArg::Completed => VisitStatus::Completed,
            VisitStatusArg::Skipped => VisitStatus::Skipped,
            VisitStatusArg::Cancelled => VisitStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IncidentArg {
    Illness,
    Weather,
    VehicleBreakdown,
    Other,
}

impl From<IncidentArg> for ForceMajeureKind {
    fn from(arg: IncidentArg) -> Self {
        match arg {
            IncidentArg::Illness => ForceMajeureKind::Illness,
            IncidentArg::Weather => ForceMajeureKind::Weather,
            IncidentArg::VehicleBreakdown => ForceMajeureKind::VehicleBreakdown,
            IncidentArg::Other => ForceMajeureKind::Other,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ScheduleCommands {
    /// Plan visits for a month
    Generate {
        /// Month (YYYY-MM)
        #[arg(value_parser = parse_month)]
        month: String,
        /// Only plan for this rep (repeatable); default is every active rep
        #[arg(long = "rep")]
        reps: Vec<String>,
    },
    /// Show the plan for a month
    Month {
        /// Month (YYYY-MM)
        #[arg(value_parser = parse_month)]
        month: String,
        /// Only this rep's plan
        #[arg(long)]
        rep: Option<String>,
    },
    /// Show every rep's route for one day
    Daily {
        /// Date (YYYY-MM-DD)
        date: NaiveDate,
    },
    /// Change the status of a planned visit
    SetStatus {
        /// Planned visit id
        visit_id: String,
        #[arg(value_enum)]
        status: VisitStatusArg,
    },
}

#[derive(Debug, Subcommand)]
pub enum ForceMajeureCommands {
    /// List recorded incidents
    List,
    /// Report an incident and redistribute the rep's visits
    Report {
        /// Affected rep id
        #[arg(long)]
        rep: String,
        /// Day of the incident (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, value_enum)]
        kind: IncidentArg,
        #[arg(long)]
        description: Option<String>,
    },
}

/// Accepts `YYYY-MM` with a real month number.
pub(crate) fn parse_month(raw: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m").to_string())
        .map_err(|_| format!("expected YYYY-MM, got '{raw}'"))
}

pub(crate) async fn run_schedule(client: &ApiClient, command: ScheduleCommands) -> anyhow::Result<()> {
    match command {
        ScheduleCommands::Generate { month, reps } => {
            let rep_ids = (!reps.is_empty()).then_some(reps.as_slice());
            let report = client.generate_schedule(&month, rep_ids).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ScheduleCommands::Month { month, rep } => {
            let plan = match rep.as_deref() {
                Some(rep_id) => client.rep_schedule(rep_id, &month).await?,
                None => client.monthly_schedule(&month).await?,
            };
            print_plan(&plan);
        }
        ScheduleCommands::Daily { date } => {
            let routes = client.daily_schedule(date).await?;
            if routes.is_empty() {
                println!("no visits planned for {date}");
                return Ok(());
            }
            for route in &routes {
                print_daily_route(route);
            }
        }
        ScheduleCommands::SetStatus { visit_id, status } => {
            let visit = client.update_visit_status(&visit_id, status.into()).await?;
            println!(
                "visit {} at {} on {}: {}",
                visit.id, visit.location_name, visit.planned_date, visit.status
            );
        }
    }
    Ok(())
}

fn print_plan(plan: &MonthlyPlan) {
    println!(
        "{}: {} visits planned, coverage {:.1}%",
        plan.month, plan.total_tt_planned, plan.coverage_pct
    );
    if plan.routes.is_empty() {
        println!("no routes; run `schedule generate {}` first", plan.month);
        return;
    }
    println!();
    println!("{:<12}{:<30}{:<8}HOURS", "DATE", "REP", "VISITS");
    for route in &plan.routes {
        println!(
            "{:<12}{:<30}{:<8}{:.1}",
            route.date.to_string(),
            route.rep_name,
            route.total_tt,
            route.estimated_duration_hours
        );
    }
}

fn print_daily_route(route: &DailyRoute) {
    println!(
        "{} ({}): {} visits, ~{:.1} h",
        route.rep_name, route.rep_id, route.total_tt, route.estimated_duration_hours
    );
    for visit in &route.visits {
        println!(
            "  {:<38}{:<4}{:<30}{}",
            visit.id,
            or_dash(visit.location_category.as_deref()),
            visit.location_name,
            visit.status
        );
    }
}

pub(crate) async fn run_force_majeure(client: &ApiClient, command: ForceMajeureCommands) -> anyhow::Result<()> {
    match command {
        ForceMajeureCommands::List => {
            let events = client.list_force_majeure().await?;
            if events.is_empty() {
                println!("no incidents recorded");
                return Ok(());
            }
            println!("{:<12}{:<20}{:<30}AFFECTED", "DATE", "TYPE", "REP");
            for event in &events {
                println!(
                    "{:<12}{:<20}{:<30}{}",
                    event.event_date.to_string(),
                    event.kind,
                    event.rep_name,
                    event.affected_tt_count
                );
            }
        }
        ForceMajeureCommands::Report {
            rep,
            date,
            kind,
            description,
        } => {
            let event = client
                .report_force_majeure(&ForceMajeureRequest {
                    kind: kind.into(),
                    rep_id: rep,
                    event_date: date,
                    description,
                })
                .await?;
            print_redistribution(&event);
        }
    }
    Ok(())
}

fn print_redistribution(event: &ForceMajeureEvent) {
    println!(
        "{} for {} on {}: {} visit(s) affected",
        event.kind, event.rep_name, event.event_date, event.affected_tt_count
    );
    for moved in &event.redistributed_to {
        println!(
            "  {} visit(s) -> {} on {}",
            moved.location_ids.len(),
            moved.rep_name,
            moved.new_date
        );
    }
}

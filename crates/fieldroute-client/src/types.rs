//! Request and response shapes of the route-planning backend.
//!
//! Field names follow the backend's snake_case JSON. Numeric fields the
//! backend computes lazily (`quality_score`, `response_time_ms`) are optional
//! because older routes were stored without them.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use fieldroute_core::Location;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// Response of `POST /locations/upload`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadLocationsResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub locations: Vec<Location>,
    /// Per-row problems reported by the server, when any rows were rejected.
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Optimization and routes
// ---------------------------------------------------------------------------

/// Body of `POST /optimize`.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeRequest {
    pub location_ids: Vec<String>,
    /// Model identifier, or `"auto"` to let the server choose.
    pub model: String,
    pub constraints: Constraints,
}

/// Optional limits applied by the solver. Absent fields are omitted from the
/// request so the server defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stops_per_route: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window_minutes: Option<u32>,
    /// `HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// `HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forbidden_roads: Vec<String>,
}

/// An optimized route as returned by `POST /optimize`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Route {
    pub id: String,
    pub name: String,
    /// Location ids in visiting order.
    pub locations: Vec<String>,
    pub total_distance_km: f64,
    pub total_time_hours: f64,
    pub total_cost_rub: f64,
    pub model_used: String,
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub response_time_ms: Option<u64>,
    /// Set when the requested model failed and another one produced the route.
    #[serde(default)]
    pub fallback_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A stored route in the paginated `GET /routes` listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteSummary {
    pub id: String,
    pub name: String,
    pub locations_order: Vec<String>,
    pub total_distance: f64,
    pub total_time: f64,
    pub total_cost: f64,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `GET /routes/{id}`: the summary plus the per-model metrics recorded for it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteDetail {
    #[serde(flatten)]
    pub route: RouteSummary,
    #[serde(default)]
    pub metrics: Vec<Value>,
    /// Full location records in visiting order, when the server includes them.
    #[serde(default)]
    pub locations_data: Vec<Location>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Paginated<T> {
    pub total: u64,
    pub items: Vec<T>,
}

// ---------------------------------------------------------------------------
// Metrics and benchmarks
// ---------------------------------------------------------------------------

/// `GET /metrics`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetricsReport {
    #[serde(default)]
    pub summary: Vec<ModelSummary>,
    #[serde(default)]
    pub recent_optimizations: Vec<RecentOptimization>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelSummary {
    pub model: String,
    pub avg_response_time_ms: f64,
    pub avg_quality_score: f64,
    pub total_runs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecentOptimization {
    pub optimization_id: String,
    pub model_used: String,
    /// Free-form quality breakdown computed by the server.
    #[serde(default)]
    pub quality_scores: Value,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /benchmark`.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkRequest {
    pub test_locations: Vec<BenchmarkLocation>,
    pub num_iterations: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkLocation {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Location> for BenchmarkLocation {
    fn from(location: &Location) -> Self {
        Self {
            id: location.id.clone(),
            name: location.name.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

/// Response of `POST /benchmark`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BenchmarkRun {
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub results: Vec<BenchmarkResult>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BenchmarkResult {
    pub model: String,
    pub num_tests: u32,
    pub avg_response_time_ms: f64,
    #[serde(default)]
    pub min_response_time_ms: Option<f64>,
    #[serde(default)]
    pub max_response_time_ms: Option<f64>,
    pub avg_quality_score: f64,
    pub total_cost_rub: f64,
    pub success_rate: f64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `GET /benchmark/compare`. Both lists are empty before the first benchmark.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelComparison {
    #[serde(default)]
    pub models: Vec<ModelStats>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelStats {
    pub name: String,
    pub avg_response_time_ms: f64,
    pub avg_quality_score: f64,
    pub total_cost_rub: f64,
    pub success_rate: f64,
    pub usage_count: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Recommendation {
    pub scenario: String,
    pub recommended_model: String,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

/// `GET /health`. Returned for both 200 and 503 responses.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthStatus {
    pub status: HealthState,
    /// Dependency name to state, e.g. `database` → `connected`.
    #[serde(default)]
    pub services: BTreeMap<String, String>,
}

impl HealthStatus {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}

// ---------------------------------------------------------------------------
// Sales reps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepStatus {
    Active,
    Sick,
    Vacation,
    Unavailable,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SalesRep {
    pub id: String,
    pub name: String,
    pub status: RepStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesRepCreate {
    pub name: String,
    pub status: RepStatus,
}

/// Partial update; `None` fields are left unchanged on the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SalesRepUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RepStatus>,
}

// ---------------------------------------------------------------------------
// Schedule and visits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct GenerateScheduleRequest {
    /// `YYYY-MM`.
    pub month: String,
    /// Reps to plan for; `None` plans every active rep.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rep_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonthlyPlan {
    pub month: String,
    pub total_tt_planned: u64,
    pub coverage_pct: f64,
    #[serde(default)]
    pub routes: Vec<DailyRoute>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DailyRoute {
    pub rep_id: String,
    pub rep_name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub visits: Vec<ScheduledVisit>,
    pub total_tt: u64,
    pub estimated_duration_hours: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduledVisit {
    pub id: String,
    pub location_id: String,
    pub location_name: String,
    /// Outlet category `A`..`D`, when the location has been classified.
    #[serde(default)]
    pub location_category: Option<String>,
    pub rep_id: String,
    pub rep_name: String,
    pub planned_date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitStatus {
    Planned,
    Completed,
    Skipped,
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisitStatusUpdate {
    pub status: VisitStatus,
}

/// Body of `POST /visits/`: a visit that actually took place.
#[derive(Debug, Clone, Serialize)]
pub struct VisitCreate {
    pub location_id: String,
    pub rep_id: String,
    pub visited_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_out: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Visit {
    pub id: String,
    pub location_id: String,
    pub rep_id: String,
    pub visited_date: NaiveDate,
    #[serde(default)]
    pub schedule_id: Option<String>,
    #[serde(default)]
    pub time_in: Option<NaiveTime>,
    #[serde(default)]
    pub time_out: Option<NaiveTime>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VisitStats {
    pub month: String,
    pub total_visits: u64,
    pub unique_locations: u64,
    pub unique_reps: u64,
    #[serde(default)]
    pub by_category: BTreeMap<String, Value>,
    #[serde(default)]
    pub by_rep: Vec<Value>,
}

// ---------------------------------------------------------------------------
// Force majeure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceMajeureKind {
    Illness,
    Weather,
    VehicleBreakdown,
    Other,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForceMajeureRequest {
    #[serde(rename = "type")]
    pub kind: ForceMajeureKind,
    pub rep_id: String,
    pub event_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A recorded incident and where the affected visits were moved.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForceMajeureEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub rep_id: String,
    pub rep_name: String,
    pub event_date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    pub affected_tt_count: u64,
    #[serde(default)]
    pub redistributed_to: Vec<RedistributedVisits>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedistributedVisits {
    pub rep_id: String,
    pub rep_name: String,
    pub location_ids: Vec<String>,
    pub new_date: NaiveDate,
}

use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{
    DailyRoute, GenerateScheduleRequest, MonthlyPlan, ScheduledVisit, Visit, VisitCreate, VisitStats,
    VisitStatus, VisitStatusUpdate,
};

impl ApiClient {
    /// Plans visits for `month` (`YYYY-MM`), optionally for a subset of reps.
    ///
    /// The response is a free-form generation report and is returned as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status after the
    /// retry budget, or a non-JSON response.
    pub async fn generate_schedule(&self, month: &str, rep_ids: Option<&[String]>) -> Result<Value, ApiError> {
        let request = GenerateScheduleRequest {
            month: month.to_owned(),
            rep_ids: rep_ids.map(<[String]>::to_vec),
        };
        self.send_json(Method::POST, &["schedule", "generate"], &request)
            .await
    }

    /// `GET schedule/?month=`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unexpected response shape.
    pub async fn monthly_schedule(&self, month: &str) -> Result<MonthlyPlan, ApiError> {
        self.get_json(&["schedule", ""], &[("month", month.to_owned())])
            .await
    }

    /// `GET schedule/{rep_id}?month=`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unexpected response shape.
    pub async fn rep_schedule(&self, rep_id: &str, month: &str) -> Result<MonthlyPlan, ApiError> {
        self.get_json(&["schedule", rep_id], &[("month", month.to_owned())])
            .await
    }

    /// `GET schedule/daily?date=`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unexpected response shape.
    pub async fn daily_schedule(&self, date: NaiveDate) -> Result<Vec<DailyRoute>, ApiError> {
        self.get_json(
            &["schedule", "daily"],
            &[("date", date.format("%Y-%m-%d").to_string())],
        )
        .await
    }

    /// `PATCH schedule/visits/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`]; an unknown visit surfaces as a 404 status error.
    pub async fn update_visit_status(
        &self,
        schedule_id: &str,
        status: VisitStatus,
    ) -> Result<ScheduledVisit, ApiError> {
        self.send_json(
            Method::PATCH,
            &["schedule", "visits", schedule_id],
            &VisitStatusUpdate { status },
        )
        .await
    }

    /// Records a visit that took place (`POST visits/`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unexpected response shape.
    pub async fn record_visit(&self, visit: &VisitCreate) -> Result<Visit, ApiError> {
        self.send_json(Method::POST, &["visits", ""], visit).await
    }

    /// `GET visits/`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unexpected response shape.
    pub async fn list_visits(&self) -> Result<Vec<Visit>, ApiError> {
        self.get_json(&["visits", ""], &[]).await
    }

    /// `GET visits/stats?month=`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unexpected response shape.
    pub async fn visit_stats(&self, month: &str) -> Result<VisitStats, ApiError> {
        self.get_json(&["visits", "stats"], &[("month", month.to_owned())])
            .await
    }
}

use std::collections::BTreeMap;

use reqwest::{Method, StatusCode};

use super::{decode, read_response, ApiClient};
use crate::error::ApiError;
use crate::retry::with_retry;
use crate::types::{BenchmarkRequest, BenchmarkRun, HealthStatus, MetricsReport, ModelComparison};

impl ApiClient {
    /// `GET metrics`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unexpected response shape.
    pub async fn get_metrics(&self) -> Result<MetricsReport, ApiError> {
        self.get_json(&["metrics"], &[]).await
    }

    /// `GET metrics?route_id={id}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unexpected response shape.
    pub async fn fetch_route_metrics(&self, route_id: &str) -> Result<MetricsReport, ApiError> {
        self.get_json(&["metrics"], &[("route_id", route_id.to_owned())])
            .await
    }

    /// Runs every model over the test locations (`POST benchmark`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status after the
    /// retry budget, or an unexpected response shape.
    pub async fn run_benchmark(&self, request: &BenchmarkRequest) -> Result<BenchmarkRun, ApiError> {
        tracing::debug!(
            locations = request.test_locations.len(),
            iterations = request.num_iterations,
            "starting benchmark"
        );
        self.send_json(Method::POST, &["benchmark"], request).await
    }

    /// `GET benchmark/compare`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unexpected response shape.
    pub async fn compare_models(&self) -> Result<ModelComparison, ApiError> {
        self.get_json(&["benchmark", "compare"], &[]).await
    }

    /// Background benchmark task id to its status string (`GET benchmark/status`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unexpected response shape.
    pub async fn benchmark_status(&self) -> Result<BTreeMap<String, String>, ApiError> {
        self.get_json(&["benchmark", "status"], &[]).await
    }

    /// Reports backend health.
    ///
    /// The backend answers 503 with a [`HealthStatus`] body when a dependency is
    /// down. That response resolves `Ok` with an unhealthy status instead of an
    /// error, and is not retried. A 503 without a readable body is an ordinary
    /// server error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the server is unreachable, times out, or
    /// answers with anything other than a health body.
    pub async fn check_health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint(&["health"], &[])?;
        let context = url.path().to_owned();
        let url_str = url.to_string();

        let url_ref = &url_str;
        let context_ref = &context;
        let health = with_retry(self.retry, || {
            let request = self.client.get(url.clone());
            async move {
                let (status, text) = read_response(request, url_ref).await?;
                if status.is_success() {
                    return decode::<HealthStatus>(&text, context_ref);
                }
                if status == StatusCode::SERVICE_UNAVAILABLE {
                    if let Ok(health) = serde_json::from_str::<HealthStatus>(&text) {
                        return Ok(health);
                    }
                }
                Err(ApiError::from_status(status, url_ref, &text))
            }
        })
        .await?;

        if health.is_healthy() {
            tracing::debug!(services = ?health.services, "backend healthy");
        } else {
            tracing::warn!(services = ?health.services, "backend reports unhealthy");
        }
        Ok(health)
    }
}

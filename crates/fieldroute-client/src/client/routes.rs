use reqwest::Method;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{Constraints, OptimizeRequest, Paginated, Route, RouteDetail, RouteSummary};

impl ApiClient {
    /// Requests an optimized route over the given locations (`POST optimize`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status after the
    /// retry budget, or an unexpected response shape.
    pub async fn optimize(
        &self,
        location_ids: &[String],
        model: &str,
        constraints: &Constraints,
    ) -> Result<Route, ApiError> {
        tracing::debug!(model, locations = location_ids.len(), "requesting optimization");
        let request = OptimizeRequest {
            location_ids: location_ids.to_vec(),
            model: model.to_owned(),
            constraints: constraints.clone(),
        };
        self.send_json(Method::POST, &["optimize"], &request).await
    }

    /// Lists stored routes, newest first (`GET routes?skip=&limit=`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unexpected response shape.
    pub async fn fetch_routes(&self, skip: u32, limit: u32) -> Result<Paginated<RouteSummary>, ApiError> {
        self.get_json(
            &["routes"],
            &[("skip", skip.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    /// `GET routes/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`]; a missing route surfaces as a 404 status error.
    pub async fn fetch_route_details(&self, route_id: &str) -> Result<RouteDetail, ApiError> {
        self.get_json(&["routes", route_id], &[]).await
    }
}

use reqwest::Method;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{ForceMajeureEvent, ForceMajeureRequest};

impl ApiClient {
    /// Reports an incident; the server moves the rep's affected visits to
    /// other reps and returns where they went (`POST force_majeure/`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status after the
    /// retry budget, or an unexpected response shape.
    pub async fn report_force_majeure(
        &self,
        request: &ForceMajeureRequest,
    ) -> Result<ForceMajeureEvent, ApiError> {
        tracing::debug!(rep_id = %request.rep_id, date = %request.event_date, "reporting force majeure");
        self.send_json(Method::POST, &["force_majeure", ""], request)
            .await
    }

    /// `GET force_majeure/`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unexpected response shape.
    pub async fn list_force_majeure(&self) -> Result<Vec<ForceMajeureEvent>, ApiError> {
        self.get_json(&["force_majeure", ""], &[]).await
    }
}

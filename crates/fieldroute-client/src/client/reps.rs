use reqwest::Method;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{SalesRep, SalesRepCreate, SalesRepUpdate};

impl ApiClient {
    /// `GET reps/`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unexpected response shape.
    pub async fn list_reps(&self) -> Result<Vec<SalesRep>, ApiError> {
        self.get_json(&["reps", ""], &[]).await
    }

    /// `POST reps/`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unexpected response shape.
    pub async fn create_rep(&self, rep: &SalesRepCreate) -> Result<SalesRep, ApiError> {
        self.send_json(Method::POST, &["reps", ""], rep).await
    }

    /// `PATCH reps/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`]; an unknown rep surfaces as a 404 status error.
    pub async fn update_rep(&self, rep_id: &str, update: &SalesRepUpdate) -> Result<SalesRep, ApiError> {
        self.send_json(Method::PATCH, &["reps", rep_id], update).await
    }

    /// `DELETE reps/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`]; an unknown rep surfaces as a 404 status error.
    pub async fn delete_rep(&self, rep_id: &str) -> Result<(), ApiError> {
        self.send_no_content(Method::DELETE, &["reps", rep_id]).await
    }
}

use std::path::Path;

use fieldroute_core::Location;
use reqwest::multipart::{Form, Part};
use reqwest::Method;

use super::{attempt, decode, ApiClient};
use crate::error::ApiError;
use crate::retry::with_retry;
use crate::types::UploadLocationsResponse;

/// Multipart field name the upload endpoint reads the file from.
const UPLOAD_FIELD: &str = "file";

impl ApiClient {
    /// Uploads a CSV or JSON file of locations (`POST locations/upload`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::File`] if the file cannot be read, otherwise any
    /// error from [`ApiClient::upload_locations_bytes`].
    pub async fn upload_locations(&self, path: &Path) -> Result<UploadLocationsResponse, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::File {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "locations".to_string(), |n| n.to_string_lossy().into_owned());
        self.upload_locations_bytes(&file_name, bytes).await
    }

    /// Uploads already-read file content as a multipart form.
    ///
    /// The form is rebuilt for every attempt since a sent body cannot be reused.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status after the
    /// retry budget, or an unexpected response shape.
    pub async fn upload_locations_bytes(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadLocationsResponse, ApiError> {
        let url = self.endpoint(&["locations", "upload"], &[])?;
        let context = url.path().to_owned();
        let url_str = url.to_string();
        let mime = mime_for(file_name);
        tracing::debug!(url = %url_str, file_name, size = bytes.len(), "uploading locations");

        let url_ref = &url_str;
        let text = with_retry(self.retry, || {
            let request = self.client.post(url.clone());
            let bytes = bytes.clone();
            let file_name = file_name.to_owned();
            async move {
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(mime)
                    .map_err(ApiError::Client)?;
                attempt(request.multipart(Form::new().part(UPLOAD_FIELD, part)), url_ref).await
            }
        })
        .await?;
        decode(&text, &context)
    }

    /// `GET locations`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unexpected response shape.
    pub async fn list_locations(&self) -> Result<Vec<Location>, ApiError> {
        self.get_json(&["locations"], &[]).await
    }

    /// `POST locations/`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unexpected response shape.
    pub async fn create_location(&self, location: &Location) -> Result<Location, ApiError> {
        self.send_json(Method::POST, &["locations", ""], location).await
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".csv") {
        "text/csv"
    } else if lower.ends_with(".json") {
        "application/json"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::mime_for;

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for("stores.CSV"), "text/csv");
        assert_eq!(mime_for("stores.json"), "application/json");
        assert_eq!(mime_for("stores.xlsx"), "application/octet-stream");
    }
}

//! HTTP client for the route-planning backend.
//!
//! Every public operation goes through [`ApiClient::send`] (or a thin variant
//! of it), which applies the per-attempt timeout, the fixed-delay 5xx retry and
//! the error classification in [`crate::error`].

mod analytics;
mod force_majeure;
mod locations;
mod reps;
mod routes;
mod schedule;

use std::time::Duration;

use fieldroute_core::AppConfig;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::retry::{with_retry, RetryPolicy};

/// Client for the route-planning REST API.
///
/// Use [`ApiClient::from_config`] in binaries, or [`ApiClient::new`] with a
/// mock server URI in tests.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(super) client: Client,
    pub(super) base_url: Url,
    pub(super) retry: RetryPolicy,
}

impl ApiClient {
    /// Creates a client for `base_url` with the default retry policy.
    ///
    /// `base_url` may carry a path prefix (e.g. `https://host/api/v1`); all
    /// endpoint paths are resolved below it.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Client`] if the underlying `reqwest::Client` cannot be built.
    /// - [`ApiError::InvalidUrl`] if `base_url` is not an absolute URL.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("fieldroute/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;

        // Exactly one trailing slash, so joins append below the prefix instead
        // of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url,
            retry: RetryPolicy::default(),
        })
    }

    /// Creates a client from the base URL, timeout and retry settings in `config`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Ok(Self::new(&config.api_base_url, config.request_timeout_secs)?
            .with_retry_policy(RetryPolicy::from_config(config)))
    }

    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Resolves `segments` below the base URL, percent-encoding each one.
    ///
    /// A trailing empty segment produces a trailing slash (`reps/`), which the
    /// backend requires on collection routes.
    pub(super) fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// `GET` and decode the JSON response.
    pub(super) async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments, query)?;
        let context = url.path().to_owned();
        let text = self.send(Method::GET, url, None).await?;
        decode(&text, &context)
    }

    /// Send `body` as JSON with `method` and decode the JSON response.
    pub(super) async fn send_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments, &[])?;
        let context = url.path().to_owned();
        let body = serde_json::to_value(body).map_err(|source| ApiError::Encode {
            context: context.clone(),
            source,
        })?;
        let text = self.send(method, url, Some(&body)).await?;
        decode(&text, &context)
    }

    /// Send a request whose success response carries no body (204).
    pub(super) async fn send_no_content(&self, method: Method, segments: &[&str]) -> Result<(), ApiError> {
        let url = self.endpoint(segments, &[])?;
        self.send(method, url, None).await.map(|_| ())
    }

    /// Runs one logical call under the retry policy and returns the 2xx body.
    pub(super) async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<String, ApiError> {
        let url_str = url.to_string();
        tracing::debug!(method = %method, url = %url_str, "sending request");

        with_retry(self.retry, || {
            let mut request = self.client.request(method.clone(), url.clone());
            if let Some(body) = body {
                request = request.json(body);
            }
            attempt(request, &url_str)
        })
        .await
    }
}

/// Sends one request and reads the whole body.
///
/// Transport failures are classified here; the status is left to the caller.
pub(super) async fn read_response(
    request: RequestBuilder,
    url: &str,
) -> Result<(StatusCode, String), ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::from_transport(e, url))?;
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::from_transport(e, url))?;
    Ok((status, text))
}

/// One attempt: any non-2xx status becomes [`ApiError::Status`].
pub(super) async fn attempt(request: RequestBuilder, url: &str) -> Result<String, ApiError> {
    let (status, text) = read_response(request, url).await?;
    if status.is_success() {
        Ok(text)
    } else {
        Err(ApiError::from_status(status, url, &text))
    }
}

pub(super) fn decode<T: DeserializeOwned>(text: &str, context: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|source| ApiError::Deserialize {
        context: context.to_owned(),
        source,
    })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;

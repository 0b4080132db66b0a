//! Client for the recognition backend (road signs, sign language, speech).

use serde::Deserialize;

use super::error::{ServiceError, HTTP_STATUS_PAYLOAD_TOO_LARGE};

/// Default base URL of the recognition backend.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5050";

/// Error body the backend sends alongside failure statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the recognition backend.
///
/// Each call is a single request: no retries, no backoff, no client-side
/// timeout. Failures are reported to the caller immediately.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl BackendClient {
    /// Create a client for the default local backend.
    pub fn new() -> Result<Self, ServiceError> {
        Self::with_base_url(DEFAULT_BACKEND_URL.to_string())
    }

    /// Create a client for a backend at `base_url`.
    ///
    /// Useful for testing against a mock server.
    pub fn with_base_url(base_url: String) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route.trim_start_matches('/'))
    }

    /// Resolve a backend-relative path (e.g. `/assets/x.jpg`) to a full URL.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            self.url(path)
        }
    }

    /// POST an image as the multipart field `image`.
    pub(crate) async fn post_image(
        &self,
        route: &str,
        bytes: Vec<u8>,
        file_name: &str,
        mime: &str,
    ) -> Result<reqwest::Response, ServiceError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new().part("image", part);

        log::debug!("POST {} ({})", route, file_name);
        let response = self
            .http_client
            .post(self.url(route))
            .multipart(form)
            .send()
            .await?;
        check_status(response).await
    }

    /// POST a JSON body.
    pub(crate) async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        route: &str,
        body: &T,
    ) -> Result<reqwest::Response, ServiceError> {
        log::debug!("POST {}", route);
        let response = self
            .http_client
            .post(self.url(route))
            .json(body)
            .send()
            .await?;
        check_status(response).await
    }
}

/// Turn non-success responses into errors, keeping the server's message.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == HTTP_STATUS_PAYLOAD_TOO_LARGE {
        log::warn!("Upload rejected as too large");
        return Err(ServiceError::PayloadTooLarge);
    }

    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    log::warn!("Request failed with HTTP {}: {}", status.as_u16(), message);
    Err(ServiceError::Rejected {
        status: status.as_u16(),
        message,
    })
}

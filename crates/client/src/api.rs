//! HTTP client for the `/api/projects` resource.
//!
//! | Operation | Request                   | Success body          |
//! |-----------|---------------------------|-----------------------|
//! | list      | `GET    {base}`           | array of projects     |
//! | create    | `POST   {base}` + draft   | created project       |
//! | update    | `PUT    {base}/{id}` + draft | updated project    |
//! | delete    | `DELETE {base}/{id}`      | ignored               |

use planboard_core::project::{Project, ProjectDraft};
use planboard_core::types::ProjectId;

use crate::config::ClientConfig;

/// Errors from the projects REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, or an
    /// undecodable body).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Projects API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The configured base URL cannot address an individual project.
    #[error("Invalid projects API URL: {0}")]
    InvalidUrl(String),
}

/// HTTP client for one projects collection URL.
#[derive(Debug, Clone)]
pub struct ProjectsApi {
    client: reqwest::Client,
    base_url: String,
}

impl ProjectsApi {
    /// Create a client for a collection URL, e.g.
    /// `http://localhost:5000/api/projects`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Build a client from configuration, applying the optional timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, config.api_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full collection.
    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        tracing::debug!(url = %self.base_url, "GET projects");
        let response = self.client.get(&self.base_url).send().await?;
        Self::parse_response(response).await
    }

    /// Create a project. Returns the record with its server-assigned id.
    pub async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, ApiError> {
        tracing::debug!(url = %self.base_url, name = %draft.name, "POST project");
        let response = self.client.post(&self.base_url).json(draft).send().await?;
        Self::parse_response(response).await
    }

    /// Replace the fields of an existing project.
    pub async fn update_project(
        &self,
        id: &ProjectId,
        draft: &ProjectDraft,
    ) -> Result<Project, ApiError> {
        let url = self.item_url(id)?;
        tracing::debug!(%url, "PUT project");
        let response = self.client.put(url).json(draft).send().await?;
        Self::parse_response(response).await
    }

    /// Delete a project. Any response body is discarded.
    pub async fn delete_project(&self, id: &ProjectId) -> Result<(), ApiError> {
        let url = self.item_url(id)?;
        tracing::debug!(%url, "DELETE project");
        let response = self.client.delete(url).send().await?;
        Self::check_status(response).await
    }

    // ---- private helpers ----

    /// `{base}/{id}` with the id percent-encoded as one path segment.
    fn item_url(&self, id: &ProjectId) -> Result<reqwest::Url, ApiError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Status`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

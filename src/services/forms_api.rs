use crate::config::UpstreamSettings;
use crate::models::{QueryParams, SubmissionPage};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Upper bound on how much of an error body ends up in logs and errors
const MAX_ERROR_BODY: usize = 512;

/// Errors that can occur when talking to the forms API
#[derive(Debug, Error)]
pub enum FormsApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[source] reqwest::Error),

    #[error("Request to forms API timed out")]
    Timeout,

    #[error("Unauthorized: forms API rejected the API key ({0})")]
    Unauthorized(StatusCode),

    #[error("API returned error {status}: {body}")]
    ApiError { status: StatusCode, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl From<reqwest::Error> for FormsApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FormsApiError::Timeout
        } else {
            FormsApiError::RequestError(e)
        }
    }
}

/// Forms API client
///
/// Fetches a single page of submissions per call. Holds nothing but fixed
/// configuration, so one instance is shared by every request.
#[derive(Debug, Clone)]
pub struct FormsApiClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl FormsApiClient {
    /// Create a new forms API client
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, FormsApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FormsApiError::ClientBuild)?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    pub fn from_settings(settings: &UpstreamSettings) -> Result<Self, FormsApiError> {
        Self::new(
            settings.base_url.clone(),
            settings.api_key.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// Submissions endpoint for `form_id`
    pub fn submissions_url(&self, form_id: &str) -> String {
        format!(
            "{}/v1/api/forms/{}/submissions",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(form_id)
        )
    }

    /// Fetch one page of submissions
    ///
    /// `params` go out verbatim; client-side `limit`/`offset` must already be
    /// stripped. No retries.
    pub async fn fetch_page(
        &self,
        form_id: &str,
        params: &QueryParams,
    ) -> Result<SubmissionPage, FormsApiError> {
        let url = self.submissions_url(form_id);

        tracing::debug!("Fetching submissions for form {} from {}", form_id, url);

        let response = self
            .client
            .get(&url)
            .query(params.as_pairs())
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Request to {} for form {} failed: {}", url, form_id, e);
                FormsApiError::from(e)
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::error!("Forms API rejected credentials for form {} ({})", form_id, status);
            return Err(FormsApiError::Unauthorized(status));
        }

        if !status.is_success() {
            let mut body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            tracing::error!("Failed to fetch submissions for form {} from {}: {} - {}", form_id, url, status, body);
            return Err(FormsApiError::ApiError { status, body });
        }

        let bytes = response.bytes().await?;
        let page: SubmissionPage = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!("Unparseable submissions page for form {} from {}: {}", form_id, url, e);
            FormsApiError::InvalidResponse(format!("Failed to parse submissions page: {}", e))
        })?;

        tracing::debug!(
            "Fetched {} submissions for form {} (upstream total: {}, pages: {})",
            page.responses.len(),
            form_id,
            page.total_responses,
            page.page_count
        );

        Ok(page)
    }
}

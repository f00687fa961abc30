use serde::{Deserialize, Serialize};
use crate::models::domain::Submission;

/// Client-facing result of a filtered query
///
/// Same JSON shape as an upstream page, but the counts describe the filtered
/// window handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionSet {
    pub responses: Vec<Submission>,
    #[serde(rename = "totalResponses")]
    pub total_responses: usize,
    #[serde(rename = "pageCount")]
    pub page_count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

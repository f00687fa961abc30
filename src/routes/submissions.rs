use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use std::time::Duration;

use crate::core::{filters, pagination, PageAggregator};
use crate::error::ApiError;
use crate::models::{FilteredResponsesQuery, HealthResponse, QueryParams, SubmissionSet};
use crate::services::FormsApiClient;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub forms_api: Arc<FormsApiClient>,
    pub aggregator: PageAggregator,
    pub default_limit: usize,
    pub request_timeout: Duration,
}

/// Configure submission routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/{form_id}/filteredResponses", web::get().to(filtered_responses));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Filtered responses endpoint
///
/// GET /{formId}/filteredResponses?filters=[...]&limit=10&offset=0
///
/// `filters` is a JSON array of clauses:
/// ```json
/// [{ "id": "questionId", "condition": "equals", "value": "x" }]
/// ```
/// Any other parameter is forwarded to the forms API.
async fn filtered_responses(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, ApiError> {
    let form_id = path.into_inner();
    let params = QueryParams::from(query.into_inner());

    let request = FilteredResponsesQuery::parse(params, state.default_limit).map_err(|e| {
        tracing::info!("Rejecting request for form {}: {}", form_id, e);
        ApiError::from(e)
    })?;

    let deadline = state.request_timeout;
    let result = tokio::time::timeout(deadline, run_pipeline(&state, &form_id, request))
        .await
        .map_err(|_| {
            tracing::error!("Request for form {} exceeded {:?}", form_id, deadline);
            ApiError::DeadlineExceeded(deadline.as_secs())
        })?
        .map_err(|e| {
            tracing::error!("Failed to build filtered responses for form {}: {}", form_id, e);
            e
        })?;

    Ok(HttpResponse::Ok().json(result))
}

/// Fetch every page, filter, then cut the caller's window
pub async fn run_pipeline(
    state: &AppState,
    form_id: &str,
    request: FilteredResponsesQuery,
) -> Result<SubmissionSet, ApiError> {
    let all = state
        .aggregator
        .fetch_all(&state.forms_api, form_id, &request.passthrough)
        .await?;

    let fetched = all.responses.len();
    let filtered = filters::apply(all, &request.filters);
    let result = pagination::paginate(filtered, request.window);

    tracing::info!(
        "Returning {} of {} submissions for form {} (pages: {})",
        result.total_responses,
        fetched,
        form_id,
        result.page_count
    );

    Ok(result)
}

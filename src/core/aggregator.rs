use crate::models::{QueryParams, SubmissionPage};
use crate::services::{FormsApiClient, FormsApiError};

/// Page size the forms API serves at most, and our default offset step
pub const DEFAULT_PAGE_STEP: usize = 150;

/// Collects every upstream page of a form into one unfiltered page
///
/// The caller's offsets and limits refer to the filtered result, which the
/// upstream knows nothing about, so all pages have to be fetched before any
/// filtering or client pagination can happen.
///
/// Pages after the first are requested at `offset = (page - 1) * page_step`.
/// The step is fixed rather than derived from the first page's size, and
/// nothing detects gaps or duplicates if the upstream set changes between
/// calls.
#[derive(Debug, Clone, Copy)]
pub struct PageAggregator {
    page_step: usize,
}

impl PageAggregator {
    pub fn new(page_step: usize) -> Self {
        Self { page_step }
    }

    pub fn page_step(&self) -> usize {
        self.page_step
    }

    /// Fetch all pages of `form_id`
    ///
    /// The returned page's `responses` are every page's responses in order;
    /// its counts are whatever the first page reported.
    pub async fn fetch_all(
        &self,
        client: &FormsApiClient,
        form_id: &str,
        raw_params: &QueryParams,
    ) -> Result<SubmissionPage, FormsApiError> {
        let mut params = raw_params.without_pagination();

        let first = client.fetch_page(form_id, &params).await?;

        // Common case
        if first.page_count <= 1 {
            return Ok(first);
        }

        tracing::debug!(
            "Form {} spans {} upstream pages, fetching the rest",
            form_id,
            first.page_count
        );

        let page_count = first.page_count;
        let mut merged = first;

        for page in 2..=page_count {
            params.set("offset", ((page - 1) * self.page_step).to_string());
            let next = client.fetch_page(form_id, &params).await?;
            merged.responses.extend(next.responses);
        }

        tracing::debug!(
            "Aggregated {} submissions for form {} across {} pages",
            merged.responses.len(),
            form_id,
            page_count
        );

        Ok(merged)
    }
}

impl Default for PageAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_STEP)
    }
}

//! Form Filter - filtered, re-paginated submission search
//!
//! The forms API paginates raw submissions, but callers page through the
//! *filtered* result. This library fetches every upstream page, applies the
//! caller's filter clauses, and only then cuts the requested window.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{apply, paginate, PageAggregator, Window};
pub use error::ApiError;
pub use models::{FilterClause, FilterCondition, FilterValue, QueryParams, Submission, SubmissionPage, SubmissionSet};
pub use services::FormsApiClient;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let window = Window::new(10, 0).unwrap();
        assert_eq!(window.limit(), 10);
        assert_eq!(PageAggregator::default().page_step(), crate::core::DEFAULT_PAGE_STEP);
    }
}

// Core pipeline exports
pub mod aggregator;
pub mod filters;
pub mod pagination;

pub use aggregator::{PageAggregator, DEFAULT_PAGE_STEP};
pub use filters::{apply, FilterError};
pub use pagination::{paginate, PaginationError, Window};

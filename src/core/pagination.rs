use crate::models::{SubmissionPage, SubmissionSet};
use std::num::NonZeroUsize;
use thiserror::Error;

/// Errors raised while building a client window
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("limit must be greater than zero")]
    ZeroLimit,

    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Offset/limit window over the filtered submissions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    limit: NonZeroUsize,
    offset: usize,
}

impl Window {
    pub fn new(limit: usize, offset: usize) -> Result<Self, PaginationError> {
        let limit = NonZeroUsize::new(limit).ok_or(PaginationError::ZeroLimit)?;
        Ok(Self { limit, offset })
    }

    /// Build a window from raw query values
    ///
    /// A missing limit falls back to `default_limit`, a missing offset to 0.
    pub fn parse(
        limit: Option<&str>,
        offset: Option<&str>,
        default_limit: usize,
    ) -> Result<Self, PaginationError> {
        let limit = match limit {
            Some(raw) => parse_count("limit", raw)?,
            None => default_limit,
        };
        let offset = match offset {
            Some(raw) => parse_count("offset", raw)?,
            None => 0,
        };

        Self::new(limit, offset)
    }

    pub fn limit(&self) -> usize {
        self.limit.get()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

fn parse_count(name: &'static str, raw: &str) -> Result<usize, PaginationError> {
    raw.trim().parse::<usize>().map_err(|_| PaginationError::InvalidNumber {
        name,
        value: raw.to_string(),
    })
}

/// Cut the caller's window out of a filtered page and recount
///
/// 1. An offset inside the list drops that many leading entries; an offset at
///    or past the end leaves the list as is.
/// 2. The rest is truncated to `limit`.
/// 3. `page_count` is measured on the full filtered list, `total_responses` on
///    the returned window.
pub fn paginate(page: SubmissionPage, window: Window) -> SubmissionSet {
    let mut responses = page.responses;
    let filtered_len = responses.len();
    let limit = window.limit();
    let offset = window.offset();

    if offset > 0 && offset < responses.len() {
        responses.drain(..offset);
    }

    responses.truncate(limit);

    SubmissionSet {
        total_responses: responses.len(),
        page_count: filtered_len.div_ceil(limit),
        responses,
    }
}

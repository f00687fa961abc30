use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::pagination::{PaginationError, Window};
use crate::models::FilterClause;

pub const FILTERS_PARAM: &str = "filters";
pub const LIMIT_PARAM: &str = "limit";
pub const OFFSET_PARAM: &str = "offset";

/// Ordered query-string parameters
///
/// Keeps the caller's order and duplicates so the pass-through to the forms
/// API is faithful. Lookups return the first occurrence of a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace every occurrence of `key` with a single entry, or append it
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter().position(|(k, _)| *k == key) {
            Some(idx) => {
                self.0[idx].1 = value;
                let mut seen = false;
                self.0.retain(|(k, _)| {
                    if *k != key {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => self.0.push((key, value)),
        }
    }

    /// Remove every occurrence of `key`, returning the first value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let first = self.get(key).map(str::to_string);
        self.0.retain(|(k, _)| k != key);
        first
    }

    /// Copy of these params with client pagination stripped
    pub fn without_pagination(&self) -> Self {
        let mut params = self.clone();
        params.remove(LIMIT_PARAM);
        params.remove(OFFSET_PARAM);
        params
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<(String, String)>> for QueryParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Errors raised while reading the inbound query string
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid filters: {0}")]
    InvalidFilters(#[from] serde_json::Error),

    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

/// Parsed `GET /{formId}/filteredResponses` query
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredResponsesQuery {
    pub filters: Vec<FilterClause>,
    pub window: Window,
    /// Everything left over, forwarded to the forms API
    pub passthrough: QueryParams,
}

impl FilteredResponsesQuery {
    /// Split the raw query into filters, the client window and pass-through params
    pub fn parse(mut params: QueryParams, default_limit: usize) -> Result<Self, RequestError> {
        let filters = match params.remove(FILTERS_PARAM) {
            Some(raw) => parse_filters(&raw)?,
            None => Vec::new(),
        };

        let window = Window::parse(
            params.get(LIMIT_PARAM),
            params.get(OFFSET_PARAM),
            default_limit,
        )?;

        Ok(Self {
            filters,
            window,
            passthrough: params,
        })
    }
}

/// Decode the `filters` parameter
///
/// Clients sometimes stringify the array twice, so a first decode that yields
/// a JSON string is decoded once more. An empty value means no filters.
pub fn parse_filters(raw: &str) -> Result<Vec<FilterClause>, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let decoded: serde_json::Value = serde_json::from_str(raw)?;
    let decoded = match decoded {
        serde_json::Value::String(inner) => serde_json::from_str(&inner)?,
        other => other,
    };

    serde_json::from_value(decoded)
}

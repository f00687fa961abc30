use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// A single completed form response as returned by the forms API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(rename = "submissionId")]
    pub submission_id: String,
    #[serde(rename = "submissionTime")]
    pub submission_time: DateTime<Utc>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub calculations: Vec<Calculation>,
    #[serde(rename = "urlParameters", default)]
    pub url_parameters: Vec<UrlParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,
    /// Upstream fields we don't interpret (documents, payments, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An answer within a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    /// `None` when the question was left unanswered
    #[serde(default)]
    pub value: Option<AnswerValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: Option<AnswerValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlParameter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub value: Option<AnswerValue>,
}

/// Scores are kept as the upstream wrote them; either may be missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Number>,
    #[serde(rename = "maxScore", default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<Number>,
}

/// Value carried by a question, calculation or URL parameter
///
/// Numbers and strings are the comparable cases. Anything else the upstream
/// sends (checkbox arrays, address objects, booleans) is kept as raw JSON so
/// the page still parses and the value round-trips to the caller unchanged.
/// Numbers stay [`serde_json::Number`] so integers are not re-emitted as floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(Number),
    Text(String),
    Structured(Value),
}

impl AnswerValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            AnswerValue::Number(_) => ValueKind::Number,
            AnswerValue::Text(_) => ValueKind::Text,
            AnswerValue::Structured(_) => ValueKind::Structured,
        }
    }
}

impl From<i64> for AnswerValue {
    fn from(n: i64) -> Self {
        AnswerValue::Number(n.into())
    }
}

/// Non-finite floats have no JSON form and become `null`
impl From<f64> for AnswerValue {
    fn from(n: f64) -> Self {
        match Number::from_f64(n) {
            Some(n) => AnswerValue::Number(n),
            None => AnswerValue::Structured(Value::Null),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Text(s.to_string())
    }
}

/// Comparison operator of a filter clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCondition {
    Equals,
    DoesNotEqual,
    GreaterThan,
    LessThan,
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterCondition::Equals => "equals",
            FilterCondition::DoesNotEqual => "does_not_equal",
            FilterCondition::GreaterThan => "greater_than",
            FilterCondition::LessThan => "less_than",
        };
        f.write_str(name)
    }
}

/// Right-hand side of a filter clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(f64),
    Text(String),
}

impl FilterValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FilterValue::Number(_) => ValueKind::Number,
            FilterValue::Text(_) => ValueKind::Text,
        }
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        FilterValue::Number(n)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

/// Type tag used when reporting comparison mismatches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Text,
    Structured,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Number => "number",
            ValueKind::Text => "string",
            ValueKind::Structured => "structured value",
        };
        f.write_str(name)
    }
}

/// A single comparison requested by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    pub id: String,
    pub condition: FilterCondition,
    pub value: FilterValue,
}

impl FilterClause {
    pub fn new(id: impl Into<String>, condition: FilterCondition, value: impl Into<FilterValue>) -> Self {
        Self {
            id: id.into(),
            condition,
            value: value.into(),
        }
    }
}

/// One page as reported by the forms API
///
/// `total_responses` and `page_count` are the upstream's own numbers. They
/// describe the raw, unfiltered submission set and are never shown to the
/// caller; the paginator builds a fresh [`SubmissionSet`](crate::models::SubmissionSet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPage {
    pub responses: Vec<Submission>,
    #[serde(rename = "totalResponses")]
    pub total_responses: usize,
    #[serde(rename = "pageCount")]
    pub page_count: usize,
}

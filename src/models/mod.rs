// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AnswerValue, Calculation, FilterClause, FilterCondition, FilterValue, Question, Quiz,
    Submission, SubmissionPage, UrlParameter, ValueKind,
};
pub use requests::{FilteredResponsesQuery, QueryParams, RequestError};
pub use responses::{HealthResponse, SubmissionSet};

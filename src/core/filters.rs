use crate::models::{
    AnswerValue, FilterClause, FilterCondition, FilterValue, Question, Submission, SubmissionPage,
    ValueKind,
};
use std::cmp::Ordering;
use thiserror::Error;

/// Errors raised while evaluating a single clause
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("question {question_id} holds a {found}, but the {condition} clause compares against a {expected}")]
    TypeMismatch {
        question_id: String,
        condition: FilterCondition,
        expected: ValueKind,
        found: ValueKind,
    },
}

/// Ordering between an answer and a clause value
///
/// Numbers compare numerically (so `-0.0 == 0.0`), strings lexicographically.
/// Any other pairing, or a NaN clause value, is a [`FilterError::TypeMismatch`];
/// values are never coerced.
pub fn compare(
    question_id: &str,
    condition: FilterCondition,
    answer: &AnswerValue,
    expected: &FilterValue,
) -> Result<Ordering, FilterError> {
    let ordering = match (answer, expected) {
        (AnswerValue::Number(a), FilterValue::Number(b)) => a.as_f64().and_then(|a| a.partial_cmp(b)),
        (AnswerValue::Text(a), FilterValue::Text(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => None,
    };

    ordering.ok_or_else(|| FilterError::TypeMismatch {
        question_id: question_id.to_string(),
        condition,
        expected: expected.kind(),
        found: answer.kind(),
    })
}

/// Whether `question` survives `clause`
///
/// Clauses only act on the question whose id they name; every other question
/// passes trivially. An unanswered question is rejected by everything except
/// `does_not_equal`.
pub fn question_passes(question: &Question, clause: &FilterClause) -> Result<bool, FilterError> {
    if question.id != clause.id {
        return Ok(true);
    }

    let Some(answer) = &question.value else {
        return Ok(clause.condition == FilterCondition::DoesNotEqual);
    };

    let ordering = compare(&question.id, clause.condition, answer, &clause.value)?;

    Ok(match clause.condition {
        FilterCondition::Equals => ordering == Ordering::Equal,
        FilterCondition::DoesNotEqual => ordering != Ordering::Equal,
        FilterCondition::GreaterThan => ordering == Ordering::Greater,
        FilterCondition::LessThan => ordering == Ordering::Less,
    })
}

/// Every question must pass every clause
pub fn submission_passes(submission: &Submission, clauses: &[FilterClause]) -> Result<bool, FilterError> {
    for question in &submission.questions {
        for clause in clauses {
            if !question_passes(question, clause)? {
                return Ok(false);
            }
        }
    }

    Ok(true)
}

/// Keep the submissions that pass all clauses
///
/// A type mismatch rejects the submission it occurred in and is logged; it
/// never aborts the whole page. Counts on the returned page are left as the
/// upstream reported them.
pub fn apply(page: SubmissionPage, clauses: &[FilterClause]) -> SubmissionPage {
    if clauses.is_empty() {
        return page;
    }

    let before = page.responses.len();

    let responses: Vec<Submission> = page
        .responses
        .into_iter()
        .filter(|submission| match submission_passes(submission, clauses) {
            Ok(passes) => passes,
            Err(e) => {
                tracing::warn!(
                    submission_id = %submission.submission_id,
                    "Rejecting submission: {}",
                    e
                );
                false
            }
        })
        .collect();

    tracing::debug!(
        "Filtered {} submissions down to {} with {} clauses",
        before,
        responses.len(),
        clauses.len()
    );

    SubmissionPage { responses, ..page }
}

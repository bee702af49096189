use serde::Serialize;

use crate::answers::Response;
use crate::spec::survey::SurveySpec;
use crate::visibility::visible_questions;

/// Live completion of a response, derived from the visible set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    pub answered: usize,
    pub total: usize,
    /// Percentage rounded to two decimals; 100 when nothing is visible.
    pub percentage: f64,
    /// Visible questions without an answer, in survey order.
    pub unanswered: Vec<String>,
    pub next_question: Option<String>,
}

impl Completion {
    pub fn is_complete(&self) -> bool {
        self.unanswered.is_empty()
    }
}

/// Computes completion from the questions visible right now.
///
/// Answers to hidden questions stay in the response but are counted in
/// neither the numerator nor the denominator, and a hidden required
/// question never blocks completion.
pub fn completion(spec: &SurveySpec, response: &Response) -> Completion {
    let visible = visible_questions(spec, response);
    let total = visible.len();
    let unanswered: Vec<String> = visible
        .iter()
        .filter(|question| !response.has_answer(&question.id))
        .map(|question| question.id.clone())
        .collect();
    let answered = total - unanswered.len();

    Completion {
        answered,
        total,
        percentage: percentage(answered, total),
        next_question: unanswered.first().cloned(),
        unanswered,
    }
}

pub fn percentage(answered: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let raw = answered as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

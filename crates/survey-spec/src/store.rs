//! In-memory stand-in for response persistence.
//!
//! Uniqueness comes from keying, not locking: one response per participant,
//! one answer per (response, question). Upserts are idempotent and the last
//! write wins, so a respondent submitting from two tabs cannot duplicate rows.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::answers::{AnswerValue, Response};
use crate::error::SurveyError;
use crate::spec::survey::SurveySpec;
use crate::validate::check_answer;

#[derive(Debug, Clone, Default)]
pub struct ResponseStore {
    responses: BTreeMap<String, Response>,
}

impl ResponseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find-or-create the response of `participant`.
    pub fn response_for(&mut self, participant: &str) -> &mut Response {
        self.responses
            .entry(participant.to_string())
            .or_insert_with(|| {
                debug!(participant, "created response");
                Response::new(format!("response-{participant}"), participant)
            })
    }

    pub fn response(&self, participant: &str) -> Option<&Response> {
        self.responses.get(participant)
    }

    /// Validates the answer's shape, then stores it. Rejected answers leave the
    /// response untouched.
    pub fn upsert_answer(
        &mut self,
        spec: &SurveySpec,
        participant: &str,
        question_id: &str,
        value: AnswerValue,
    ) -> Result<Option<AnswerValue>, SurveyError> {
        check_answer(spec, question_id, &value)?;
        Ok(self.response_for(participant).upsert(question_id, value))
    }

    /// Direct lookup; returns answers whether or not the question is visible.
    pub fn answer(&self, participant: &str, question_id: &str) -> Option<&AnswerValue> {
        self.responses
            .get(participant)
            .and_then(|response| response.answers.get(question_id))
    }

    /// Deletes a question from the survey, cascading a matrix parent to its
    /// rows, and drops the removed questions' answers from every response.
    pub fn delete_question(&mut self, spec: &mut SurveySpec, question_id: &str) -> Vec<String> {
        let removed = spec.remove_question(question_id);
        for response in self.responses.values_mut() {
            for id in &removed {
                response.remove(id);
            }
        }
        info!(survey = %spec.id, removed = removed.len(), "deleted questions");
        removed
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::question::{ChoiceOption, QuestionSpec, QuestionType};

    fn survey() -> SurveySpec {
        let mut grid = QuestionSpec::new("grid", "Grid", QuestionType::MatrixParent);
        grid.options = ["1", "2", "3"]
            .iter()
            .map(|id| ChoiceOption {
                id: id.to_string(),
                label: id.to_string(),
                position: 0,
            })
            .collect();
        let mut speed = QuestionSpec::new("speed", "Speed", QuestionType::MatrixRow);
        speed.matrix_parent = Some("grid".into());
        let mut price = QuestionSpec::new("price", "Price", QuestionType::MatrixRow);
        price.matrix_parent = Some("grid".into());
        SurveySpec::new("store", "Store")
            .with_question(QuestionSpec::new("name", "Name", QuestionType::Text))
            .with_question(grid)
            .with_question(speed)
            .with_question(price)
    }

    #[test]
    fn upsert_is_idempotent_last_write_wins() {
        let spec = survey();
        let mut store = ResponseStore::new();
        store
            .upsert_answer(&spec, "p1", "name", AnswerValue::Text("Ann".into()))
            .unwrap();
        let previous = store
            .upsert_answer(&spec, "p1", "name", AnswerValue::Text("Bea".into()))
            .unwrap();
        assert_eq!(previous, Some(AnswerValue::Text("Ann".into())));
        assert_eq!(store.len(), 1);
        assert_eq!(store.response("p1").unwrap().answers.len(), 1);
        assert_eq!(
            store.answer("p1", "name"),
            Some(&AnswerValue::Text("Bea".into()))
        );
    }

    #[test]
    fn rejected_answer_is_not_stored() {
        let spec = survey();
        let mut store = ResponseStore::new();
        let result = store.upsert_answer(&spec, "p1", "speed", AnswerValue::choose(["9"]));
        assert!(matches!(result, Err(SurveyError::AnswerShape { .. })));
        assert!(store.answer("p1", "speed").is_none());
    }

    #[test]
    fn matrix_rows_validate_against_parent_options() {
        let spec = survey();
        let mut store = ResponseStore::new();
        store
            .upsert_answer(&spec, "p1", "speed", AnswerValue::choose(["2"]))
            .unwrap();
        store
            .upsert_answer(&spec, "p1", "price", AnswerValue::choose(["3"]))
            .unwrap();
        assert_eq!(store.response("p1").unwrap().answers.len(), 2);
    }

    #[test]
    fn deleting_matrix_parent_cascades_to_rows_and_answers() {
        let mut spec = survey();
        let mut store = ResponseStore::new();
        for participant in ["p1", "p2"] {
            store
                .upsert_answer(&spec, participant, "speed", AnswerValue::choose(["1"]))
                .unwrap();
            store
                .upsert_answer(&spec, participant, "name", AnswerValue::Text("x".into()))
                .unwrap();
        }
        let removed = store.delete_question(&mut spec, "grid");
        assert_eq!(removed, vec!["grid", "speed", "price"]);
        assert_eq!(spec.questions.len(), 1);
        for participant in ["p1", "p2"] {
            assert!(store.answer(participant, "speed").is_none());
            assert!(store.answer(participant, "name").is_some());
        }
    }
}

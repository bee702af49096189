use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use survey_spec::{AnswerValue, ClientPayload, VisibilityMap};

/// Presentation change for one question container.
///
/// `required` is the state of the native `required` attribute on the
/// container's inputs; it is always off while the question is hidden so the
/// browser never blocks submission on a field the respondent cannot see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomPatch {
    pub question_id: String,
    pub container_id: String,
    pub hidden: bool,
    pub required: bool,
}

/// Browser-side state: the bootstrap payload, the answers typed so far and the
/// last visibility that was applied to the DOM.
#[derive(Debug, Clone)]
pub struct ClientMirror {
    payload: ClientPayload,
    answers: BTreeMap<String, AnswerValue>,
    applied: VisibilityMap,
}

impl ClientMirror {
    pub fn new(payload: ClientPayload) -> Self {
        Self {
            payload,
            answers: BTreeMap::new(),
            applied: VisibilityMap::new(),
        }
    }

    pub fn payload(&self) -> &ClientPayload {
        &self.payload
    }

    pub fn answers(&self) -> &BTreeMap<String, AnswerValue> {
        &self.answers
    }

    pub fn is_visible(&self, question_id: &str) -> bool {
        self.applied.get(question_id).copied().unwrap_or(false)
    }

    pub fn visibility(&self) -> &VisibilityMap {
        &self.applied
    }

    /// Loads the initial answers and returns a patch for every question.
    pub fn bootstrap(&mut self, answers: BTreeMap<String, AnswerValue>) -> Vec<DomPatch> {
        self.answers = answers;
        self.applied = self.payload.visibility(&self.answers);
        self.payload
            .questions
            .iter()
            .map(|question| self.patch_for(&question.id))
            .collect()
    }

    /// Records an input change (`None` clears the answer) and returns patches
    /// only for questions whose visibility flipped.
    pub fn apply_change(&mut self, question_id: &str, value: Option<AnswerValue>) -> Vec<DomPatch> {
        match value {
            Some(value) => {
                self.answers.insert(question_id.to_string(), value);
            }
            None => {
                self.answers.remove(question_id);
            }
        }

        let next = self.payload.visibility(&self.answers);
        let changed: Vec<String> = next
            .iter()
            .filter(|(id, visible)| self.applied.get(id.as_str()) != Some(*visible))
            .map(|(id, _)| id.clone())
            .collect();
        self.applied = next;

        self.payload
            .questions
            .iter()
            .filter(|question| changed.contains(&question.id))
            .map(|question| self.patch_for(&question.id))
            .collect()
    }

    fn patch_for(&self, question_id: &str) -> DomPatch {
        let hidden = !self.is_visible(question_id);
        let (container_id, required) = match self.payload.question(question_id) {
            Some(question) => (question.container_id.clone(), question.required),
            None => (survey_spec::payload::container_id(question_id), false),
        };
        DomPatch {
            question_id: question_id.to_string(),
            container_id,
            hidden,
            required: required && !hidden,
        }
    }
}

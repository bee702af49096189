use serde::{Deserialize, Serialize};

use crate::answers::AnswerLookup;
use crate::condition::is_visible;
use crate::spec::condition::ConditionSpec;
use crate::spec::survey::SurveySpec;
use crate::visibility::VisibilityMap;

/// Class toggled on a question container while it is hidden.
pub const HIDDEN_CLASS: &str = "survey-question--hidden";

/// Stable DOM id of a question container.
pub fn container_id(question_id: &str) -> String {
    format!("question-{question_id}")
}

/// Per-question data the browser needs to decide visibility locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientQuestion {
    pub id: String,
    pub container_id: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionSpec>,
}

impl ClientQuestion {
    pub fn visible<A>(&self, answers: &A) -> bool
    where
        A: AnswerLookup + ?Sized,
    {
        match &self.condition {
            Some(condition) => is_visible(condition, answers),
            None => true,
        }
    }
}

/// Serialized bootstrap payload for the browser mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientPayload {
    pub survey_id: String,
    #[serde(default = "default_hidden_class")]
    pub hidden_class: String,
    pub questions: Vec<ClientQuestion>,
}

fn default_hidden_class() -> String {
    HIDDEN_CLASS.to_string()
}

impl ClientPayload {
    pub fn question(&self, id: &str) -> Option<&ClientQuestion> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// Same decision the server resolver makes, driven only by the payload.
    pub fn visibility<A>(&self, answers: &A) -> VisibilityMap
    where
        A: AnswerLookup + ?Sized,
    {
        self.questions
            .iter()
            .map(|question| (question.id.clone(), question.visible(answers)))
            .collect()
    }
}

/// Builds the payload for every presentable question in survey order.
pub fn build_client_payload(spec: &SurveySpec) -> ClientPayload {
    let questions = spec
        .presentable_questions()
        .map(|question| ClientQuestion {
            id: question.id.clone(),
            container_id: container_id(&question.id),
            required: question.required,
            condition: question.condition.clone(),
        })
        .collect();

    ClientPayload {
        survey_id: spec.id.clone(),
        hidden_class: default_hidden_class(),
        questions,
    }
}

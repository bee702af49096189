use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::QuestionSpec;

/// Top-level survey definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SurveySpec {
    pub id: String,
    pub title: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<QuestionSpec>,
}

fn default_version() -> String {
    "1.0.0".into()
}

impl SurveySpec {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            version: default_version(),
            description: None,
            questions: Vec::new(),
        }
    }

    pub fn with_question(mut self, question: QuestionSpec) -> Self {
        self.questions.push(question);
        self
    }

    pub fn question(&self, id: &str) -> Option<&QuestionSpec> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// Questions in survey order: `position` ascending, declaration order on ties.
    pub fn ordered_questions(&self) -> Vec<&QuestionSpec> {
        let mut ordered: Vec<&QuestionSpec> = self.questions.iter().collect();
        ordered.sort_by_key(|question| question.position);
        ordered
    }

    /// Questions a respondent can answer, in survey order. Matrix parents are
    /// containers and never appear here; their rows do.
    pub fn presentable_questions(&self) -> impl Iterator<Item = &QuestionSpec> {
        self.ordered_questions()
            .into_iter()
            .filter(|question| !question.kind.is_matrix_parent())
    }

    /// Removes a question and, for a matrix parent, every row that belongs to it.
    /// Returns the ids that were removed.
    pub fn remove_question(&mut self, id: &str) -> Vec<String> {
        let removed: Vec<String> = self
            .questions
            .iter()
            .filter(|question| {
                question.id == id || question.matrix_parent.as_deref() == Some(id)
            })
            .map(|question| question.id.clone())
            .collect();
        self.questions
            .retain(|question| !removed.iter().any(|gone| gone == &question.id));
        removed
    }
}

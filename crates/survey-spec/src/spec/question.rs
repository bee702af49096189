use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::condition::ConditionSpec;

/// Default bounds used by `scale` questions that do not declare their own.
pub const DEFAULT_SCALE: ScaleBounds = ScaleBounds { min: 1.0, max: 10.0 };

/// Wire tag describing how a question is presented and answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    LongText,
    Number,
    Scale,
    Boolean,
    SingleChoice,
    MultipleChoice,
    Ranking,
    MatrixRow,
    MatrixParent,
}

impl QuestionType {
    /// Answer capability for this tag; `None` for containers that are never answered.
    pub fn capability(self) -> Option<Capability> {
        match self {
            QuestionType::Text | QuestionType::LongText => Some(Capability::Text),
            QuestionType::Number | QuestionType::Scale => Some(Capability::Number),
            QuestionType::Boolean => Some(Capability::Boolean),
            QuestionType::SingleChoice => Some(Capability::SingleChoice),
            QuestionType::MultipleChoice => Some(Capability::MultipleChoice),
            QuestionType::Ranking => Some(Capability::Ranking),
            QuestionType::MatrixRow => Some(Capability::MatrixRow),
            QuestionType::MatrixParent => None,
        }
    }

    pub fn is_matrix_parent(self) -> bool {
        matches!(self, QuestionType::MatrixParent)
    }

    pub fn is_scale(self) -> bool {
        matches!(self, QuestionType::Scale)
    }

    /// Matrix parents own the shared option set, so they count as option holders too.
    pub fn owns_options(self) -> bool {
        match self.capability() {
            Some(capability) => capability.supports_options() && self != QuestionType::MatrixRow,
            None => self.is_matrix_parent(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::LongText => "long_text",
            QuestionType::Number => "number",
            QuestionType::Scale => "scale",
            QuestionType::Boolean => "boolean",
            QuestionType::SingleChoice => "single_choice",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::Ranking => "ranking",
            QuestionType::MatrixRow => "matrix_row",
            QuestionType::MatrixParent => "matrix_parent",
        }
    }
}

/// Closed set of answer shapes. Shape checks live in [`crate::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Text,
    Number,
    Boolean,
    SingleChoice,
    MultipleChoice,
    Ranking,
    MatrixRow,
}

impl Capability {
    pub fn supports_options(self) -> bool {
        matches!(
            self,
            Capability::SingleChoice
                | Capability::MultipleChoice
                | Capability::Ranking
                | Capability::MatrixRow
        )
    }

    pub fn supports_multiple_selection(self) -> bool {
        matches!(self, Capability::MultipleChoice | Capability::Ranking)
    }
}

/// Inclusive bounds of a scale question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
}

impl ScaleBounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One selectable option of a choice, ranking or matrix-parent question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub position: u32,
}

/// Optional per-question answer restrictions layered on top of the shape rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct Constraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_len: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_len: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_selections: Option<usize>,
}

/// A single survey question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionSpec {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleBounds>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    /// Visibility rule against another question's answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,
}

impl QuestionSpec {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: QuestionType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            position: 0,
            required: false,
            scale: None,
            options: Vec::new(),
            condition: None,
            matrix_parent: None,
            row_text: None,
            constraint: None,
        }
    }

    /// Bounds of a scale question, falling back to [`DEFAULT_SCALE`].
    pub fn scale_bounds(&self) -> Option<ScaleBounds> {
        if self.kind.is_scale() {
            Some(self.scale.unwrap_or(DEFAULT_SCALE))
        } else {
            None
        }
    }

    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }

    pub fn is_matrix_row(&self) -> bool {
        self.matrix_parent.is_some()
    }
}

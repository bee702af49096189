use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One chosen option, optionally carrying its rank for ranking questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SelectionRepr")]
pub struct Selection {
    pub option: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

impl Selection {
    pub fn new(option: impl Into<String>) -> Self {
        Self {
            option: option.into(),
            rank: None,
        }
    }

    pub fn ranked(option: impl Into<String>, rank: u32) -> Self {
        Self {
            option: option.into(),
            rank: Some(rank),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SelectionRepr {
    Id(String),
    Full {
        option: String,
        #[serde(default)]
        rank: Option<u32>,
    },
}

impl From<SelectionRepr> for Selection {
    fn from(repr: SelectionRepr) -> Self {
        match repr {
            SelectionRepr::Id(option) => Selection::new(option),
            SelectionRepr::Full { option, rank } => Selection { option, rank },
        }
    }
}

/// Stored answer content. Its shape is checked against the question's
/// capability before it is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Boolean(bool),
    Number(f64),
    Text(String),
    Selections(Vec<Selection>),
}

impl AnswerValue {
    pub fn choose<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnswerValue::Selections(options.into_iter().map(Selection::new).collect())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn selections(&self) -> Option<&[Selection]> {
        match self {
            AnswerValue::Selections(selections) => Some(selections),
            _ => None,
        }
    }

    /// Selected option ids, or `None` when the answer is not a selection.
    pub fn selected_options(&self) -> Option<BTreeSet<&str>> {
        self.selections().map(|selections| {
            selections
                .iter()
                .map(|selection| selection.option.as_str())
                .collect()
        })
    }

    /// Human-readable form used by reports and export cells.
    pub fn display(&self) -> String {
        match self {
            AnswerValue::Boolean(flag) => flag.to_string(),
            AnswerValue::Number(value) => value.to_string(),
            AnswerValue::Text(text) => text.clone(),
            AnswerValue::Selections(selections) => {
                let mut ordered: Vec<&Selection> = selections.iter().collect();
                ordered.sort_by_key(|selection| selection.rank.unwrap_or(u32::MAX));
                ordered
                    .iter()
                    .map(|selection| selection.option.as_str())
                    .collect::<Vec<_>>()
                    .join(";")
            }
        }
    }
}

/// Read access to a respondent's answers keyed by question id.
pub trait AnswerLookup {
    fn answer(&self, question_id: &str) -> Option<&AnswerValue>;
}

impl AnswerLookup for BTreeMap<String, AnswerValue> {
    fn answer(&self, question_id: &str) -> Option<&AnswerValue> {
        self.get(question_id)
    }
}

/// One respondent's attempt. The answer map holds at most one answer per
/// question; visibility and completion are always derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Response {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub participant: String,
    #[serde(default)]
    pub answers: BTreeMap<String, AnswerValue>,
}

impl Response {
    pub fn new(id: impl Into<String>, participant: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            participant: participant.into(),
            answers: BTreeMap::new(),
        }
    }

    pub fn with_answer(mut self, question_id: impl Into<String>, value: AnswerValue) -> Self {
        self.upsert(question_id, value);
        self
    }

    /// Find-or-create by question id; the last write wins.
    pub fn upsert(
        &mut self,
        question_id: impl Into<String>,
        value: AnswerValue,
    ) -> Option<AnswerValue> {
        self.answers.insert(question_id.into(), value)
    }

    pub fn remove(&mut self, question_id: &str) -> Option<AnswerValue> {
        self.answers.remove(question_id)
    }

    pub fn has_answer(&self, question_id: &str) -> bool {
        self.answers.contains_key(question_id)
    }
}

impl AnswerLookup for Response {
    fn answer(&self, question_id: &str) -> Option<&AnswerValue> {
        self.answers.get(question_id)
    }
}

/// A single field-level problem reported back to the respondent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Outcome of validating a whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<ValidationError>,
    #[serde(default)]
    pub missing_required: Vec<String>,
    #[serde(default)]
    pub unknown_fields: Vec<String>,
}

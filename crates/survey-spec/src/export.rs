//! Visibility answers for exporters: "was this question shown to this respondent".

use serde::Serialize;

use crate::answers::Response;
use crate::spec::survey::SurveySpec;
use crate::visibility::{question_visible, resolve_visibility};

/// One exported cell for a presentable question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ExportCell {
    /// Hidden by conditional logic; exporters leave the cell blank even if a
    /// stale answer exists.
    Hidden,
    Unanswered,
    Value(String),
}

impl ExportCell {
    /// Plain text for tabular formats.
    pub fn as_text(&self) -> &str {
        match self {
            ExportCell::Hidden | ExportCell::Unanswered => "",
            ExportCell::Value(text) => text,
        }
    }
}

/// Whether `question_id` is currently shown to the respondent. Unknown ids and
/// matrix parents are never shown.
pub fn shown_to(spec: &SurveySpec, response: &Response, question_id: &str) -> bool {
    spec.question(question_id)
        .is_some_and(|question| question_visible(question, response))
}

/// Cells for every presentable question in survey order.
pub fn export_cells(spec: &SurveySpec, response: &Response) -> Vec<(String, ExportCell)> {
    let visibility = resolve_visibility(spec, response);
    spec.presentable_questions()
        .map(|question| {
            let cell = if !visibility.get(&question.id).copied().unwrap_or(false) {
                ExportCell::Hidden
            } else {
                match response.answers.get(&question.id) {
                    Some(value) => ExportCell::Value(value.display()),
                    None => ExportCell::Unanswered,
                }
            };
            (question.id.clone(), cell)
        })
        .collect()
}

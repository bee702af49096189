//! Matrix questions: one parent owning a shared option set, answered row by row.
//!
//! The parent is a container. It is never presented on its own, never carries a
//! condition and is never a conditional parent. Each row owns no options and
//! borrows the parent's at validation and render time.

use crate::spec::question::{ChoiceOption, QuestionSpec};
use crate::spec::survey::SurveySpec;

/// A matrix parent together with its rows in survey order.
#[derive(Debug, Clone)]
pub struct MatrixGroup<'a> {
    pub parent: &'a QuestionSpec,
    pub rows: Vec<&'a QuestionSpec>,
}

impl MatrixGroup<'_> {
    pub fn options(&self) -> &[ChoiceOption] {
        &self.parent.options
    }
}

/// Options a question is answered against. Rows always use the parent's
/// options; a row whose parent is missing has none.
pub fn effective_options<'a>(spec: &'a SurveySpec, question: &'a QuestionSpec) -> &'a [ChoiceOption] {
    match &question.matrix_parent {
        Some(parent_id) => spec
            .question(parent_id)
            .map(|parent| parent.options.as_slice())
            .unwrap_or(&[]),
        None => &question.options,
    }
}

/// Rows that belong to `parent_id`, in survey order.
pub fn rows_of<'a>(spec: &'a SurveySpec, parent_id: &str) -> Vec<&'a QuestionSpec> {
    spec.ordered_questions()
        .into_iter()
        .filter(|question| question.matrix_parent.as_deref() == Some(parent_id))
        .collect()
}

/// Every matrix parent with its rows, in survey order.
pub fn matrix_groups(spec: &SurveySpec) -> Vec<MatrixGroup<'_>> {
    spec.ordered_questions()
        .into_iter()
        .filter(|question| question.kind.is_matrix_parent())
        .map(|parent| MatrixGroup {
            parent,
            rows: rows_of(spec, &parent.id),
        })
        .collect()
}

/// Label shown for a row: its row text, else its title.
pub fn row_label(question: &QuestionSpec) -> &str {
    question.row_text.as_deref().unwrap_or(&question.title)
}

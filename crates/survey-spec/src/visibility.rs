use std::collections::BTreeMap;

use tracing::trace;

use crate::answers::AnswerLookup;
use crate::condition::is_visible;
use crate::spec::question::QuestionSpec;
use crate::spec::survey::SurveySpec;

/// Visibility per presentable question id.
pub type VisibilityMap = BTreeMap<String, bool>;

/// Decides whether one question is currently presentable.
///
/// Only the direct parent's answer is consulted. Chained conditions are
/// rejected at authoring time, so the parent's own visibility is not resolved.
pub fn question_visible<A>(question: &QuestionSpec, answers: &A) -> bool
where
    A: AnswerLookup + ?Sized,
{
    if question.kind.is_matrix_parent() {
        return false;
    }
    let visible = match &question.condition {
        Some(condition) => is_visible(condition, answers),
        None => true,
    };
    trace!(question = %question.id, visible, "resolved visibility");
    visible
}

/// Resolves visibility for every presentable question of the survey.
pub fn resolve_visibility<A>(spec: &SurveySpec, answers: &A) -> VisibilityMap
where
    A: AnswerLookup + ?Sized,
{
    spec.presentable_questions()
        .map(|question| (question.id.clone(), question_visible(question, answers)))
        .collect()
}

/// Currently presentable questions in survey order.
pub fn visible_questions<'a, A>(spec: &'a SurveySpec, answers: &A) -> Vec<&'a QuestionSpec>
where
    A: AnswerLookup + ?Sized,
{
    spec.presentable_questions()
        .filter(|question| question_visible(question, answers))
        .collect()
}

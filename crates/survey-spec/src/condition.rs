use std::collections::BTreeSet;

use tracing::trace;

use crate::answers::{AnswerLookup, AnswerValue};
use crate::spec::condition::{ConditionKind, ConditionSpec, LogicType};

/// Parent answer reduced to what a condition can observe.
#[derive(Debug, Clone, PartialEq)]
pub enum Observed<'a> {
    Number(f64),
    Selection(BTreeSet<&'a str>),
}

impl<'a> Observed<'a> {
    /// Extracts the value a condition of `kind` looks at, or `None` when the
    /// answer has the wrong shape.
    pub fn from_answer(kind: ConditionKind, answer: &'a AnswerValue) -> Option<Self> {
        match kind {
            ConditionKind::Scale => answer.as_number().map(Observed::Number),
            ConditionKind::Option => answer.selected_options().map(Observed::Selection),
        }
    }
}

/// Evaluates the raw condition against an observed value.
///
/// Returns `None` when the rule cannot be decided: a comparison is missing,
/// the option rule has no triggers, or the observed value has the wrong kind.
pub fn condition_met(observed: &Observed<'_>, condition: &ConditionSpec) -> Option<bool> {
    match (condition.kind, observed) {
        (ConditionKind::Scale, Observed::Number(value)) => scale_met(*value, condition),
        (ConditionKind::Option, Observed::Selection(selected)) => {
            if condition.trigger_options.is_empty() {
                return None;
            }
            Some(
                condition
                    .trigger_options
                    .iter()
                    .any(|trigger| selected.contains(trigger.as_str())),
            )
        }
        _ => None,
    }
}

fn scale_met(value: f64, condition: &ConditionSpec) -> Option<bool> {
    let (first_op, first_operand) = condition.first_comparison()?;
    let first = first_op.compare(value, first_operand);
    match condition.logic {
        LogicType::Single => Some(first),
        LogicType::And | LogicType::Range => {
            let (second_op, second_operand) = condition.second_comparison()?;
            Some(first && second_op.compare(value, second_operand))
        }
        LogicType::Or => {
            let (second_op, second_operand) = condition.second_comparison()?;
            Some(first || second_op.compare(value, second_operand))
        }
    }
}

/// Applies `show_if_met` to a decided condition. Undecided rules stay hidden.
pub fn visibility_for(met: Option<bool>, condition: &ConditionSpec) -> bool {
    match met {
        Some(met) => met == condition.show_if_met,
        None => false,
    }
}

/// Full decision for a conditional question: look up the parent answer,
/// observe it, evaluate, then apply `show_if_met`. Missing parent answers fail closed.
pub fn is_visible<A>(condition: &ConditionSpec, answers: &A) -> bool
where
    A: AnswerLookup + ?Sized,
{
    let Some(answer) = answers.answer(&condition.parent) else {
        trace!(parent = %condition.parent, "parent unanswered, condition hidden");
        return false;
    };
    let met = Observed::from_answer(condition.kind, answer)
        .and_then(|observed| condition_met(&observed, condition));
    if met.is_none() {
        trace!(parent = %condition.parent, "condition undecidable, failing closed");
    }
    visibility_for(met, condition)
}

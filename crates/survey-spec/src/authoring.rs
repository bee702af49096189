//! Configuration-time checks for survey questions.
//!
//! Everything that could make a condition ambiguous is rejected here, so the
//! evaluator can stay a total function that fails closed instead of erroring.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ComparisonSlot, ConfigurationError, SurveyError};
use crate::matrix::effective_options;
use crate::spec::condition::{ConditionKind, ConditionSpec, LogicType, Operator};
use crate::spec::question::{QuestionSpec, QuestionType};
use crate::spec::survey::SurveySpec;

/// How strictly `range` conditions are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// `range` must be `greater_than_or_equal` then `less_than_or_equal`.
    #[default]
    Strict,
    /// Any operator pair is accepted and evaluated as AND; bounds must still be ordered.
    GenericAnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct AuthoringPolicy {
    #[serde(default)]
    pub range: RangePolicy,
}

/// Collects every configuration problem in the survey.
pub fn check_survey(spec: &SurveySpec, policy: &AuthoringPolicy) -> Vec<ConfigurationError> {
    let mut errors = Vec::new();
    let by_id = index_questions(spec, &mut errors);

    for question in &spec.questions {
        check_options(question, &mut errors);
        check_matrix(question, &by_id, &mut errors);
        if let Some(condition) = &question.condition {
            check_condition(spec, question, condition, &by_id, policy, &mut errors);
        }
    }

    for error in &errors {
        debug!(survey = %spec.id, %error, "configuration rejected");
    }
    errors
}

/// Like [`check_survey`], but as a `Result` for callers that stop on the first bad survey.
pub fn ensure_valid(spec: &SurveySpec, policy: &AuthoringPolicy) -> Result<(), SurveyError> {
    let errors = check_survey(spec, policy);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SurveyError::InvalidConfiguration(errors))
    }
}

fn index_questions<'a>(
    spec: &'a SurveySpec,
    errors: &mut Vec<ConfigurationError>,
) -> BTreeMap<&'a str, &'a QuestionSpec> {
    let mut by_id = BTreeMap::new();
    for question in &spec.questions {
        if by_id.insert(question.id.as_str(), question).is_some() {
            errors.push(ConfigurationError::DuplicateQuestion(question.id.clone()));
        }
    }
    by_id
}

fn check_options(question: &QuestionSpec, errors: &mut Vec<ConfigurationError>) {
    let mut seen = BTreeSet::new();
    for option in &question.options {
        if !seen.insert(option.id.as_str()) {
            errors.push(ConfigurationError::DuplicateOption {
                question: question.id.clone(),
                option: option.id.clone(),
            });
        }
    }
    if question.options.is_empty()
        && question.kind.owns_options()
        && !question.kind.is_matrix_parent()
    {
        errors.push(ConfigurationError::EmptyOptions(question.id.clone()));
    }
    if let Some(pattern) = question
        .constraint
        .as_ref()
        .and_then(|constraint| constraint.pattern.as_ref())
        && let Err(err) = Regex::new(pattern)
    {
        errors.push(ConfigurationError::InvalidPattern {
            question: question.id.clone(),
            pattern: pattern.clone(),
            reason: err.to_string(),
        });
    }
    if let Some(bounds) = question.scale_bounds()
        && bounds.min >= bounds.max
    {
        errors.push(ConfigurationError::InvalidScaleBounds {
            question: question.id.clone(),
            min: bounds.min,
            max: bounds.max,
        });
    }
}

fn check_matrix(
    question: &QuestionSpec,
    by_id: &BTreeMap<&str, &QuestionSpec>,
    errors: &mut Vec<ConfigurationError>,
) {
    if question.kind.is_matrix_parent() {
        if question.condition.is_some() {
            errors.push(ConfigurationError::ConditionalMatrixParent(question.id.clone()));
        }
        if question.matrix_parent.is_some() {
            errors.push(ConfigurationError::NestedMatrix(question.id.clone()));
        }
        if question.options.is_empty() {
            errors.push(ConfigurationError::EmptyMatrix(question.id.clone()));
        }
        return;
    }

    match &question.matrix_parent {
        Some(parent_id) => {
            if question.condition.is_some() {
                errors.push(ConfigurationError::ConditionalMatrixRow(question.id.clone()));
            }
            if !question.options.is_empty() {
                errors.push(ConfigurationError::MatrixRowOptions(question.id.clone()));
            }
            let parent_ok = by_id
                .get(parent_id.as_str())
                .is_some_and(|parent| parent.kind.is_matrix_parent());
            if !parent_ok {
                errors.push(ConfigurationError::InvalidMatrixParent {
                    question: question.id.clone(),
                    parent: parent_id.clone(),
                });
            }
        }
        None if question.kind == QuestionType::MatrixRow => {
            errors.push(ConfigurationError::MissingMatrixParent(question.id.clone()));
        }
        None => {}
    }
}

fn check_condition(
    spec: &SurveySpec,
    question: &QuestionSpec,
    condition: &ConditionSpec,
    by_id: &BTreeMap<&str, &QuestionSpec>,
    policy: &AuthoringPolicy,
    errors: &mut Vec<ConfigurationError>,
) {
    let id = || question.id.clone();

    for field in unused_condition_fields(condition) {
        errors.push(ConfigurationError::UnusedConditionField {
            question: id(),
            field,
        });
    }

    if condition.parent == question.id {
        errors.push(ConfigurationError::SelfReference(id()));
        return;
    }
    let Some(parent) = by_id.get(condition.parent.as_str()).copied() else {
        errors.push(ConfigurationError::UnknownParent {
            question: id(),
            parent: condition.parent.clone(),
        });
        return;
    };
    if parent.kind.is_matrix_parent() {
        errors.push(ConfigurationError::MatrixParentAsParent {
            question: id(),
            parent: parent.id.clone(),
        });
        return;
    }
    if parent.condition.is_some() {
        errors.push(ConfigurationError::ChainedParent {
            question: id(),
            parent: parent.id.clone(),
        });
    }

    match condition.kind {
        ConditionKind::Scale => check_scale_condition(question, condition, parent, policy, errors),
        ConditionKind::Option => {
            let offered = effective_options(spec, parent);
            let supports_options = parent
                .kind
                .capability()
                .is_some_and(|capability| capability.supports_options());
            if !supports_options {
                errors.push(ConfigurationError::NonOptionParent {
                    question: id(),
                    parent: parent.id.clone(),
                });
                return;
            }
            if condition.trigger_options.is_empty() {
                errors.push(ConfigurationError::NoTriggerOptions(id()));
            }
            for trigger in &condition.trigger_options {
                if !offered.iter().any(|option| &option.id == trigger) {
                    errors.push(ConfigurationError::UnknownTriggerOption {
                        question: id(),
                        parent: parent.id.clone(),
                        option: trigger.clone(),
                    });
                }
            }
        }
    }
}

/// Fields the rule carries but evaluation never looks at.
fn unused_condition_fields(condition: &ConditionSpec) -> Vec<&'static str> {
    let mut unused = Vec::new();
    match condition.kind {
        ConditionKind::Scale => {
            if !condition.trigger_options.is_empty() {
                unused.push("trigger_options");
            }
            if !condition.logic.uses_second_comparison() {
                if condition.second_operator.is_some() {
                    unused.push("second_operator");
                }
                if condition.second_value.is_some() {
                    unused.push("second_value");
                }
            }
        }
        ConditionKind::Option => {
            if condition.logic != LogicType::Single {
                unused.push("logic");
            }
            let scalar = [
                ("operator", condition.operator.is_some()),
                ("value", condition.value.is_some()),
                ("second_operator", condition.second_operator.is_some()),
                ("second_value", condition.second_value.is_some()),
            ];
            unused.extend(scalar.into_iter().filter(|(_, set)| *set).map(|(name, _)| name));
        }
    }
    unused
}

fn check_scale_condition(
    question: &QuestionSpec,
    condition: &ConditionSpec,
    parent: &QuestionSpec,
    policy: &AuthoringPolicy,
    errors: &mut Vec<ConfigurationError>,
) {
    let id = || question.id.clone();
    let Some(bounds) = parent.scale_bounds() else {
        errors.push(ConfigurationError::NonScaleParent {
            question: id(),
            parent: parent.id.clone(),
        });
        return;
    };

    let first = condition.first_comparison();
    if first.is_none() {
        errors.push(ConfigurationError::MissingComparison {
            question: id(),
            slot: ComparisonSlot::First,
        });
    }
    let second = if condition.logic.uses_second_comparison() {
        let second = condition.second_comparison();
        if second.is_none() {
            errors.push(ConfigurationError::MissingComparison {
                question: id(),
                slot: ComparisonSlot::Second,
            });
        }
        second
    } else {
        None
    };

    let used = first.into_iter().chain(second).map(|(_, value)| value);
    for value in used {
        if !bounds.contains(value) {
            errors.push(ConfigurationError::ValueOutsideScale {
                question: id(),
                value,
                min: bounds.min,
                max: bounds.max,
            });
        }
    }

    if condition.logic == LogicType::Range
        && let (Some((first_op, low)), Some((second_op, high))) = (first, second)
    {
        let canonical =
            first_op == Operator::GreaterThanOrEqual && second_op == Operator::LessThanOrEqual;
        if policy.range == RangePolicy::Strict && !canonical {
            errors.push(ConfigurationError::RangeOperators {
                question: id(),
                first: first_op,
                second: second_op,
            });
        }
        if low > high {
            errors.push(ConfigurationError::ReversedRange {
                question: id(),
                low,
                high,
            });
        }
    }
}

use std::collections::BTreeSet;

use regex::Regex;
use tracing::debug;

use crate::answers::{AnswerValue, Response, Selection, ValidationError, ValidationResult};
use crate::error::{AnswerShapeError, SurveyError};
use crate::matrix::effective_options;
use crate::spec::question::{Capability, ChoiceOption, Constraint, QuestionSpec};
use crate::spec::survey::SurveySpec;
use crate::visibility::resolve_visibility;

impl Capability {
    /// Shape rule every saved answer of this capability must satisfy.
    pub fn check_shape(
        self,
        value: &AnswerValue,
        options: &[ChoiceOption],
    ) -> Result<(), AnswerShapeError> {
        match self {
            Capability::Text => match value {
                AnswerValue::Text(text) if text.trim().is_empty() => Err(AnswerShapeError::Blank),
                AnswerValue::Text(_) => Ok(()),
                _ => Err(AnswerShapeError::WrongType { expected: "text" }),
            },
            Capability::Number => match value {
                AnswerValue::Number(number) if !number.is_finite() => {
                    Err(AnswerShapeError::NotFinite)
                }
                AnswerValue::Number(_) => Ok(()),
                _ => Err(AnswerShapeError::WrongType { expected: "a number" }),
            },
            Capability::Boolean => match value {
                AnswerValue::Boolean(_) => Ok(()),
                _ => Err(AnswerShapeError::WrongType { expected: "a boolean" }),
            },
            Capability::SingleChoice | Capability::MatrixRow => {
                let selections = selections_of(value)?;
                if selections.len() != 1 {
                    return Err(AnswerShapeError::ExpectedOneSelection {
                        count: selections.len(),
                    });
                }
                known_unique(selections, options)
            }
            Capability::MultipleChoice => {
                let selections = selections_of(value)?;
                if selections.is_empty() {
                    return Err(AnswerShapeError::EmptySelection);
                }
                known_unique(selections, options)
            }
            Capability::Ranking => {
                let selections = selections_of(value)?;
                known_unique(selections, options)?;
                check_ranking(selections, options.len())
            }
        }
    }
}

fn selections_of(value: &AnswerValue) -> Result<&[Selection], AnswerShapeError> {
    value.selections().ok_or(AnswerShapeError::WrongType {
        expected: "a list of selected options",
    })
}

fn known_unique(selections: &[Selection], options: &[ChoiceOption]) -> Result<(), AnswerShapeError> {
    let mut seen = BTreeSet::new();
    for selection in selections {
        if !options.iter().any(|option| option.id == selection.option) {
            return Err(AnswerShapeError::UnknownOption(selection.option.clone()));
        }
        if !seen.insert(selection.option.as_str()) {
            return Err(AnswerShapeError::DuplicateOption(selection.option.clone()));
        }
    }
    Ok(())
}

fn check_ranking(selections: &[Selection], expected: usize) -> Result<(), AnswerShapeError> {
    let mut ranks = Vec::with_capacity(selections.len());
    for selection in selections {
        match selection.rank {
            Some(rank) => ranks.push(rank),
            None => return Err(AnswerShapeError::MissingRank(selection.option.clone())),
        }
    }
    if ranks.len() != expected {
        return Err(AnswerShapeError::IncompleteRanking {
            expected,
            ranked: ranks.len(),
        });
    }
    ranks.sort_unstable();
    let contiguous = ranks
        .iter()
        .enumerate()
        .all(|(index, rank)| *rank as usize == index + 1);
    if contiguous {
        Ok(())
    } else {
        Err(AnswerShapeError::RankSequence { expected, ranks })
    }
}

/// Checks one answer against its question: capability shape, scale bounds and
/// any configured constraint. `None` stands for an empty submission.
pub fn validate_answer(
    spec: &SurveySpec,
    question: &QuestionSpec,
    value: Option<&AnswerValue>,
) -> Result<(), AnswerShapeError> {
    let capability = question
        .kind
        .capability()
        .ok_or(AnswerShapeError::NotAnswerable)?;
    let value = value.ok_or(AnswerShapeError::Missing)?;
    capability.check_shape(value, effective_options(spec, question))?;

    if let (Some(bounds), AnswerValue::Number(number)) = (question.scale_bounds(), value)
        && !bounds.contains(*number)
    {
        return Err(AnswerShapeError::OutOfScale {
            value: *number,
            min: bounds.min,
            max: bounds.max,
        });
    }

    if let Some(constraint) = &question.constraint {
        enforce_constraint(constraint, value)?;
    }
    Ok(())
}

fn enforce_constraint(constraint: &Constraint, value: &AnswerValue) -> Result<(), AnswerShapeError> {
    if let AnswerValue::Text(text) = value {
        if let Some(pattern) = &constraint.pattern {
            let regex = Regex::new(pattern).map_err(|_| AnswerShapeError::InvalidPattern)?;
            if !regex.is_match(text) {
                return Err(AnswerShapeError::PatternMismatch);
            }
        }
        let length = text.chars().count();
        if let Some(min) = constraint.min_len
            && length < min
        {
            return Err(AnswerShapeError::TooShort { min });
        }
        if let Some(max) = constraint.max_len
            && length > max
        {
            return Err(AnswerShapeError::TooLong { max });
        }
    }

    if let (Some(max), AnswerValue::Selections(selections)) = (constraint.max_selections, value)
        && selections.len() > max
    {
        return Err(AnswerShapeError::TooManySelections {
            max,
            count: selections.len(),
        });
    }
    Ok(())
}

/// Save-time check for a single answer addressed by question id.
pub fn check_answer(
    spec: &SurveySpec,
    question_id: &str,
    value: &AnswerValue,
) -> Result<(), SurveyError> {
    let question = spec
        .question(question_id)
        .ok_or_else(|| SurveyError::UnknownQuestion(question_id.to_string()))?;
    if question.kind.is_matrix_parent() {
        return Err(SurveyError::NotAnswerable(question_id.to_string()));
    }
    validate_answer(spec, question, Some(value)).map_err(|source| {
        debug!(question = question_id, code = source.code(), "answer rejected");
        SurveyError::AnswerShape {
            question: question_id.to_string(),
            source,
        }
    })
}

/// Validates a whole response against the questions visible right now.
///
/// Answers to hidden questions are left alone: they are neither checked nor
/// reported, and a hidden required question is never missing.
pub fn validate_response(spec: &SurveySpec, response: &Response) -> ValidationResult {
    let visibility = resolve_visibility(spec, response);

    let mut errors = Vec::new();
    let mut missing_required = Vec::new();

    for question in spec.presentable_questions() {
        if !visibility.get(&question.id).copied().unwrap_or(false) {
            continue;
        }
        match response.answers.get(&question.id) {
            None => {
                if question.required {
                    missing_required.push(question.id.clone());
                }
            }
            Some(value) => {
                if let Err(error) = validate_answer(spec, question, Some(value)) {
                    errors.push(field_error(&question.id, &error));
                }
            }
        }
    }

    let unknown_fields: Vec<String> = response
        .answers
        .keys()
        .filter(|key| !visibility.contains_key(key.as_str()))
        .cloned()
        .collect();

    ValidationResult {
        valid: errors.is_empty() && missing_required.is_empty() && unknown_fields.is_empty(),
        errors,
        missing_required,
        unknown_fields,
    }
}

pub fn field_error(question_id: &str, error: &AnswerShapeError) -> ValidationError {
    ValidationError {
        question_id: Some(question_id.to_string()),
        path: Some(format!("/{}", question_id)),
        message: error.to_string(),
        code: Some(error.code().into()),
    }
}

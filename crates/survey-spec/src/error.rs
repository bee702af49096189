use thiserror::Error;

use crate::spec::condition::Operator;

/// Which of the two configured comparisons an authoring problem refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonSlot {
    First,
    Second,
}

impl std::fmt::Display for ComparisonSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonSlot::First => f.write_str("first"),
            ComparisonSlot::Second => f.write_str("second"),
        }
    }
}

/// Rejected question configuration. Only raised while authoring a survey.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("question id '{0}' is used more than once")]
    DuplicateQuestion(String),
    #[error("question '{question}' lists option '{option}' more than once")]
    DuplicateOption { question: String, option: String },
    #[error("question '{question}' has scale bounds {min}..{max}; min must be below max")]
    InvalidScaleBounds { question: String, min: f64, max: f64 },
    #[error("question '{question}' is missing its {slot} operator/value pair")]
    MissingComparison {
        question: String,
        slot: ComparisonSlot,
    },
    #[error("question '{question}' compares against {value}, outside the parent scale {min}..{max}")]
    ValueOutsideScale {
        question: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("question '{question}' has a reversed range {low}..{high}")]
    ReversedRange {
        question: String,
        low: f64,
        high: f64,
    },
    #[error(
        "question '{question}' uses range logic with {first:?}/{second:?}; expected greater_than_or_equal/less_than_or_equal"
    )]
    RangeOperators {
        question: String,
        first: Operator,
        second: Operator,
    },
    #[error("question '{question}' has a scale condition on non-scale parent '{parent}'")]
    NonScaleParent { question: String, parent: String },
    #[error("question '{question}' has an option condition on '{parent}', which has no options")]
    NonOptionParent { question: String, parent: String },
    #[error("question '{question}' depends on unknown question '{parent}'")]
    UnknownParent { question: String, parent: String },
    #[error("question '{0}' cannot depend on itself")]
    SelfReference(String),
    #[error(
        "question '{question}' depends on '{parent}', which is itself conditional; only one level is allowed"
    )]
    ChainedParent { question: String, parent: String },
    #[error("question '{0}' has an option condition without trigger options")]
    NoTriggerOptions(String),
    #[error("question '{question}' triggers on option '{option}', which '{parent}' does not offer")]
    UnknownTriggerOption {
        question: String,
        parent: String,
        option: String,
    },
    #[error("matrix row '{0}' cannot have a condition")]
    ConditionalMatrixRow(String),
    #[error("matrix row '{0}' cannot own options")]
    MatrixRowOptions(String),
    #[error("question '{question}' names '{parent}' as matrix parent, which is not a matrix parent")]
    InvalidMatrixParent { question: String, parent: String },
    #[error("question '{0}' has type matrix_row but no matrix parent")]
    MissingMatrixParent(String),
    #[error("matrix parent '{0}' cannot have a condition")]
    ConditionalMatrixParent(String),
    #[error("matrix parent '{0}' cannot itself belong to a matrix")]
    NestedMatrix(String),
    #[error("matrix parent '{0}' has no options for its rows")]
    EmptyMatrix(String),
    #[error("question '{0}' has no options to choose from")]
    EmptyOptions(String),
    #[error("question '{question}' has an invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        question: String,
        pattern: String,
        reason: String,
    },
    #[error("question '{question}' sets condition field '{field}', which its rule never reads")]
    UnusedConditionField {
        question: String,
        field: &'static str,
    },
    #[error("question '{question}' depends on matrix parent '{parent}'")]
    MatrixParentAsParent { question: String, parent: String },
}

/// Answer content that does not satisfy its question's capability.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnswerShapeError {
    #[error("an answer is required")]
    Missing,
    #[error("question does not accept answers")]
    NotAnswerable,
    #[error("expected {expected}")]
    WrongType { expected: &'static str },
    #[error("text cannot be blank")]
    Blank,
    #[error("text does not match the required pattern")]
    PatternMismatch,
    #[error("the configured pattern cannot be compiled")]
    InvalidPattern,
    #[error("text shorter than {min} characters")]
    TooShort { min: usize },
    #[error("text longer than {max} characters")]
    TooLong { max: usize },
    #[error("value must be a finite number")]
    NotFinite,
    #[error("{value} is outside the scale {min}..{max}")]
    OutOfScale { value: f64, min: f64, max: f64 },
    #[error("select exactly one option (got {count})")]
    ExpectedOneSelection { count: usize },
    #[error("select at least one option")]
    EmptySelection,
    #[error("select at most {max} options (got {count})")]
    TooManySelections { max: usize, count: usize },
    #[error("option '{0}' is not offered")]
    UnknownOption(String),
    #[error("option '{0}' selected more than once")]
    DuplicateOption(String),
    #[error("option '{0}' has no rank")]
    MissingRank(String),
    #[error("rank every option: {ranked} of {expected} ranked")]
    IncompleteRanking { expected: usize, ranked: usize },
    #[error("ranks must be 1..{expected} without gaps or duplicates (got {ranks:?})")]
    RankSequence { expected: usize, ranks: Vec<u32> },
}

impl AnswerShapeError {
    /// Stable machine-readable code for respondent-facing error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            AnswerShapeError::Missing => "missing",
            AnswerShapeError::NotAnswerable => "not_answerable",
            AnswerShapeError::WrongType { .. } => "type_mismatch",
            AnswerShapeError::Blank => "blank",
            AnswerShapeError::PatternMismatch => "pattern_mismatch",
            AnswerShapeError::InvalidPattern => "invalid_pattern",
            AnswerShapeError::TooShort { .. } => "min_length",
            AnswerShapeError::TooLong { .. } => "max_length",
            AnswerShapeError::NotFinite => "not_finite",
            AnswerShapeError::OutOfScale { .. } => "out_of_scale",
            AnswerShapeError::ExpectedOneSelection { .. } => "single_selection",
            AnswerShapeError::EmptySelection => "empty_selection",
            AnswerShapeError::TooManySelections { .. } => "too_many_selections",
            AnswerShapeError::UnknownOption(_) => "unknown_option",
            AnswerShapeError::DuplicateOption(_) => "duplicate_option",
            AnswerShapeError::MissingRank(_) => "missing_rank",
            AnswerShapeError::IncompleteRanking { .. } => "incomplete_ranking",
            AnswerShapeError::RankSequence { .. } => "rank_sequence",
        }
    }
}

/// Errors surfaced by survey operations that touch configuration or storage.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("survey configuration has {} problem(s): {}", .0.len(), summarize(.0))]
    InvalidConfiguration(Vec<ConfigurationError>),
    #[error("question '{0}' does not exist")]
    UnknownQuestion(String),
    #[error("question '{0}' does not accept answers")]
    NotAnswerable(String),
    #[error("invalid answer for '{question}': {source}")]
    AnswerShape {
        question: String,
        #[source]
        source: AnswerShapeError,
    },
}

fn summarize(errors: &[ConfigurationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

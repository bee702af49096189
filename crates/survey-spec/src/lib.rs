#![allow(missing_docs)]

pub mod answers;
pub mod authoring;
pub mod condition;
pub mod error;
pub mod export;
pub mod matrix;
pub mod payload;
pub mod progress;
pub mod render;
pub mod spec;
pub mod store;
pub mod validate;
pub mod visibility;

pub use answers::{
    AnswerLookup, AnswerValue, Response, Selection, ValidationError, ValidationResult,
};
pub use authoring::{AuthoringPolicy, RangePolicy, check_survey, ensure_valid};
pub use condition::{Observed, condition_met, is_visible};
pub use error::{AnswerShapeError, ConfigurationError, SurveyError};
pub use export::{ExportCell, export_cells, shown_to};
pub use matrix::{MatrixGroup, effective_options, matrix_groups, rows_of};
pub use payload::{ClientPayload, ClientQuestion, HIDDEN_CLASS, build_client_payload};
pub use progress::{Completion, completion};
pub use render::{
    RenderPayload, RenderQuestion, RenderStatus, build_render_payload, render_json_ui, render_text,
};
pub use spec::{
    Capability, ChoiceOption, ConditionKind, ConditionSpec, Constraint, LogicType, Operator,
    QuestionSpec, QuestionType, ScaleBounds, SurveySpec,
};
pub use store::ResponseStore;
pub use validate::{check_answer, validate_answer, validate_response};
pub use visibility::{VisibilityMap, question_visible, resolve_visibility, visible_questions};

/// JSON schema of the survey definition format.
pub fn survey_schema() -> serde_json::Value {
    schemars::schema_for!(SurveySpec).to_value()
}

pub mod condition;
pub mod question;
pub mod survey;

pub use condition::{ConditionKind, ConditionSpec, LogicType, Operator};
pub use question::{
    Capability, ChoiceOption, Constraint, DEFAULT_SCALE, QuestionSpec, QuestionType, ScaleBounds,
};
pub use survey::SurveySpec;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Comparator applied between an observed scale value and a configured operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    #[serde(alias = "<")]
    LessThan,
    #[serde(alias = ">")]
    GreaterThan,
    #[serde(alias = "==")]
    EqualTo,
    #[serde(alias = ">=")]
    GreaterThanOrEqual,
    #[serde(alias = "<=")]
    LessThanOrEqual,
}

impl Operator {
    /// Exact comparison; `EqualTo` does not tolerate floating point noise.
    pub fn compare(self, observed: f64, operand: f64) -> bool {
        match self {
            Operator::LessThan => observed < operand,
            Operator::GreaterThan => observed > operand,
            Operator::EqualTo => observed == operand,
            Operator::GreaterThanOrEqual => observed >= operand,
            Operator::LessThanOrEqual => observed <= operand,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::EqualTo => "==",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThanOrEqual => "<=",
        }
    }
}

/// How the one or two configured comparisons combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogicType {
    #[default]
    Single,
    And,
    Or,
    /// Evaluated as AND of both comparisons; authoring restricts the operators.
    Range,
}

impl LogicType {
    pub fn uses_second_comparison(self) -> bool {
        !matches!(self, LogicType::Single)
    }
}

/// What kind of parent answer the condition observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// Numeric answer of a scale parent.
    Scale,
    /// Selected option ids of a choice parent.
    Option,
}

/// Visibility rule of a conditional question.
///
/// Comparisons are optional so that half-authored rules can be represented;
/// an incomplete rule is rejected by [`crate::authoring::check_survey`] and
/// never met at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConditionSpec {
    /// Id of the question whose answer drives this rule.
    pub parent: String,
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    #[serde(default)]
    pub logic: LogicType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_operator: Option<Operator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_value: Option<f64>,
    /// Parent options whose selection activates an option rule.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trigger_options: Vec<String>,
    #[serde(default = "default_show_if_met")]
    pub show_if_met: bool,
}

fn default_show_if_met() -> bool {
    true
}

impl ConditionSpec {
    pub fn scale(parent: impl Into<String>, operator: Operator, value: f64) -> Self {
        Self {
            parent: parent.into(),
            kind: ConditionKind::Scale,
            logic: LogicType::Single,
            operator: Some(operator),
            value: Some(value),
            second_operator: None,
            second_value: None,
            trigger_options: Vec::new(),
            show_if_met: true,
        }
    }

    pub fn compound(
        parent: impl Into<String>,
        logic: LogicType,
        first: (Operator, f64),
        second: (Operator, f64),
    ) -> Self {
        Self {
            logic,
            second_operator: Some(second.0),
            second_value: Some(second.1),
            ..Self::scale(parent, first.0, first.1)
        }
    }

    pub fn options<I, S>(parent: impl Into<String>, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parent: parent.into(),
            kind: ConditionKind::Option,
            logic: LogicType::Single,
            operator: None,
            value: None,
            second_operator: None,
            second_value: None,
            trigger_options: triggers.into_iter().map(Into::into).collect(),
            show_if_met: true,
        }
    }

    pub fn hide_when_met(mut self) -> Self {
        self.show_if_met = false;
        self
    }

    pub fn first_comparison(&self) -> Option<(Operator, f64)> {
        Some((self.operator?, self.value?))
    }

    pub fn second_comparison(&self) -> Option<(Operator, f64)> {
        Some((self.second_operator?, self.second_value?))
    }

    /// Every configured operand, for scale-range checks.
    pub fn operands(&self) -> impl Iterator<Item = f64> + '_ {
        self.value.into_iter().chain(self.second_value)
    }
}

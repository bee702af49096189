use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use survey_spec::{
    AnswerValue, AuthoringPolicy, ClientPayload, RangePolicy, Response, SurveyError, SurveySpec,
    build_client_payload, build_render_payload, check_answer, completion, ensure_valid,
    render_json_ui as spec_render_json_ui, validate_response,
};

pub mod mirror;

#[cfg(target_arch = "wasm32")]
mod component;

pub use mirror::{ClientMirror, DomPatch};

const DEFAULT_SURVEY: &str = include_str!("../../survey-spec/tests/fixtures/customer_feedback.json");

#[derive(Debug, Error)]
enum ComponentError {
    #[error("failed to parse config/{0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("failed to parse answers: {0}")]
    AnswersParse(#[source] serde_json::Error),
    #[error("failed to parse client payload: {0}")]
    PayloadParse(#[source] serde_json::Error),
    #[error("survey '{0}' is not available")]
    SurveyUnavailable(String),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
    #[error(transparent)]
    Survey(#[from] SurveyError),
}

#[derive(Debug, Deserialize, Serialize, Default)]
struct ComponentConfig {
    #[serde(default)]
    survey_json: Option<String>,
    #[serde(default)]
    range_policy: RangePolicy,
}

impl ComponentConfig {
    fn parse(config_json: &str) -> Result<Self, ComponentError> {
        if config_json.trim().is_empty() {
            Ok(Self::default())
        } else {
            serde_json::from_str(config_json).map_err(ComponentError::ConfigParse)
        }
    }

    fn policy(&self) -> AuthoringPolicy {
        AuthoringPolicy {
            range: self.range_policy,
        }
    }
}

fn load_survey(config: &ComponentConfig) -> Result<SurveySpec, ComponentError> {
    let survey_json = config.survey_json.as_deref().unwrap_or(DEFAULT_SURVEY);
    serde_json::from_str(survey_json).map_err(ComponentError::ConfigParse)
}

fn ensure_survey(survey_id: &str, config_json: &str) -> Result<SurveySpec, ComponentError> {
    let config = ComponentConfig::parse(config_json)?;
    let spec = load_survey(&config)?;
    if spec.id != survey_id {
        return Err(ComponentError::SurveyUnavailable(survey_id.to_string()));
    }
    ensure_valid(&spec, &config.policy())?;
    Ok(spec)
}

fn parse_answers(answers_json: &str) -> Result<BTreeMap<String, AnswerValue>, ComponentError> {
    if answers_json.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(answers_json).map_err(ComponentError::AnswersParse)
}

fn parse_payload(payload_json: &str) -> Result<ClientPayload, ComponentError> {
    serde_json::from_str(payload_json).map_err(ComponentError::PayloadParse)
}

fn response_from(answers: BTreeMap<String, AnswerValue>) -> Response {
    Response {
        answers,
        ..Response::default()
    }
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value, ComponentError> {
    serde_json::to_value(value).map_err(ComponentError::JsonEncode)
}

/// Survey definition after authoring checks.
pub fn describe(survey_id: &str, config_json: &str) -> String {
    respond(ensure_survey(survey_id, config_json).and_then(|spec| encode(&spec)))
}

/// Bootstrap payload the browser mirror is created from.
pub fn client_payload(survey_id: &str, config_json: &str) -> String {
    respond(ensure_survey(survey_id, config_json).and_then(|spec| encode(&build_client_payload(&spec))))
}

/// Visibility per question id computed from a client payload.
pub fn visibility(payload_json: &str, answers_json: &str) -> String {
    respond(parse_payload(payload_json).and_then(|payload| {
        let answers = parse_answers(answers_json)?;
        encode(&payload.visibility(&answers))
    }))
}

/// Initial DOM patches for every question.
pub fn bootstrap(payload_json: &str, answers_json: &str) -> String {
    respond(parse_payload(payload_json).and_then(|payload| {
        let answers = parse_answers(answers_json)?;
        let mut mirror = ClientMirror::new(payload);
        let patches = mirror.bootstrap(answers);
        encode(&patches)
    }))
}

/// Applies one input change on top of the current answers. A `null` value
/// clears the answer. Returns the new answers and the patches to apply.
pub fn apply_change(
    payload_json: &str,
    answers_json: &str,
    question_id: &str,
    value_json: &str,
) -> String {
    respond(parse_payload(payload_json).and_then(|payload| {
        let answers = parse_answers(answers_json)?;
        let value: Option<AnswerValue> =
            serde_json::from_str(value_json).map_err(ComponentError::AnswersParse)?;
        let mut mirror = ClientMirror::new(payload);
        mirror.bootstrap(answers);
        let patches = mirror.apply_change(question_id, value);
        Ok(json!({
            "answers": encode(mirror.answers())?,
            "patches": encode(&patches)?,
        }))
    }))
}

/// Server-side completion for the given answers.
pub fn progress(survey_id: &str, config_json: &str, answers_json: &str) -> String {
    respond(ensure_survey(survey_id, config_json).and_then(|spec| {
        let response = response_from(parse_answers(answers_json)?);
        encode(&completion(&spec, &response))
    }))
}

/// Save-time check for a single answer.
pub fn validate_answer(
    survey_id: &str,
    config_json: &str,
    question_id: &str,
    value_json: &str,
) -> String {
    respond(ensure_survey(survey_id, config_json).and_then(|spec| {
        let value: AnswerValue =
            serde_json::from_str(value_json).map_err(ComponentError::AnswersParse)?;
        Ok(match check_answer(&spec, question_id, &value) {
            Ok(()) => json!({ "valid": true }),
            Err(SurveyError::AnswerShape { question, source }) => json!({
                "valid": false,
                "error": survey_spec::validate::field_error(&question, &source),
            }),
            Err(other) => return Err(other.into()),
        })
    }))
}

/// Whole-response validation against the visible set.
pub fn validate_answers(survey_id: &str, config_json: &str, answers_json: &str) -> String {
    respond(ensure_survey(survey_id, config_json).and_then(|spec| {
        let response = response_from(parse_answers(answers_json)?);
        encode(&validate_response(&spec, &response))
    }))
}

/// Structured progress report for renderers.
pub fn render_json_ui(survey_id: &str, config_json: &str, answers_json: &str) -> String {
    respond(ensure_survey(survey_id, config_json).and_then(|spec| {
        let response = response_from(parse_answers(answers_json)?);
        Ok(spec_render_json_ui(&build_render_payload(&spec, &response)))
    }))
}

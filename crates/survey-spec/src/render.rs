use serde_json::{Map, Value, json};

use crate::{
    answers::{AnswerValue, Response},
    matrix::{effective_options, row_label},
    payload::{HIDDEN_CLASS, container_id},
    progress::{Completion, completion},
    spec::{
        question::{ChoiceOption, QuestionType},
        survey::SurveySpec,
    },
    visibility::resolve_visibility,
};

/// Status labels returned by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// Visible questions are still unanswered.
    NeedInput,
    /// Every visible question has an answer.
    Complete,
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::NeedInput => "need_input",
            RenderStatus::Complete => "complete",
        }
    }
}

/// Describes a single presentable question for render outputs.
#[derive(Debug, Clone)]
pub struct RenderQuestion {
    pub id: String,
    pub container_id: String,
    pub title: String,
    pub row_text: Option<String>,
    pub kind: QuestionType,
    pub required: bool,
    pub visible: bool,
    pub current_value: Option<AnswerValue>,
    pub options: Vec<ChoiceOption>,
}

impl RenderQuestion {
    /// Native `required` attribute: never set while the question is hidden.
    pub fn required_attribute(&self) -> bool {
        self.required && self.visible
    }
}

/// Collected payload used by both text and JSON renderers.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub survey_id: String,
    pub survey_title: String,
    pub survey_version: String,
    pub status: RenderStatus,
    pub completion: Completion,
    pub questions: Vec<RenderQuestion>,
}

/// Build the renderer payload from the survey and the live response.
pub fn build_render_payload(spec: &SurveySpec, response: &Response) -> RenderPayload {
    let visibility = resolve_visibility(spec, response);
    let completion = completion(spec, response);

    let questions = spec
        .presentable_questions()
        .map(|question| RenderQuestion {
            id: question.id.clone(),
            container_id: container_id(&question.id),
            title: question.title.clone(),
            row_text: question
                .matrix_parent
                .as_ref()
                .map(|_| row_label(question).to_string()),
            kind: question.kind,
            required: question.required,
            visible: visibility.get(&question.id).copied().unwrap_or(false),
            current_value: response.answers.get(&question.id).cloned(),
            options: effective_options(spec, question).to_vec(),
        })
        .collect::<Vec<_>>();

    let status = if completion.is_complete() {
        RenderStatus::Complete
    } else {
        RenderStatus::NeedInput
    };

    RenderPayload {
        survey_id: spec.id.clone(),
        survey_title: spec.title.clone(),
        survey_version: spec.version.clone(),
        status,
        completion,
        questions,
    }
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json_ui(payload: &RenderPayload) -> Value {
    let questions = payload
        .questions
        .iter()
        .map(|question| {
            let mut map = Map::new();
            map.insert("id".into(), Value::String(question.id.clone()));
            map.insert(
                "container_id".into(),
                Value::String(question.container_id.clone()),
            );
            map.insert("title".into(), Value::String(question.title.clone()));
            if let Some(row_text) = &question.row_text {
                map.insert("row_text".into(), Value::String(row_text.clone()));
            }
            map.insert("type".into(), Value::String(question.kind.as_str().into()));
            map.insert("required".into(), Value::Bool(question.required_attribute()));
            map.insert("visible".into(), Value::Bool(question.visible));
            if !question.visible {
                map.insert("class".into(), Value::String(HIDDEN_CLASS.into()));
            }
            if let Some(current_value) = &question.current_value {
                map.insert("current_value".into(), json!(current_value));
            }
            if !question.options.is_empty() {
                let options = question
                    .options
                    .iter()
                    .map(|option| json!({ "id": option.id, "label": option.label }))
                    .collect();
                map.insert("options".into(), Value::Array(options));
            }
            Value::Object(map)
        })
        .collect::<Vec<_>>();

    json!({
        "survey_id": payload.survey_id,
        "survey_title": payload.survey_title,
        "survey_version": payload.survey_version,
        "status": payload.status.as_str(),
        "next_question_id": payload.completion.next_question,
        "progress": {
            "answered": payload.completion.answered,
            "total": payload.completion.total,
            "percentage": payload.completion.percentage,
            "unanswered": payload.completion.unanswered,
        },
        "questions": questions,
    })
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &RenderPayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Survey: {} ({})",
        payload.survey_title, payload.survey_id
    ));
    lines.push(format!(
        "Status: {} ({}/{}, {}%)",
        payload.status.as_str(),
        payload.completion.answered,
        payload.completion.total,
        payload.completion.percentage
    ));

    match &payload.completion.next_question {
        Some(next) => lines.push(format!("Next question: {}", next)),
        None => lines.push("All visible questions are answered.".to_string()),
    }

    lines.push("Visible questions:".to_string());
    for question in payload.questions.iter().filter(|question| question.visible) {
        let label = question.row_text.as_deref().unwrap_or(&question.title);
        let mut entry = format!(" - {} ({})", question.id, label);
        if question.required {
            entry.push_str(" [required]");
        }
        if let Some(current_value) = &question.current_value {
            entry.push_str(&format!(" = {}", current_value.display()));
        }
        lines.push(entry);
    }

    let hidden: Vec<&str> = payload
        .questions
        .iter()
        .filter(|question| !question.visible)
        .map(|question| question.id.as_str())
        .collect();
    if !hidden.is_empty() {
        lines.push(format!("Hidden questions: {}", hidden.join(", ")));
    }

    lines.join("\n")
}

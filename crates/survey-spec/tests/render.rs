use survey_spec::{
    AnswerValue, HIDDEN_CLASS, Response, SurveySpec,
    render::{RenderStatus, build_render_payload, render_json_ui, render_text},
};

fn fixture() -> SurveySpec {
    serde_json::from_str(include_str!("fixtures/customer_feedback.json")).expect("fixture")
}

#[test]
fn render_text_lists_visible_and_hidden() {
    let spec = fixture();
    let payload = build_render_payload(&spec, &Response::default());
    assert_eq!(payload.status, RenderStatus::NeedInput);

    let text = render_text(&payload);
    assert!(text.contains("Next question: name"));
    assert!(text.contains("Visible questions"));
    assert!(text.contains("service-speed (Speed of delivery)"));
    assert!(text.contains("Hidden questions: what-went-wrong, digital-rating"));
}

#[test]
fn render_json_ui_disables_required_on_hidden_questions() {
    let spec = fixture();
    let response = Response::default().with_answer("satisfaction", AnswerValue::Number(9.0));
    let ui = render_json_ui(&build_render_payload(&spec, &response));

    assert_eq!(ui["survey_id"], "customer-feedback");
    let questions = ui["questions"].as_array().expect("questions array");
    assert!(questions.iter().all(|question| question["id"] != "service"));

    let wrong = questions
        .iter()
        .find(|question| question["id"] == "what-went-wrong")
        .expect("what-went-wrong");
    assert_eq!(wrong["visible"], false);
    assert_eq!(wrong["required"], false);
    assert_eq!(wrong["class"], HIDDEN_CLASS);
    assert_eq!(wrong["container_id"], "question-what-went-wrong");

    let support = questions
        .iter()
        .find(|question| question["id"] == "service-support")
        .expect("service-support");
    assert_eq!(support["required"], true);
    assert_eq!(support["options"].as_array().map(Vec::len), Some(3));
}

#[test]
fn render_reports_complete_when_visible_set_answered() {
    let spec = fixture();
    let response = Response::default()
        .with_answer("name", AnswerValue::Text("Kim".into()))
        .with_answer("satisfaction", AnswerValue::Number(9.0))
        .with_answer("channel", AnswerValue::choose(["store"]))
        .with_answer("service-speed", AnswerValue::choose(["fair"]))
        .with_answer("service-support", AnswerValue::choose(["good"]))
        .with_answer("priorities", AnswerValue::choose(["price"]));
    let payload = build_render_payload(&spec, &response);
    assert_eq!(payload.status, RenderStatus::Complete);
    let ui = render_json_ui(&payload);
    assert_eq!(ui["progress"]["percentage"], 100.0);
    assert!(ui["next_question_id"].is_null());
}

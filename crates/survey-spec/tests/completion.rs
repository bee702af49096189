use survey_spec::{
    AnswerValue, ConditionSpec, Operator, QuestionSpec, QuestionType, Response, ResponseStore,
    Selection, SurveySpec, completion, validate_response, visible_questions,
};

fn fixture() -> SurveySpec {
    serde_json::from_str(include_str!("fixtures/customer_feedback.json")).expect("fixture")
}

fn low_score_survey() -> SurveySpec {
    let mut child = QuestionSpec::new("child", "Why low?", QuestionType::Text);
    child.required = true;
    child.position = 2;
    child.condition = Some(ConditionSpec::scale(
        "parent",
        Operator::LessThanOrEqual,
        5.0,
    ));
    let mut parent = QuestionSpec::new("parent", "Score", QuestionType::Scale);
    parent.position = 1;
    let mut other = QuestionSpec::new("other", "Anything else?", QuestionType::Text);
    other.position = 3;
    SurveySpec::new("low", "Low score")
        .with_question(parent)
        .with_question(child)
        .with_question(other)
}

#[test]
fn hidden_required_question_does_not_block_completion() {
    let spec = low_score_survey();
    let response = Response::new("r1", "p1")
        .with_answer("parent", AnswerValue::Number(8.0))
        .with_answer("other", AnswerValue::Text("no".into()));

    let result = completion(&spec, &response);
    assert_eq!(result.total, 2);
    assert_eq!(result.answered, 2);
    assert_eq!(result.percentage, 100.0);
    assert!(result.unanswered.is_empty());

    let validation = validate_response(&spec, &response);
    assert!(validation.valid, "{validation:?}");
}

#[test]
fn hiding_an_answered_child_keeps_its_answer_but_drops_it_from_progress() {
    let spec = low_score_survey();
    let mut store = ResponseStore::new();
    store
        .upsert_answer(&spec, "p1", "parent", AnswerValue::Number(3.0))
        .unwrap();
    store
        .upsert_answer(&spec, "p1", "child", AnswerValue::Text("slow".into()))
        .unwrap();

    let before = completion(&spec, store.response("p1").unwrap());
    assert_eq!((before.answered, before.total), (2, 3));
    assert_eq!(before.percentage, 66.67);
    assert_eq!(before.unanswered, vec!["other"]);

    store
        .upsert_answer(&spec, "p1", "parent", AnswerValue::Number(9.0))
        .unwrap();
    store
        .upsert_answer(&spec, "p1", "other", AnswerValue::Text("fine".into()))
        .unwrap();

    let after = completion(&spec, store.response("p1").unwrap());
    assert_eq!((after.answered, after.total), (2, 2));
    assert_eq!(after.percentage, 100.0);
    assert_eq!(
        store.answer("p1", "child"),
        Some(&AnswerValue::Text("slow".into()))
    );

    let validation = validate_response(&spec, store.response("p1").unwrap());
    assert!(validation.valid);
    assert!(validation.unknown_fields.is_empty());
}

#[test]
fn zero_visible_questions_is_complete() {
    let mut only_child = QuestionSpec::new("child", "Child", QuestionType::Text);
    only_child.condition = Some(ConditionSpec::scale("gone", Operator::EqualTo, 1.0));
    let spec = SurveySpec::new("empty", "Empty").with_question(only_child);
    let result = completion(&spec, &Response::default());
    assert_eq!(result.total, 0);
    assert_eq!(result.percentage, 100.0);
}

#[test]
fn fixture_progress_follows_answers() {
    let spec = fixture();
    let empty = Response::default();
    let ids: Vec<&str> = visible_questions(&spec, &empty)
        .iter()
        .map(|question| question.id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec![
            "name",
            "satisfaction",
            "channel",
            "service-speed",
            "service-support",
            "priorities"
        ]
    );
    let result = completion(&spec, &empty);
    assert_eq!(result.percentage, 0.0);
    assert_eq!(result.next_question.as_deref(), Some("name"));

    let response = Response::default()
        .with_answer("name", AnswerValue::Text("Kim".into()))
        .with_answer("satisfaction", AnswerValue::Number(4.0))
        .with_answer("channel", AnswerValue::choose(["app"]));
    let result = completion(&spec, &response);
    assert_eq!(result.total, 8);
    assert_eq!(result.answered, 3);
    assert_eq!(result.percentage, 37.5);
    assert_eq!(
        result.unanswered,
        vec![
            "what-went-wrong",
            "digital-rating",
            "service-speed",
            "service-support",
            "priorities"
        ]
    );
}

#[test]
fn fixture_validation_reports_only_visible_required() {
    let spec = fixture();
    let result = validate_response(&spec, &Response::default());
    assert!(!result.valid);
    assert_eq!(result.missing_required, vec!["satisfaction", "service-support"]);

    let response = Response::default()
        .with_answer("satisfaction", AnswerValue::Number(2.0))
        .with_answer("service-support", AnswerValue::choose(["good"]))
        .with_answer(
            "priorities",
            AnswerValue::Selections(vec![
                Selection::ranked("price", 1),
                Selection::ranked("quality", 2),
                Selection::ranked("speed", 2),
            ]),
        )
        .with_answer("service", AnswerValue::choose(["good"]));
    let result = validate_response(&spec, &response);
    assert_eq!(result.missing_required, vec!["what-went-wrong"]);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].question_id.as_deref(), Some("priorities"));
    assert_eq!(result.errors[0].code.as_deref(), Some("rank_sequence"));
    assert_eq!(result.unknown_fields, vec!["service"]);
}

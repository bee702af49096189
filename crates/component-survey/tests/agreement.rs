use std::collections::BTreeMap;

use proptest::prelude::*;
use serde::Deserialize;

use component_survey::ClientMirror;
use survey_spec::{
    AnswerValue, ClientPayload, ClientQuestion, ConditionSpec, LogicType, Operator, Response,
    SurveySpec, build_client_payload, resolve_visibility,
};

#[derive(Debug, Deserialize)]
struct Corpus {
    cases: Vec<Case>,
}

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    condition: ConditionSpec,
    #[serde(default)]
    parent_answer: Option<AnswerValue>,
    visible: bool,
}

const CORPUS: &str = include_str!("../../survey-spec/tests/fixtures/condition_corpus.json");
const FEEDBACK: &str = include_str!("../../survey-spec/tests/fixtures/customer_feedback.json");

/// Payload written by hand, the way a renderer would serialize it, rather than
/// derived from a survey.
fn hand_payload(condition: &ConditionSpec) -> ClientPayload {
    ClientPayload {
        survey_id: "corpus".into(),
        hidden_class: survey_spec::HIDDEN_CLASS.into(),
        questions: vec![
            ClientQuestion {
                id: "parent".into(),
                container_id: "question-parent".into(),
                required: false,
                condition: None,
            },
            ClientQuestion {
                id: "child".into(),
                container_id: "question-child".into(),
                required: true,
                condition: Some(condition.clone()),
            },
        ],
    }
}

#[test]
fn mirror_matches_corpus() {
    let corpus: Corpus = serde_json::from_str(CORPUS).expect("corpus");
    for case in corpus.cases {
        let mut mirror = ClientMirror::new(hand_payload(&case.condition));
        let answers = case
            .parent_answer
            .clone()
            .map(|answer| BTreeMap::from([("parent".to_string(), answer)]))
            .unwrap_or_default();
        let patches = mirror.bootstrap(answers);
        let child = patches
            .iter()
            .find(|patch| patch.question_id == "child")
            .expect("child patch");
        assert_eq!(!child.hidden, case.visible, "case {}", case.name);
        assert_eq!(child.required, case.visible, "case {}", case.name);
    }
}

#[test]
fn mirror_incremental_changes_match_corpus() {
    let corpus: Corpus = serde_json::from_str(CORPUS).expect("corpus");
    for case in corpus.cases {
        let mut mirror = ClientMirror::new(hand_payload(&case.condition));
        mirror.bootstrap(BTreeMap::new());
        mirror.apply_change("parent", case.parent_answer.clone());
        assert_eq!(mirror.is_visible("child"), case.visible, "case {}", case.name);
    }
}

fn operator() -> impl Strategy<Value = Operator> {
    prop_oneof![
        Just(Operator::LessThan),
        Just(Operator::GreaterThan),
        Just(Operator::EqualTo),
        Just(Operator::GreaterThanOrEqual),
        Just(Operator::LessThanOrEqual),
    ]
}

fn logic() -> impl Strategy<Value = LogicType> {
    prop_oneof![
        Just(LogicType::Single),
        Just(LogicType::And),
        Just(LogicType::Or),
        Just(LogicType::Range),
    ]
}

fn scale_condition() -> impl Strategy<Value = ConditionSpec> {
    (
        logic(),
        operator(),
        1u8..=10,
        operator(),
        1u8..=10,
        any::<bool>(),
    )
        .prop_map(|(logic, first_op, first, second_op, second, show)| {
            let mut condition = ConditionSpec::compound(
                "parent",
                logic,
                (first_op, f64::from(first)),
                (second_op, f64::from(second)),
            );
            condition.show_if_met = show;
            condition
        })
}

fn option_condition() -> impl Strategy<Value = ConditionSpec> {
    (
        proptest::sample::subsequence(vec!["a", "b", "c", "d"], 0..=4),
        any::<bool>(),
    )
        .prop_map(|(triggers, show)| {
            let mut condition = ConditionSpec::options("parent", triggers);
            condition.show_if_met = show;
            condition
        })
}

fn parent_answer() -> impl Strategy<Value = Option<AnswerValue>> {
    prop_oneof![
        Just(None),
        (0u8..=11).prop_map(|value| Some(AnswerValue::Number(f64::from(value)))),
        proptest::sample::subsequence(vec!["a", "b", "c", "d"], 0..=4)
            .prop_map(|picked| Some(AnswerValue::choose(picked))),
        Just(Some(AnswerValue::Text("5".into()))),
        any::<bool>().prop_map(|flag| Some(AnswerValue::Boolean(flag))),
    ]
}

fn survey_with(condition: &ConditionSpec) -> SurveySpec {
    let mut spec: SurveySpec = serde_json::from_value(serde_json::json!({
        "id": "prop",
        "title": "Prop",
        "questions": [
            {
                "id": "parent",
                "title": "Parent",
                "type": "multiple_choice",
                "options": [
                    { "id": "a", "label": "A" },
                    { "id": "b", "label": "B" },
                    { "id": "c", "label": "C" },
                    { "id": "d", "label": "D" }
                ]
            },
            { "id": "child", "title": "Child", "type": "text", "required": true }
        ]
    }))
    .expect("survey");
    spec.questions[1].condition = Some(condition.clone());
    spec
}

proptest! {
    #[test]
    fn server_and_mirror_agree(
        condition in prop_oneof![scale_condition(), option_condition()],
        answer in parent_answer(),
    ) {
        let spec = survey_with(&condition);
        let mut response = Response::default();
        if let Some(answer) = answer.clone() {
            response.upsert("parent", answer);
        }
        let server = resolve_visibility(&spec, &response);

        let mut mirror = ClientMirror::new(build_client_payload(&spec));
        mirror.bootstrap(BTreeMap::new());
        mirror.apply_change("parent", answer);

        prop_assert_eq!(&server, mirror.visibility());

        let mut hand = ClientMirror::new(hand_payload(&condition));
        hand.bootstrap(response.answers.clone());
        prop_assert_eq!(&server, hand.visibility());
    }

    #[test]
    fn changing_answers_never_diverges(
        values in proptest::collection::vec(0u8..=11, 1..8),
    ) {
        let spec: SurveySpec = serde_json::from_str(FEEDBACK).expect("fixture");
        let mut mirror = ClientMirror::new(build_client_payload(&spec));
        mirror.bootstrap(BTreeMap::new());
        let mut response = Response::default();
        for value in values {
            let answer = AnswerValue::Number(f64::from(value));
            mirror.apply_change("satisfaction", Some(answer.clone()));
            response.upsert("satisfaction", answer);
            prop_assert_eq!(&resolve_visibility(&spec, &response), mirror.visibility());
        }
    }
}

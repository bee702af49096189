use survey_spec::{
    AuthoringPolicy, ConfigurationError, RangePolicy, SurveySpec, check_survey, ensure_valid,
    survey_schema,
};

fn fixture() -> SurveySpec {
    serde_json::from_str(include_str!("fixtures/customer_feedback.json")).expect("fixture")
}

#[test]
fn fixture_passes_authoring_checks() {
    let spec = fixture();
    assert!(ensure_valid(&spec, &AuthoringPolicy::default()).is_ok());
}

#[test]
fn chained_condition_in_fixture_is_rejected() {
    let mut spec = fixture();
    let digital = spec
        .questions
        .iter_mut()
        .find(|question| question.id == "digital-rating")
        .expect("digital-rating");
    let mut chained = digital.condition.clone().expect("condition");
    chained.parent = "what-went-wrong".into();
    digital.condition = Some(chained);

    let errors = check_survey(&spec, &AuthoringPolicy::default());
    assert!(errors.iter().any(|error| matches!(
        error,
        ConfigurationError::ChainedParent { question, .. } if question == "digital-rating"
    )));
}

#[test]
fn range_policy_deserializes_from_config() {
    let policy: AuthoringPolicy =
        serde_json::from_str(r#"{ "range": "generic_and" }"#).expect("policy");
    assert_eq!(policy.range, RangePolicy::GenericAnd);
    let policy: AuthoringPolicy = serde_json::from_str("{}").expect("policy");
    assert_eq!(policy.range, RangePolicy::Strict);
}

#[test]
fn schema_describes_questions() {
    let schema = survey_schema();
    let text = schema.to_string();
    assert!(text.contains("questions"));
    assert!(text.contains("matrix_parent"));
}

//! WebAssembly component export; the browser runs the same evaluator as the server.

wit_bindgen::generate!({
    world: "mirror",
    path: "wit",
});

struct Mirror;

impl Guest for Mirror {
    fn describe(survey_id: String, config_json: String) -> String {
        crate::describe(&survey_id, &config_json)
    }

    fn client_payload(survey_id: String, config_json: String) -> String {
        crate::client_payload(&survey_id, &config_json)
    }

    fn visibility(payload_json: String, answers_json: String) -> String {
        crate::visibility(&payload_json, &answers_json)
    }

    fn bootstrap(payload_json: String, answers_json: String) -> String {
        crate::bootstrap(&payload_json, &answers_json)
    }

    fn apply_change(
        payload_json: String,
        answers_json: String,
        question_id: String,
        value_json: String,
    ) -> String {
        crate::apply_change(&payload_json, &answers_json, &question_id, &value_json)
    }

    fn progress(survey_id: String, config_json: String, answers_json: String) -> String {
        crate::progress(&survey_id, &config_json, &answers_json)
    }

    fn validate_answer(
        survey_id: String,
        config_json: String,
        question_id: String,
        value_json: String,
    ) -> String {
        crate::validate_answer(&survey_id, &config_json, &question_id, &value_json)
    }

    fn validate_answers(survey_id: String, config_json: String, answers_json: String) -> String {
        crate::validate_answers(&survey_id, &config_json, &answers_json)
    }

    fn render_json_ui(survey_id: String, config_json: String, answers_json: String) -> String {
        crate::render_json_ui(&survey_id, &config_json, &answers_json)
    }
}

export!(Mirror);

mod logging;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use component_survey::ClientMirror;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use survey_spec::{
    AuthoringPolicy, ExportCell, RangePolicy, Response, SurveySpec, ValidationResult,
    build_client_payload, build_render_payload, check_survey, export_cells, render_json_ui,
    render_text, resolve_visibility, survey_schema, validate_response,
};
use tracing::{debug, info, warn};

use logging::{LogConfig, init_logging};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Survey logic checker",
    long_about = "Checks survey definitions and evaluates conditional visibility, progress and validation for a response"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides it.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// How strictly `range` conditions are checked when loading a survey.
    #[arg(long, value_enum, default_value_t = CliRangePolicy::Strict, global = true)]
    range_policy: CliRangePolicy,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum CliRangePolicy {
    Strict,
    GenericAnd,
}

impl From<CliRangePolicy> for RangePolicy {
    fn from(value: CliRangePolicy) -> Self {
        match value {
            CliRangePolicy::Strict => RangePolicy::Strict,
            CliRangePolicy::GenericAnd => RangePolicy::GenericAnd,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Report every configuration problem in a survey definition.
    Check {
        /// Path to the survey JSON.
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
    },
    /// Show which questions are visible for a response.
    Visibility {
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
        /// Response JSON (a full response or a bare answer map). Empty when omitted.
        #[arg(long, value_name = "RESPONSE")]
        response: Option<PathBuf>,
    },
    /// Completion percentage and next unanswered question.
    Progress {
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
        #[arg(long, value_name = "RESPONSE")]
        response: Option<PathBuf>,
    },
    /// Emit the client bootstrap payload, plus initial DOM patches when a response is given.
    Payload {
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
        #[arg(long, value_name = "RESPONSE")]
        response: Option<PathBuf>,
    },
    /// Validate a response against the survey.
    Validate {
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
        #[arg(long, value_name = "RESPONSE")]
        response: PathBuf,
    },
    /// Export cells: hidden questions stay blank even when a stale answer exists.
    Shown {
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
        #[arg(long, value_name = "RESPONSE")]
        response: PathBuf,
    },
    /// Print the JSON schema of the survey definition format.
    Schema,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose))?;

    let policy = AuthoringPolicy {
        range: cli.range_policy.into(),
    };
    let format = cli.format;
    match cli.command {
        Command::Check { survey } => run_check(&survey, &policy, format),
        Command::Visibility { survey, response } => {
            run_visibility(&survey, response.as_deref(), &policy, format)
        }
        Command::Progress { survey, response } => {
            run_progress(&survey, response.as_deref(), &policy, format)
        }
        Command::Payload { survey, response } => {
            run_payload(&survey, response.as_deref(), &policy)
        }
        Command::Validate { survey, response } => {
            run_validate(&survey, &response, &policy, format)
        }
        Command::Shown { survey, response } => run_shown(&survey, &response, &policy, format),
        Command::Schema => print_json(&survey_schema()),
    }
}

fn read_survey(path: &Path) -> CliResult<SurveySpec> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read survey {}: {err}", path.display()))?;
    let spec: SurveySpec = serde_json::from_str(&raw)
        .map_err(|err| format!("failed to parse survey {}: {err}", path.display()))?;
    debug!(survey = %spec.id, questions = spec.questions.len(), "loaded survey");
    Ok(spec)
}

/// Loads a survey and refuses to evaluate it while it has configuration problems.
fn load_survey(path: &Path, policy: &AuthoringPolicy) -> CliResult<SurveySpec> {
    let spec = read_survey(path)?;
    survey_spec::ensure_valid(&spec, policy)?;
    Ok(spec)
}

/// Accepts either a full response object or a bare `{question: answer}` map.
fn load_response(path: Option<&Path>) -> CliResult<Response> {
    let Some(path) = path else {
        return Ok(Response::default());
    };
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read response {}: {err}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)?;
    let response = if value.get("answers").is_some_and(Value::is_object) {
        serde_json::from_value(value)?
    } else {
        Response {
            answers: serde_json::from_value(value)?,
            ..Response::default()
        }
    };
    Ok(response)
}

fn print_json(value: &Value) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_check(path: &Path, policy: &AuthoringPolicy, format: OutputFormat) -> CliResult<()> {
    let spec = read_survey(path)?;
    let problems = check_survey(&spec, policy);
    info!(survey = %spec.id, problems = problems.len(), "checked survey");

    match format {
        OutputFormat::Json => print_json(&json!({
            "survey_id": spec.id,
            "valid": problems.is_empty(),
            "problems": problems.iter().map(ToString::to_string).collect::<Vec<_>>(),
        }))?,
        OutputFormat::Text => {
            if problems.is_empty() {
                println!(
                    "Survey '{}' is valid ({} questions).",
                    spec.id,
                    spec.questions.len()
                );
            } else {
                println!("Survey '{}' has {} problem(s):", spec.id, problems.len());
                for problem in &problems {
                    println!("  - {problem}");
                }
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err("survey configuration is invalid".into())
    }
}

fn run_visibility(
    survey: &Path,
    response: Option<&Path>,
    policy: &AuthoringPolicy,
    format: OutputFormat,
) -> CliResult<()> {
    let spec = load_survey(survey, policy)?;
    let response = load_response(response)?;
    let visibility = resolve_visibility(&spec, &response);
    info!(
        survey = %spec.id,
        visible = visibility.values().filter(|visible| **visible).count(),
        "resolved visibility"
    );

    match format {
        OutputFormat::Json => print_json(&json!(visibility)),
        OutputFormat::Text => {
            for question in spec.presentable_questions() {
                let visible = visibility.get(&question.id).copied().unwrap_or(false);
                println!(
                    "{} {}",
                    if visible { "shown " } else { "hidden" },
                    question.id
                );
            }
            Ok(())
        }
    }
}

fn run_progress(
    survey: &Path,
    response: Option<&Path>,
    policy: &AuthoringPolicy,
    format: OutputFormat,
) -> CliResult<()> {
    let spec = load_survey(survey, policy)?;
    let response = load_response(response)?;
    let payload = build_render_payload(&spec, &response);
    info!(
        survey = %spec.id,
        percentage = payload.completion.percentage,
        "computed progress"
    );
    match format {
        OutputFormat::Json => print_json(&render_json_ui(&payload)),
        OutputFormat::Text => {
            println!("{}", render_text(&payload));
            Ok(())
        }
    }
}

fn run_payload(survey: &Path, response: Option<&Path>, policy: &AuthoringPolicy) -> CliResult<()> {
    let spec = load_survey(survey, policy)?;
    let payload = build_client_payload(&spec);
    if response.is_none() {
        return print_json(&serde_json::to_value(&payload)?);
    }

    let response = load_response(response)?;
    let mut mirror = ClientMirror::new(payload);
    let patches = mirror.bootstrap(response.answers);
    print_json(&json!({
        "payload": mirror.payload(),
        "patches": patches,
    }))
}

fn run_validate(
    survey: &Path,
    response: &Path,
    policy: &AuthoringPolicy,
    format: OutputFormat,
) -> CliResult<()> {
    let spec = load_survey(survey, policy)?;
    let response = load_response(Some(response))?;
    let result = validate_response(&spec, &response);
    if !result.unknown_fields.is_empty() {
        warn!(fields = ?result.unknown_fields, "response carries answers with no visible question");
    }

    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(&result)?)?,
        OutputFormat::Text => {
            println!(
                "Validation result: {}",
                if result.valid { "valid" } else { "invalid" }
            );
            describe_validation(&result);
        }
    }

    if result.valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn describe_validation(result: &ValidationResult) {
    if !result.errors.is_empty() {
        println!("Errors:");
        for error in &result.errors {
            println!(
                "  {} - {}",
                error.path.as_deref().unwrap_or("<unknown>"),
                error.message
            );
        }
    }
    if !result.missing_required.is_empty() {
        println!(
            "Missing required answers: {}",
            result.missing_required.join(", ")
        );
    }
    if !result.unknown_fields.is_empty() {
        println!(
            "Unknown answer fields: {}",
            result.unknown_fields.join(", ")
        );
    }
}

fn run_shown(
    survey: &Path,
    response: &Path,
    policy: &AuthoringPolicy,
    format: OutputFormat,
) -> CliResult<()> {
    let spec = load_survey(survey, policy)?;
    let response = load_response(Some(response))?;
    let cells = export_cells(&spec, &response);

    match format {
        OutputFormat::Json => {
            let row = cells
                .iter()
                .map(|(id, cell)| (id.clone(), json!(cell)))
                .collect::<serde_json::Map<_, _>>();
            print_json(&Value::Object(row))
        }
        OutputFormat::Text => {
            for (id, cell) in &cells {
                let text = match cell {
                    ExportCell::Hidden => "(hidden)".to_string(),
                    ExportCell::Unanswered => "(unanswered)".to_string(),
                    ExportCell::Value(value) => value.clone(),
                };
                println!("{id}: {text}");
            }
            Ok(())
        }
    }
}

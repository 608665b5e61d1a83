//! Top-level application orchestration.
//!
//! `src/main.rs` only maps errors to exit codes; this module is the real main:
//! - parses CLI arguments
//! - sets up logging for the chosen front-end
//! - loads the artifacts into an [`AppContext`]
//! - hands the context to the TUI, the line prompt or a one-shot command

use std::path::PathBuf;

use clap::Parser;

use crate::app::context::AppContext;
use crate::app::pipeline::{Submission, submit};
use crate::cli::{ArtifactArgs, Command, PredictArgs};
use crate::domain::{ArtifactPaths, PredictionRequest};
use crate::error::{AppError, EXIT_REJECTED};
use crate::form::{Form, FormField};
use crate::logging::LogTarget;
use crate::taxonomy::TransmissionTaxonomy;

pub mod context;
pub mod pipeline;

pub const DEFAULT_MODEL_FILE: &str = "xgb_model.json";
pub const DEFAULT_ENCODERS_FILE: &str = "label_encoders.json";
pub const DEFAULT_CATALOG_FILE: &str = "car_dict.json";

const SUBCOMMANDS: [&str; 5] = ["tui", "prompt", "predict", "taxonomy", "check"];

/// Entry point for the `carprice` binary.
pub fn run() -> Result<(), AppError> {
    // `carprice` and `carprice --model-file m.json` behave like `carprice tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let owns_terminal = matches!(cli.command, Command::Tui);
    crate::logging::init(&LogTarget::select(cli.log_file.clone(), owns_terminal))?;

    match cli.command {
        Command::Taxonomy => handle_taxonomy(),
        command => {
            let paths = artifact_paths_from_env(&cli.artifacts);
            let ctx = AppContext::load(&paths)?;
            dispatch(&ctx, command)
        }
    }
}

fn dispatch(ctx: &AppContext, command: Command) -> Result<(), AppError> {
    match command {
        Command::Tui => crate::tui::run(ctx),
        Command::Prompt => handle_prompt(ctx),
        Command::Predict(args) => {
            let text = predict_once(ctx, &args)?;
            println!("{text}");
            Ok(())
        }
        Command::Check => {
            print!("{}", crate::report::format_check(ctx));
            Ok(())
        }
        Command::Taxonomy => handle_taxonomy(),
    }
}

fn handle_taxonomy() -> Result<(), AppError> {
    print!("{}", crate::report::format_taxonomy(&TransmissionTaxonomy::standard()));
    Ok(())
}

fn handle_prompt(ctx: &AppContext) -> Result<(), AppError> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut prompter = crate::cli::prompt::Prompter::new(stdin.lock(), stdout.lock());
    crate::cli::prompt::run_session(ctx, &mut prompter)
}

/// Price one car described by flags.
///
/// Returns the text to print. A rejected submission is an error with
/// [`EXIT_REJECTED`] so scripts can tell it apart from bad input.
pub fn predict_once(ctx: &AppContext, args: &PredictArgs) -> Result<String, AppError> {
    let request = request_from_args(ctx, args)?;
    let summary = crate::report::format_request_summary(&request);
    match submit(ctx, &request)? {
        outcome @ Submission::Priced(_) => Ok(format!("{summary}\n{}", outcome.message())),
        outcome @ Submission::Rejected(_) => Err(AppError::new(EXIT_REJECTED, outcome.message())),
    }
}

/// Fill a form from flags, so flag values are held to the same option lists
/// the interactive front-ends offer.
pub fn request_from_args(ctx: &AppContext, args: &PredictArgs) -> Result<PredictionRequest, AppError> {
    let mut form = Form::new(ctx.catalog(), ctx.taxonomy());
    form.select(FormField::Brand, &args.brand)?;
    form.select(FormField::FuelType, &args.fuel_type)?;
    form.select(FormField::Model, &args.model)?;
    form.set_model_year(args.year)?;
    form.set_mileage_km(args.km)?;
    form.select_transmission_label(&args.transmission)?;
    form.set_accident(args.accident);
    form.request()
}

/// Resolve artifact paths: flag, then environment (after loading `.env`), then default.
pub fn artifact_paths_from_env(args: &ArtifactArgs) -> ArtifactPaths {
    dotenvy::dotenv().ok();
    resolve_artifact_paths(args, |key| std::env::var(key).ok())
}

pub fn resolve_artifact_paths(
    args: &ArtifactArgs,
    env: impl Fn(&str) -> Option<String>,
) -> ArtifactPaths {
    let pick = |flag: &Option<PathBuf>, key: &str, default: &str| {
        flag.clone()
            .or_else(|| env(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(default))
    };
    ArtifactPaths {
        model: pick(&args.model_file, "CARPRICE_MODEL", DEFAULT_MODEL_FILE),
        encoders: pick(&args.encoders_file, "CARPRICE_ENCODERS", DEFAULT_ENCODERS_FILE),
        catalog: pick(&args.catalog_file, "CARPRICE_CATALOG", DEFAULT_CATALOG_FILE),
    }
}

/// Rewrite argv so `carprice` defaults to `carprice tui`.
///
/// Rules:
/// - `carprice`                        -> `carprice tui`
/// - `carprice --model-file m.json`    -> `carprice tui --model-file m.json`
/// - `carprice --help/--version/-h`    -> unchanged (show top-level help/version)
/// - any argv naming a subcommand      -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    // Global flags may precede the subcommand.
    let names_subcommand = argv[1..].iter().any(|a| SUBCOMMANDS.contains(&a.as_str()));
    if names_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

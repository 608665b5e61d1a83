//! Command-line parsing for the used-car price estimator.
//!
//! Parsing and dispatch stay apart: this module only describes the flags,
//! `crate::app` decides what to do with them.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::AccidentHistory;

pub mod prompt;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "carprice", version, about = "Used-car price estimator")]
pub struct Cli {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Write logs to this file. Without it, the TUI runs with logging disabled
    /// and the other commands log to stderr.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Artifact locations. Each falls back to its environment variable, then to a
/// file of the default name in the working directory.
#[derive(Debug, Args, Clone, Default)]
pub struct ArtifactArgs {
    /// Trained price model (booster JSON export). Env: CARPRICE_MODEL.
    #[arg(long, global = true, value_name = "JSON")]
    pub model_file: Option<PathBuf>,

    /// Label encoder classes per categorical field. Env: CARPRICE_ENCODERS.
    #[arg(long, global = true, value_name = "JSON")]
    pub encoders_file: Option<PathBuf>,

    /// Brand → fuel type → models catalog. Env: CARPRICE_CATALOG.
    #[arg(long, global = true, value_name = "JSON")]
    pub catalog_file: Option<PathBuf>,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill in the form in an interactive terminal UI (default).
    Tui,
    /// Fill in the form through numbered line prompts.
    Prompt,
    /// Price one car from flags and print the estimate.
    ///
    /// Values are checked against the same option lists the form offers.
    Predict(PredictArgs),
    /// Print the transmission groups offered by the form.
    Taxonomy,
    /// Load every artifact and report values the model would reject.
    Check,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[arg(long)]
    pub brand: String,

    #[arg(long)]
    pub fuel_type: String,

    #[arg(long)]
    pub model: String,

    /// Model year (1990-2025).
    #[arg(long)]
    pub year: i32,

    /// Mileage in kilometers.
    #[arg(long)]
    pub km: f64,

    /// Exact transmission label, as listed by `carprice taxonomy`.
    #[arg(long)]
    pub transmission: String,

    /// Accident or damage reported.
    #[arg(long, value_enum, default_value_t = AccidentHistory::No)]
    pub accident: AccidentHistory,
}

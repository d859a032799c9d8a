// crates/cohort-screen-cli/src/main.rs
// ============================================================================
// Module: Cohort Screen CLI Entry Point
// Description: Command dispatcher for batch screening workflows.
// Purpose: Provide the batch invocation surface over the evaluation engine.
// Dependencies: clap, cohort-screen-{cli, config, core, matchers}
// ============================================================================

//! ## Overview
//! The Cohort Screen CLI runs the full screening batch (`run`) and validates
//! protocol files without evaluating patients (`check-protocol`). All output
//! goes through writer helpers; a failed protocol file is reported and
//! skipped so the remaining inputs still run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use cohort_screen_cli::IngestError;
use cohort_screen_cli::ProtocolIngestError;
use cohort_screen_cli::ReportError;
use cohort_screen_cli::load_profiles;
use cohort_screen_cli::load_protocol;
use cohort_screen_cli::load_protocols;
use cohort_screen_cli::run_batch;
use cohort_screen_cli::write_protocol_report;
use cohort_screen_cli::write_summary;
use cohort_screen_config::ConfigError;
use cohort_screen_config::ScreenConfig;
use cohort_screen_core::EngineError;
use cohort_screen_matchers::build_backend;
use thiserror::Error;

// ============================================================================
// SECTION: Command Definitions
// ============================================================================

/// Cohort Screen command-line interface.
#[derive(Debug, Parser)]
#[command(name = "cohort-screen", version, about = "Clinical-trial eligibility screening")]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate every patient against every protocol and write reports.
    Run(RunCommand),
    /// Validate protocol files without evaluating any patient.
    CheckProtocol(CheckProtocolCommand),
}

/// Arguments for the `run` command.
#[derive(Debug, Args)]
struct RunCommand {
    /// Configuration file path; defaults to `COHORT_SCREEN_CONFIG` or
    /// `cohort-screen.toml`.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Arguments for the `check-protocol` command.
#[derive(Debug, Args)]
struct CheckProtocolCommand {
    /// Protocol YAML files to validate.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI errors across the collaborator surfaces.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration loading or validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Patient or lab ingest failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),
    /// Protocol directory could not be read.
    #[error(transparent)]
    Protocol(#[from] ProtocolIngestError),
    /// Engine rejected a protocol.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// Report writing failed.
    #[error(transparent)]
    Report(#[from] ReportError),
    /// Console output failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point: dispatches commands and reports errors on stderr.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            let _ = write_stderr_line(&format!("error: {err}"));
            ExitCode::FAILURE
        }
    }
}

/// Parses arguments and dispatches the selected command.
fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(command) => command_run(&command),
        Command::CheckProtocol(command) => command_check_protocol(&command),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Runs the full screening batch.
fn command_run(command: &RunCommand) -> Result<ExitCode, CliError> {
    let config = ScreenConfig::load_path(command.config.as_deref())?;
    let batch = config.batch()?;
    let evaluation_date = batch.evaluation_date()?;

    let patients = load_profiles(
        &batch.patients_csv,
        &batch.labs_csv,
        &batch.notes_dir,
        evaluation_date,
    )?;
    write_stdout_line(&format!("Loaded {} patient profiles", patients.len()))?;

    let load = load_protocols(&batch.protocols_dir)?;
    for failure in &load.failures {
        write_stderr_line(&format!("skipping protocol: {failure}"))?;
    }
    write_stdout_line(&format!("Loaded {} normalized protocols", load.protocols.len()))?;

    let backend = build_backend(config.backend_kind()?, config.matcher.timeout_ms);
    let outcomes =
        run_batch(&load.protocols, &patients, &backend, config.thresholds(), config.policy())?;

    let mut stdout = std::io::stdout();
    for outcome in &outcomes {
        let path = write_protocol_report(&batch.output_dir, outcome)?;
        write_summary(&mut stdout, outcome)?;
        write_stdout_line(&format!(
            "Saved results for {} -> {}",
            outcome.protocol_id,
            path.display()
        ))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Validates protocol files and reports format errors without evaluating.
fn command_check_protocol(command: &CheckProtocolCommand) -> Result<ExitCode, CliError> {
    let mut failed = false;
    for file in &command.files {
        match load_protocol(file) {
            Ok(protocol) => {
                write_stdout_line(&format!(
                    "{}: ok ({} criteria)",
                    file.display(),
                    protocol.criteria.len()
                ))?;
            }
            Err(err) => {
                failed = true;
                write_stderr_line(&err.to_string())?;
            }
        }
    }
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes one line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes one line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

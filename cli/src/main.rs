use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use pattern_check::report::{ReportFormat, format_report};
use pattern_check::{CheckError, CheckOptions, check_files};
use pattern_check_loader::{CheckConfig, FileLoader};
use tracing_subscriber::EnvFilter;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Markdown,
    Json,
}

impl From<CliOutputFormat> for ReportFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Markdown => Self::Markdown,
            CliOutputFormat::Json => Self::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pattern-check", version)]
#[command(about = "Check pattern-test-pass / pattern-test-fail annotations against schema patterns")]
struct Cli {
    /// Schema files or directories to check, resolved against the model roots.
    files: Vec<PathBuf>,
    /// Directory searched for schema files and their imports. Repeatable.
    #[arg(long = "model-root", value_name = "DIR")]
    model_roots: Vec<PathBuf>,
    /// YAML run configuration providing model roots, files, and verbosity.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Log every evaluated test case.
    #[arg(short, long)]
    verbose: bool,
    /// Output format for failure rows.
    #[arg(long, default_value = "markdown")]
    format: CliOutputFormat,
}

/// Why a run did not finish cleanly.
enum Failure {
    /// Bad invocation or configuration; nothing was checked.
    Config(String),
    /// The check ran and found failures or aborted on errors.
    Check(Vec<String>),
}

impl Failure {
    fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::from(2),
            Self::Check(_) => ExitCode::from(1),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            match &failure {
                Failure::Config(message) => eprintln!("error: {message}"),
                Failure::Check(lines) => lines.iter().for_each(|line| eprintln!("{line}")),
            }
            failure.exit_code()
        }
    }
}

fn run(cli: Cli) -> Result<(), Failure> {
    let config = resolve_config(&cli).map_err(Failure::Config)?;
    init_tracing(config.verbose);

    tracing::debug!(
        roots = config.model_roots.len(),
        files = config.files.len(),
        "pattern-check starting"
    );

    let options = CheckOptions::default().verbose(config.verbose);
    let report = check_files(&FileLoader::new(), &config.files, &config.model_roots, options)
        .map_err(|err| Failure::Check(error_lines(&err)))?;

    if report.is_empty() && matches!(cli.format, CliOutputFormat::Markdown) {
        return Ok(());
    }

    let rendered = format_report(&report, cli.format.into())
        .map_err(|err| Failure::Check(vec![format!("error: {err}")]))?;
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }

    if report.is_empty() {
        Ok(())
    } else {
        Err(Failure::Check(vec![format!(
            "{} pattern test case(s) failed",
            report.len()
        )]))
    }
}

/// Merges the config file with command-line flags.
///
/// Flag roots are searched before config roots; flag files replace config
/// files.
fn resolve_config(cli: &Cli) -> Result<CheckConfig, String> {
    let mut config = match &cli.config {
        Some(path) => {
            let base = path.parent().unwrap_or(Path::new("."));
            CheckConfig::load(path)
                .map_err(|err| err.to_string())?
                .relative_to(base)
        }
        None => CheckConfig::default(),
    };

    let mut roots = cli.model_roots.clone();
    roots.append(&mut config.model_roots);
    config.model_roots = roots;
    if !cli.files.is_empty() {
        config.files = cli.files.clone();
    }
    config.verbose |= cli.verbose;

    if config.model_roots.is_empty() {
        return Err("at least one --model-root is required".to_string());
    }
    if let Some(missing) = config.model_roots.iter().find(|root| !root.is_dir()) {
        return Err(format!("model root '{}' is not a directory", missing.display()));
    }
    if config.files.is_empty() {
        return Err("no schema files given".to_string());
    }
    Ok(config)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

/// One line for the error itself, then one per aggregated cause.
fn error_lines(err: &CheckError) -> Vec<String> {
    let mut lines = Vec::new();
    match err {
        CheckError::Load(errors) => {
            lines.push(format!("error: could not parse modules ({})", errors.len()));
            lines.extend(errors.iter().map(|e| format!("  {e}")));
        }
        CheckError::Leaves(errors) => {
            lines.push(format!("error: {} leaf error(s)", errors.len()));
            lines.extend(errors.iter().map(|e| format!("  {e}")));
        }
        other => lines.push(format!("error: {other}")),
    }
    lines
}

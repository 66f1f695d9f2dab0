//! Puppet Summary - command line front end
//!
//! Parses Puppet/OpenVox run reports and prints their summary, their content
//! hash, or just whether they would be accepted.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, info};

use config::{LogFormat, LogTarget};
use puppet_summary::services::{export_report, ExportFormat};
use puppet_summary::{config, content_hash, AppConfig, ErrorResponse, ReportParser};

/// CLI-specific export format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliExportFormat {
    Text,
    Json,
    Yaml,
}

impl From<CliExportFormat> for ExportFormat {
    fn from(fmt: CliExportFormat) -> Self {
        match fmt {
            CliExportFormat::Text => Self::Text,
            CliExportFormat::Json => Self::Json,
            CliExportFormat::Yaml => Self::Yaml,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "puppet-summary", version)]
#[command(about = "Parse and validate Puppet run reports")]
struct Cli {
    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(flatten)]
    Report(ReportCommand),
    /// Write a default configuration file.
    InitConfig(InitConfigArgs),
}

/// Subcommands that read reports, and so need configuration and logging
#[derive(Debug, Subcommand)]
enum ReportCommand {
    /// Parse reports and print their summary.
    #[command(alias = "yaml")]
    Parse(ParseArgs),
    /// Print the content hash of each report.
    Hash(FilesArgs),
    /// Check whether reports would be accepted.
    Validate(FilesArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Report files to read ("-" for stdin).
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Output format (defaults to the configured one).
    #[arg(long, value_enum)]
    format: Option<CliExportFormat>,
}

#[derive(Debug, Args)]
struct FilesArgs {
    /// Report files to read ("-" for stdin).
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct InitConfigArgs {
    /// Where to write the configuration file.
    path: PathBuf,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Needs no configuration, and must work when the current one is broken
    let command = match cli.command {
        Command::InitConfig(args) => {
            AppConfig::create_default_config(&args.path)
                .with_context(|| format!("Failed to write config file: {:?}", args.path))?;
            println!("Wrote default configuration to {}", args.path.display());
            return Ok(ExitCode::SUCCESS);
        }
        Command::Report(command) => command,
    };

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    // The guard must be kept alive for the duration of the program
    // to ensure log messages are flushed to files
    let _log_guard = init_logging(&config, cli.verbose);

    debug!("Configuration loaded successfully");

    let success = match command {
        ReportCommand::Parse(args) => {
            let format = args.format.map(ExportFormat::from).unwrap_or(config.output.format);
            run_parse(&args.files, format)?
        }
        ReportCommand::Hash(args) => run_hash(&args.files)?,
        ReportCommand::Validate(args) => run_validate(&args.files)?,
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Read a report from a file, or from stdin when the path is "-"
fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut content = Vec::new();
        std::io::stdin()
            .read_to_end(&mut content)
            .context("Failed to read report from stdin")?;
        Ok(content)
    } else {
        std::fs::read(path).with_context(|| format!("Failed to read report: {:?}", path))
    }
}

fn run_parse(files: &[PathBuf], format: ExportFormat) -> Result<bool> {
    let parser = ReportParser::new();
    let mut success = true;

    for path in files {
        let content = read_input(path)?;

        match parser.parse(&content) {
            Ok(report) => {
                let rendered = export_report(&report, format)?;
                match format {
                    ExportFormat::Yaml => print!("---\n{}", rendered),
                    ExportFormat::Json => println!("{}", rendered),
                    ExportFormat::Text => {
                        if files.len() > 1 {
                            println!("==> {} <==", path.display());
                        }
                        println!("{}", rendered);
                    }
                }
            }
            Err(e) => {
                success = false;
                if format == ExportFormat::Json {
                    eprintln!("{}", serde_json::to_string(&ErrorResponse::from(&e))?);
                } else {
                    eprintln!("{}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(success)
}

fn run_hash(files: &[PathBuf]) -> Result<bool> {
    for path in files {
        let content = read_input(path)?;
        println!("{}  {}", content_hash(&content), path.display());
    }

    Ok(true)
}

fn run_validate(files: &[PathBuf]) -> Result<bool> {
    let parser = ReportParser::new();
    let mut valid = 0usize;
    let mut invalid = 0usize;

    for path in files {
        let content = read_input(path)?;

        match parser.parse(&content) {
            Ok(report) => {
                valid += 1;
                info!(
                    file = %path.display(),
                    host = %report.host,
                    state = %report.state,
                    hash = %report.content_hash,
                    "Report is valid"
                );
            }
            Err(e) => {
                invalid += 1;
                error!(
                    file = %path.display(),
                    error_type = e.error_type(),
                    error = %e,
                    "Report is invalid"
                );
            }
        }
    }

    println!("{} valid, {} invalid", valid, invalid);
    Ok(invalid == 0)
}

/// Initialize logging based on configuration.
///
/// Console output goes to stderr so stdout only carries command output.
fn init_logging(
    config: &AppConfig,
    verbose: bool,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{prelude::*, EnvFilter};

    let env_filter = if verbose {
        EnvFilter::new(&config.logging.level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };

    let log_config = &config.logging;

    match &log_config.target {
        LogTarget::Console => {
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_console_logging(subscriber, &log_config.format);
            None
        }
        LogTarget::File => {
            let (writer, guard) = create_file_writer(log_config);
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_file_logging(subscriber, &log_config.format, writer);
            Some(guard)
        }
        LogTarget::Both => {
            let (writer, guard) = create_file_writer(log_config);
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_both_logging(subscriber, &log_config.format, writer);
            Some(guard)
        }
    }
}

/// Create a file writer with optional daily rotation
fn create_file_writer(
    log_config: &config::LoggingConfig,
) -> (
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
) {
    // Ensure log directory exists
    if let Err(e) = std::fs::create_dir_all(&log_config.log_dir) {
        eprintln!(
            "Warning: Failed to create log directory {:?}: {}",
            log_config.log_dir, e
        );
    }

    let file_appender = if log_config.daily_rotation {
        tracing_appender::rolling::daily(&log_config.log_dir, &log_config.log_prefix)
    } else {
        tracing_appender::rolling::never(&log_config.log_dir, &log_config.log_prefix)
    };

    tracing_appender::non_blocking(file_appender)
}

/// Initialize console-only logging
fn init_console_logging<S>(subscriber: S, format: &LogFormat)
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    use tracing_subscriber::{fmt, prelude::*};

    match format {
        LogFormat::Json => {
            subscriber
                .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Compact => {
            subscriber
                .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

/// Initialize file-only logging
fn init_file_logging<S>(
    subscriber: S,
    format: &LogFormat,
    writer: tracing_appender::non_blocking::NonBlocking,
) where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    use tracing_subscriber::{fmt, prelude::*};

    match format {
        LogFormat::Json => {
            subscriber
                .with(fmt::layer().json().with_target(true).with_writer(writer))
                .init();
        }
        LogFormat::Compact => {
            subscriber
                .with(fmt::layer().compact().with_target(false).with_writer(writer))
                .init();
        }
        LogFormat::Pretty => {
            subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
        }
    }
}

/// Initialize both console and file logging
fn init_both_logging<S>(
    subscriber: S,
    format: &LogFormat,
    writer: tracing_appender::non_blocking::NonBlocking,
) where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    use tracing_subscriber::{fmt, prelude::*};

    match format {
        LogFormat::Json => {
            subscriber
                .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr)) // Console
                .with(fmt::layer().json().with_target(true).with_writer(writer)) // File
                .init();
        }
        LogFormat::Compact => {
            subscriber
                .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr)) // Console
                .with(fmt::layer().compact().with_target(false).with_writer(writer)) // File
                .init();
        }
        LogFormat::Pretty => {
            subscriber
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr)) // Console
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(writer),
                ) // File
                .init();
        }
    }
}

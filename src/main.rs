//! sigscan: a minimal static malware detector.
//!
//! This is the main entry point for the CLI application.

use sigscan::core::config::Config;
use sigscan::core::error::{Error, Result};
use sigscan::core::types::{ScanVerdict, SignatureRecord};
use sigscan::detection::SignatureLoader;
use sigscan::scanner::FileScanner;
use sigscan::ui::cli::{Cli, Commands, ConfigAction, OutputFormat};
use sigscan::ui::prompt::{Prompter, SIGNATURE_PROMPT, TARGET_PROMPT};
use sigscan::ui::report::{self, ExitStatus};
use sigscan::utils::logging::{init_logging, LogConfig};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Load configuration before logging so the log level can come from it
    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => return setup_failure(&e),
        },
        None => Config::load_or_default(),
    };

    let mut log_config = LogConfig::from_config(&config.logging);
    if cli.verbose {
        log_config = log_config.verbose();
    } else if cli.quiet {
        log_config = log_config.quiet();
    }
    if let Err(e) = init_logging(log_config) {
        return setup_failure(&e);
    }

    log::info!("sigscan v{}", env!("CARGO_PKG_VERSION"));
    let config_path = Config::resolve_path(cli.config.as_deref());
    let config = Arc::new(config);

    let status = match cli.command.unwrap_or_default() {
        Commands::Scan { signature, target } => run_scan(config, signature, target, cli.format),
        Commands::Inspect { signature } => run_inspect(&config, &signature, cli.format),
        Commands::Config { action } => match run_config(action, &config, &config_path) {
            Ok(()) => ExitStatus::Success,
            Err(e) => {
                report_error(&e);
                ExitStatus::Setup
            }
        },
    };

    log::debug!("Exiting with status {:?}", status);
    status.into()
}

/// Scan a target for a signature, prompting for whichever path is missing.
fn run_scan(
    config: Arc<Config>,
    signature: Option<PathBuf>,
    target: Option<PathBuf>,
    format: OutputFormat,
) -> ExitStatus {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    if config.output.show_banner && (signature.is_none() || target.is_none()) {
        if let Err(e) = prompter.banner() {
            report_error(&e);
            return ExitStatus::SignaturePromptWrite;
        }
    }

    let signature_path = match signature {
        Some(path) => path,
        None => match prompter.ask_path(SIGNATURE_PROMPT, "signature path") {
            Ok(path) => path,
            Err(e) => {
                report_error(&e);
                return prompt_failure(
                    &e,
                    ExitStatus::SignaturePromptWrite,
                    ExitStatus::SignaturePathRead,
                );
            }
        },
    };

    let loader = SignatureLoader::new(config.scan.max_path_len);
    let signature = match loader.load(&signature_path) {
        Ok(signature) => signature,
        Err(e) => return load_failure(&signature_path, &e, format),
    };

    let target_path = match target {
        Some(path) => path,
        None => match prompter.ask_path(TARGET_PROMPT, "target path") {
            Ok(path) => path,
            Err(e) => {
                report_error(&e);
                return prompt_failure(
                    &e,
                    ExitStatus::TargetPromptWrite,
                    ExitStatus::TargetPathRead,
                );
            }
        },
    };

    let scanner = FileScanner::new(config);
    match scanner.scan(&target_path, &signature) {
        Ok(verdict) => write_verdict(&target_path, &signature, &verdict, format),
        Err(e) => {
            log::debug!("Scan of {} failed: {}", target_path.display(), e);
            let written = match format {
                OutputFormat::Json => diagnostic(&e).and(report::write_failed_report(
                    &mut io::stdout(),
                    &target_path,
                    &signature,
                    e,
                )),
                OutputFormat::Text => diagnostic(&e),
            };
            match written {
                Ok(()) => ExitStatus::ScanFailed,
                Err(_) => ExitStatus::ScanDiagnosticWrite,
            }
        }
    }
}

fn write_verdict(
    target: &Path,
    signature: &SignatureRecord,
    verdict: &ScanVerdict,
    format: OutputFormat,
) -> ExitStatus {
    let mut stdout = io::stdout();
    let result = report::write_verdict(&mut stdout, format, target, signature, verdict)
        .and_then(|_| {
            stdout.flush().map_err(|source| Error::ConsoleWrite {
                what: "report",
                source,
            })
        });

    match (result, verdict) {
        (Ok(()), _) => ExitStatus::Success,
        (Err(e), ScanVerdict::Safe(_)) => {
            report_error(&e);
            ExitStatus::SafeReportWrite
        }
        (Err(e), ScanVerdict::Infected { .. }) => {
            report_error(&e);
            ExitStatus::InfectedReportWrite
        }
    }
}

/// Parse a signature definition and print it.
fn run_inspect(config: &Config, path: &Path, format: OutputFormat) -> ExitStatus {
    let signature = match SignatureLoader::new(config.scan.max_path_len).load(path) {
        Ok(signature) => signature,
        Err(e) => return load_failure(path, &e, format),
    };

    match report::write_signature(&mut io::stdout(), format, &signature) {
        Ok(()) => ExitStatus::Success,
        Err(e) => {
            report_error(&e);
            ExitStatus::OutputWrite
        }
    }
}

/// Handle configuration commands against the file named by `--config`, or
/// the default location.
fn run_config(action: ConfigAction, config: &Config, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigAction::Reset => {
            log::info!("Resetting configuration at {} to defaults...", path.display());
            Config::default().save(path)?;
            println!("Configuration reset to defaults.");
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }
    Ok(())
}

/// Report a signature that failed to load. JSON output also gets a failed
/// report on stdout.
fn load_failure(path: &Path, error: &Error, format: OutputFormat) -> ExitStatus {
    log::debug!("Failed to load signature from {}: {}", path.display(), error);
    let written = match format {
        OutputFormat::Json => diagnostic(error)
            .and_then(|_| report::write_load_failure(&mut io::stdout(), path, error)),
        OutputFormat::Text => diagnostic(error),
    };
    match written {
        Ok(()) => ExitStatus::SignatureLoad,
        Err(_) => ExitStatus::SignatureDiagnosticWrite,
    }
}

/// Pick the exit status for a failed prompt.
fn prompt_failure(error: &Error, on_write: ExitStatus, on_read: ExitStatus) -> ExitStatus {
    match error {
        Error::ConsoleWrite { .. } => on_write,
        _ => on_read,
    }
}

fn write_diagnostic(error: &Error) -> io::Result<()> {
    report::write_diagnostic(&mut io::stderr(), error)
}

fn diagnostic(error: &Error) -> Result<()> {
    write_diagnostic(error).map_err(|source| Error::ConsoleWrite {
        what: "diagnostic",
        source,
    })
}

fn report_error(error: &Error) {
    let _ = write_diagnostic(error);
}

fn setup_failure(error: &Error) -> ExitCode {
    report_error(error);
    ExitStatus::Setup.into()
}

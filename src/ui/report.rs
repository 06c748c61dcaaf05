//! Rendering of scan results and diagnostics, and exit status mapping.

use crate::core::error::{Error, Result};
use crate::core::types::{SafeReason, ScanReport, ScanVerdict, SignatureRecord};
use crate::ui::cli::OutputFormat;
use std::error::Error as _;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

/// Process exit status, one per failure point of an interactive run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    /// The scan finished (safe or infected)
    Success = 0,
    SignaturePromptWrite = 1,
    SignaturePathRead = 2,
    SignatureDiagnosticWrite = 3,
    SignatureLoad = 4,
    TargetPromptWrite = 5,
    TargetPathRead = 6,
    SafeReportWrite = 7,
    InfectedReportWrite = 8,
    ScanDiagnosticWrite = 9,
    ScanFailed = 10,
    /// Configuration, logging or other setup failure
    Setup = 11,
    /// Writing non-scan output, such as an inspected signature, failed
    OutputWrite = 12,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Write a scan verdict in the requested format.
pub fn write_verdict<W: Write>(
    out: &mut W,
    format: OutputFormat,
    target: &Path,
    signature: &SignatureRecord,
    verdict: &ScanVerdict,
) -> Result<()> {
    let what = match verdict {
        ScanVerdict::Safe(_) => "safe report",
        ScanVerdict::Infected { .. } => "infected report",
    };

    match format {
        OutputFormat::Json => {
            let report = ScanReport::new(target, signature, &Ok(verdict.clone()));
            write_json(out, &report, what)
        }
        OutputFormat::Text => {
            let text = match verdict {
                ScanVerdict::Safe(reason) => safe_message(target, *reason),
                ScanVerdict::Infected { name } => {
                    format!("Virus detected: {} in file {}", name, target.display())
                }
            };
            writeln!(out, "{}", text).map_err(|source| Error::ConsoleWrite { what, source })
        }
    }
}

fn safe_message(target: &Path, reason: SafeReason) -> String {
    format!("All OK, file {} is safe ({})", target.display(), reason)
}

/// Write a failed scan as a JSON report.
pub fn write_failed_report<W: Write>(
    out: &mut W,
    target: &Path,
    signature: &SignatureRecord,
    error: Error,
) -> Result<()> {
    let report = ScanReport::new(target, signature, &Err(error));
    write_json(out, &report, "error report")
}

/// Write a failed signature load as a JSON report.
pub fn write_load_failure<W: Write>(out: &mut W, signature_file: &Path, error: &Error) -> Result<()> {
    let report = ScanReport::load_failed(signature_file, error);
    write_json(out, &report, "error report")
}

/// Write a signature record in the requested format.
pub fn write_signature<W: Write>(
    out: &mut W,
    format: OutputFormat,
    signature: &SignatureRecord,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, signature, "signature"),
        OutputFormat::Text => {
            let text = format!(
                "Definition: {}\nName:       {}\nPattern:    {}\nOffset:     {:#x} ({})\n",
                signature,
                signature.name,
                signature.pattern,
                signature.offset,
                signature.offset
            );
            out.write_all(text.as_bytes())
                .map_err(|source| Error::ConsoleWrite {
                    what: "signature",
                    source,
                })
        }
    }
}

/// Write a diagnostic naming the failing stage, the cause chain and a hint.
pub fn write_diagnostic<W: Write>(out: &mut W, error: &Error) -> std::io::Result<()> {
    match error.stage() {
        Some(stage) => writeln!(out, "Error during {} ({}): {}", stage, error.kind(), error)?,
        None => writeln!(out, "Error ({}): {}", error.kind(), error)?,
    }

    let mut source = error.source();
    while let Some(cause) = source {
        writeln!(out, "  Caused by: {}", cause)?;
        source = cause.source();
    }

    if let Some(hint) = error.suggestion() {
        writeln!(out, "  Hint: {}", hint)?;
    }
    out.flush()
}

fn write_json<W: Write, T: serde::Serialize>(out: &mut W, value: &T, what: &'static str) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    writeln!(out, "{}", json).map_err(|source| Error::ConsoleWrite { what, source })
}

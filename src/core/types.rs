//! Core type definitions used throughout sigscan.

use crate::core::error::{Error, ErrorKind, Result, Stage, Token};
use serde::{Serialize, Serializer};
use std::path::PathBuf;

/// Width of a signature pattern in bytes.
pub const PATTERN_LEN: usize = 8;

/// Maximum length of a signature name in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of a file path accepted by default, in characters.
pub const MAX_PATH_LEN: usize = 255;

/// Fixed-width byte pattern of a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pattern([u8; PATTERN_LEN]);

impl Pattern {
    pub fn new(bytes: [u8; PATTERN_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PATTERN_LEN] {
        &self.0
    }

    /// Pattern width, always `PATTERN_LEN`.
    pub const fn len(&self) -> usize {
        PATTERN_LEN
    }

    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Exact byte equality against a window read from a file.
    pub fn matches(&self, window: &[u8; PATTERN_LEN]) -> bool {
        self.0 == *window
    }
}

impl From<[u8; PATTERN_LEN]> for Pattern {
    fn from(bytes: [u8; PATTERN_LEN]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Name of the threat a signature detects.
///
/// Always non-empty, free of whitespace and at most [`MAX_NAME_LEN`] characters,
/// so it survives a round trip through the definition format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SignatureName(String);

impl SignatureName {
    /// Validate and wrap a signature name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::malformed(Token::Name, "name is empty"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(Error::malformed(Token::Name, "name contains whitespace"));
        }
        let len = name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(Error::malformed(
                Token::Name,
                format!("name is {} characters, limit is {}", len, MAX_NAME_LEN),
            ));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SignatureName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A loaded byte signature: pattern, absolute offset and threat name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureRecord {
    pub pattern: Pattern,
    /// Absolute byte offset from the start of the target file
    pub offset: u64,
    pub name: SignatureName,
}

impl SignatureRecord {
    pub fn new(pattern: impl Into<Pattern>, offset: u64, name: SignatureName) -> Self {
        Self {
            pattern: pattern.into(),
            offset,
            name,
        }
    }

    /// One past the last byte the pattern covers, or `None` on overflow.
    pub fn end_offset(&self) -> Option<u64> {
        self.offset.checked_add(self.pattern.len() as u64)
    }
}

/// Renders the record in definition format.
impl std::fmt::Display for SignatureRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:X} {}", self.pattern, self.offset, self.name)
    }
}

/// Why a scanned file was judged safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SafeReason {
    /// The file does not start with the MZ marker
    NotExecutable,
    /// The file ends before the signature window
    TooSmall,
    /// The signature window differs from the pattern
    NoMatch,
}

impl std::fmt::Display for SafeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SafeReason::NotExecutable => write!(f, "not an executable"),
            SafeReason::TooSmall => write!(f, "too small for the signature"),
            SafeReason::NoMatch => write!(f, "signature not found"),
        }
    }
}

/// Outcome of a successful scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanVerdict {
    Safe(SafeReason),
    Infected { name: String },
}

impl ScanVerdict {
    pub fn is_infected(&self) -> bool {
        matches!(self, ScanVerdict::Infected { .. })
    }
}

/// Reported status of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Safe,
    Infected,
    Failed,
}

/// Serializable record of one scan, including failed ones.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
    /// Name of the signature, once it has been loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Definition file, set when loading it failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_file: Option<PathBuf>,
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SafeReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// RFC 3339 timestamp
    pub scanned_at: String,
}

impl ScanReport {
    /// Build a report from the result of a scan.
    pub fn new(
        target: impl Into<PathBuf>,
        signature: &SignatureRecord,
        result: &Result<ScanVerdict>,
    ) -> Self {
        let mut report = Self::empty();
        report.target = Some(target.into());
        report.signature = Some(signature.name.to_string());

        match result {
            Ok(ScanVerdict::Safe(reason)) => {
                report.status = ReportStatus::Safe;
                report.reason = Some(*reason);
            }
            Ok(ScanVerdict::Infected { name }) => {
                report.status = ReportStatus::Infected;
                report.virus = Some(name.clone());
            }
            Err(e) => report.set_error(e),
        }

        report
    }

    /// Build a failed report for a signature definition that could not be loaded.
    pub fn load_failed(signature_file: impl Into<PathBuf>, error: &Error) -> Self {
        let mut report = Self::empty();
        report.signature_file = Some(signature_file.into());
        report.set_error(error);
        report
    }

    fn empty() -> Self {
        Self {
            target: None,
            signature: None,
            signature_file: None,
            status: ReportStatus::Failed,
            reason: None,
            virus: None,
            error_kind: None,
            error_stage: None,
            error: None,
            scanned_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn set_error(&mut self, error: &Error) {
        self.status = ReportStatus::Failed;
        self.error_kind = Some(error.kind());
        self.error_stage = error.stage();
        self.error = Some(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SignatureRecord {
        SignatureRecord::new(
            Pattern::new([0x4D, 0x5A, 0x90, 0x00, 0x03, 0x00, 0x00, 0x00]),
            0x1234,
            SignatureName::new("ExampleVirus").unwrap(),
        )
    }

    #[test]
    fn test_record_display() {
        assert_eq!(record().to_string(), "4D 5A 90 00 03 00 00 00 1234 ExampleVirus");
    }

    #[test]
    fn test_end_offset_overflow() {
        let mut sig = record();
        assert_eq!(sig.end_offset(), Some(0x123C));
        sig.offset = u64::MAX - 3;
        assert_eq!(sig.end_offset(), None);
    }

    #[test]
    fn test_name_validation() {
        assert!(SignatureName::new("Trojan.Generic").is_ok());
        assert!(SignatureName::new("").is_err());
        assert!(SignatureName::new("Two Words").is_err());
        assert!(SignatureName::new("x".repeat(MAX_NAME_LEN)).is_ok());

        let err = SignatureName::new("x".repeat(MAX_NAME_LEN + 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_report_from_error() {
        let result: Result<ScanVerdict> = Err(Error::invalid_argument(Stage::Scan, "empty path"));
        let report = ScanReport::new("target.exe", &record(), &result);
        assert_eq!(report.status, ReportStatus::Failed);
        assert_eq!(report.error_kind, Some(ErrorKind::InvalidArgument));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error_kind"], "invalid_argument");
        assert!(json.get("virus").is_none());
    }

    #[test]
    fn test_report_load_failed() {
        let err = Error::malformed(Token::Offset, "\"12G4\" is not a hex offset");
        let report = ScanReport::load_failed("signature.txt", &err);
        assert_eq!(report.status, ReportStatus::Failed);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["signature_file"], "signature.txt");
        assert_eq!(json["error_kind"], "malformed_input");
        assert_eq!(json["error_stage"], "signature_load");
        assert!(json.get("target").is_none());
        assert!(json.get("signature").is_none());
    }

    #[test]
    fn test_report_infected_json() {
        let result = Ok(ScanVerdict::Infected {
            name: "ExampleVirus".to_string(),
        });
        let json = serde_json::to_value(ScanReport::new("a.exe", &record(), &result)).unwrap();
        assert_eq!(json["status"], "infected");
        assert_eq!(json["virus"], "ExampleVirus");
    }

    #[test]
    fn test_record_json() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["pattern"], "4D 5A 90 00 03 00 00 00");
        assert_eq!(json["offset"], 0x1234);
        assert_eq!(json["name"], "ExampleVirus");
    }
}

//! Error types and result handling for sigscan.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Loading the signature definition
    SignatureLoad,
    /// Checking the target for the MZ marker
    Classify,
    /// Measuring the target's length
    SizeProbe,
    /// Reading and comparing the signature window
    Match,
    /// Driving the whole scan
    Scan,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignatureLoad => write!(f, "signature load"),
            Self::Classify => write!(f, "executable classification"),
            Self::SizeProbe => write!(f, "size probe"),
            Self::Match => write!(f, "signature match"),
            Self::Scan => write!(f, "scan"),
        }
    }
}

/// Token position within a signature definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// One of the eight pattern bytes (zero-based index)
    PatternByte(usize),
    /// The hexadecimal offset
    Offset,
    /// The signature name
    Name,
    /// Overall size of the definition
    Length,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PatternByte(i) => write!(f, "pattern byte #{}", i + 1),
            Self::Offset => write!(f, "offset"),
            Self::Name => write!(f, "signature name"),
            Self::Length => write!(f, "length"),
        }
    }
}

/// Low-level I/O operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoOp {
    Read,
    Seek,
    PositionQuery,
}

impl std::fmt::Display for IoOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Seek => write!(f, "seek"),
            Self::PositionQuery => write!(f, "position query"),
        }
    }
}

/// Main error type for sigscan operations.
#[derive(Error, Debug)]
pub enum Error {
    // ===== Pipeline Errors =====
    #[error("Invalid argument in {stage}: {reason}")]
    InvalidArgument { stage: Stage, reason: String },

    #[error("Cannot open {path} during {stage}")]
    ResourceUnavailable {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {token} in signature definition: {reason}")]
    MalformedInput { token: Token, reason: String },

    #[error("{op} failed on {path} during {stage}")]
    IoFault {
        stage: Stage,
        op: IoOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Read {actual} of {expected} bytes at offset {offset:#x} in {path}")]
    SizeInconsistency {
        path: PathBuf,
        offset: u64,
        expected: usize,
        actual: usize,
    },

    // ===== Configuration Errors =====
    #[error("Failed to load configuration: {0}")]
    ConfigLoad(String),

    #[error("Failed to save configuration: {0}")]
    ConfigSave(String),

    #[error("Invalid configuration value: {field} - {message}")]
    ConfigInvalid { field: String, message: String },

    // ===== Console Errors =====
    #[error("Failed to write {what}")]
    ConsoleWrite {
        what: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {what}")]
    ConsoleRead {
        what: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("No {0} was entered")]
    MissingInput(&'static str),

    #[error("Failed to initialize logging: {0}")]
    LoggerInit(String),

    // ===== Serialization Errors =====
    #[error("JSON serialization error")]
    JsonSerialize(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid argument error.
    pub fn invalid_argument(stage: Stage, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            stage,
            reason: reason.into(),
        }
    }

    /// Create a resource unavailable error.
    pub fn unavailable(stage: Stage, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ResourceUnavailable {
            stage,
            path: path.into(),
            source,
        }
    }

    /// Create a malformed input error.
    pub fn malformed(token: Token, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            token,
            reason: reason.into(),
        }
    }

    /// Create an I/O fault error.
    pub fn io_fault(
        stage: Stage,
        op: IoOp,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::IoFault {
            stage,
            op,
            path: path.into(),
            source,
        }
    }

    /// Get the design-level kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Error::ResourceUnavailable { .. } => ErrorKind::ResourceUnavailable,
            Error::MalformedInput { .. } => ErrorKind::MalformedInput,
            Error::IoFault { .. } => ErrorKind::IoFault,
            Error::SizeInconsistency { .. } => ErrorKind::SizeInconsistency,

            Error::ConfigLoad(_) | Error::ConfigSave(_) | Error::ConfigInvalid { .. } => {
                ErrorKind::Configuration
            }
            Error::ConsoleWrite { .. }
            | Error::ConsoleRead { .. }
            | Error::MissingInput(_) => ErrorKind::Console,

            Error::LoggerInit(_) => ErrorKind::Configuration,

            Error::JsonSerialize(_) => ErrorKind::Serialization,
        }
    }

    /// Get the pipeline stage that produced this error, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::InvalidArgument { stage, .. }
            | Error::ResourceUnavailable { stage, .. }
            | Error::IoFault { stage, .. } => Some(*stage),
            Error::MalformedInput { .. } => Some(Stage::SignatureLoad),
            Error::SizeInconsistency { .. } => Some(Stage::Match),
            _ => None,
        }
    }

    /// Get a user-friendly suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::InvalidArgument { .. } => Some("Check that a path was given and is not too long"),
            Error::ResourceUnavailable { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                Some("Try running with elevated privileges (sudo/administrator)")
            }
            Error::ResourceUnavailable { .. } => Some("Check that the path exists and is accessible"),
            Error::MalformedInput { .. } => Some(
                "Expected format: 8 hex bytes, a hex offset and a name, e.g. \
                 4D 5A 90 00 03 00 00 00 1234 ExampleVirus",
            ),
            Error::SizeInconsistency { .. } => {
                Some("The file may have been modified during the scan; try again")
            }
            Error::ConfigLoad(_) | Error::ConfigInvalid { .. } => {
                Some("Check your configuration file for syntax errors or missing fields")
            }
            _ => None,
        }
    }
}

/// Design-level error kind for classification and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required input was empty or out of bounds
    InvalidArgument,
    /// A path could not be opened
    ResourceUnavailable,
    /// Signature text failed to parse
    MalformedInput,
    /// Seek, read or position query failed
    IoFault,
    /// A positioned read disagreed with the probed size
    SizeInconsistency,
    Configuration,
    Console,
    Serialization,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::ResourceUnavailable => write!(f, "resource unavailable"),
            Self::MalformedInput => write!(f, "malformed input"),
            Self::IoFault => write!(f, "I/O fault"),
            Self::SizeInconsistency => write!(f, "size inconsistency"),
            Self::Configuration => write!(f, "configuration"),
            Self::Console => write!(f, "console"),
            Self::Serialization => write!(f, "serialization"),
        }
    }
}

//! sigscan: a minimal static malware detector
//!
//! This crate checks whether a single file contains a single byte signature at
//! a declared offset. Only files starting with the PE/DOS `MZ` marker are
//! inspected; everything else is safe by definition.
//!
//! ```no_run
//! use sigscan::{Config, FileScanner, SignatureLoader};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn main() -> sigscan::Result<()> {
//! let signature = SignatureLoader::default().load(Path::new("signature.txt"))?;
//! let scanner = FileScanner::new(Arc::new(Config::default()));
//! let verdict = scanner.scan(Path::new("target.exe"), &signature)?;
//! println!("{:?}", verdict);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod detection;
pub mod scanner;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use crate::core::config::Config;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::types::*;
pub use crate::detection::{SignatureLoader, SignatureMatcher};
pub use crate::scanner::{ExecutableClassifier, FileScanner, SizeProbe};

//! File scanning functionality.
//!
//! This module provides the scan pipeline and its file-level stages:
//! - Executable classification via the MZ marker
//! - File size probing
//! - The single-file scan driver

pub mod file;
pub mod filetype;
pub mod size;

pub use file::FileScanner;
pub use filetype::ExecutableClassifier;
pub use size::SizeProbe;

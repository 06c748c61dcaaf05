//! User interface components.
//!
//! This module provides:
//! - CLI definition
//! - Interactive path prompts
//! - Verdict and diagnostic rendering

pub mod cli;
pub mod prompt;
pub mod report;

pub use cli::Cli;
pub use prompt::Prompter;
pub use report::ExitStatus;

//! Signature loading and matching.
//!
//! This module provides:
//! - Parsing of a single signature definition (8 hex bytes, offset, name)
//! - Exact comparison of the bytes at the signature offset

pub mod matcher;
pub mod signature;

pub use matcher::{MatchOutcome, SignatureMatcher};
pub use signature::SignatureLoader;

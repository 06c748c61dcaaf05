//! Path checks shared by every pipeline stage.

use crate::core::error::{Error, Result, Stage};
use std::path::Path;

/// Reject empty paths and paths longer than `max_len` characters.
pub fn validate_path(path: &Path, max_len: usize, stage: Stage) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::invalid_argument(stage, "path is empty"));
    }

    let len = path.to_string_lossy().chars().count();
    if len > max_len {
        return Err(Error::invalid_argument(
            stage,
            format!("path is {} characters, limit is {}", len, max_len),
        ));
    }

    Ok(())
}

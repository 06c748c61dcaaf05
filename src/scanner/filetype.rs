//! Executable detection using the DOS/PE magic bytes.

use crate::core::error::{Error, IoOp, Result, Stage};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of header bytes inspected.
pub const MAGIC_BYTES_SIZE: usize = 2;

/// "MZ" read as a little-endian 16-bit value.
pub const MZ_MAGIC: u16 = 0x5A4D;

/// Decides whether a file is a PE/DOS executable.
pub struct ExecutableClassifier;

impl ExecutableClassifier {
    /// Check a two-byte header for the MZ marker.
    pub fn is_mz_header(header: &[u8; MAGIC_BYTES_SIZE]) -> bool {
        u16::from_le_bytes(*header) == MZ_MAGIC
    }

    /// Classify a file by its first two bytes.
    ///
    /// A file shorter than two bytes is an error, not a negative result: a
    /// truncated header cannot be told apart from a failed read.
    pub fn classify(path: &Path) -> Result<bool> {
        let mut file = File::open(path).map_err(|e| Error::unavailable(Stage::Classify, path, e))?;

        let mut header = [0u8; MAGIC_BYTES_SIZE];
        file.read_exact(&mut header)
            .map_err(|e| Error::io_fault(Stage::Classify, IoOp::Read, path, e))?;

        let executable = Self::is_mz_header(&header);
        log::trace!(
            "Header of {} is {:02X} {:02X} (executable: {})",
            path.display(),
            header[0],
            header[1],
            executable
        );
        Ok(executable)
    }
}

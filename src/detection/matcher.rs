//! Offset-anchored byte pattern matching.

use crate::core::error::{Error, IoOp, Result, Stage};
use crate::core::types::{SignatureRecord, PATTERN_LEN};
use std::fs::File;
use std::io::{ErrorKind as IoErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

/// Result of comparing a file against a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The file ends before `offset + PATTERN_LEN`; nothing was read
    TooSmall,
    /// The window at `offset` differs from the pattern
    NoMatch,
    /// The window at `offset` equals the pattern
    Match,
}

/// Compares the bytes at a signature's offset with its pattern.
pub struct SignatureMatcher;

impl SignatureMatcher {
    /// Match a file of known size against a signature.
    ///
    /// `file_size` must come from a prior probe of the same file. If the read
    /// at `offset` comes back short, the two disagree and
    /// [`Error::SizeInconsistency`] is returned rather than a clean result.
    pub fn match_file(
        path: &Path,
        signature: &SignatureRecord,
        file_size: u64,
    ) -> Result<MatchOutcome> {
        if path.as_os_str().is_empty() {
            return Err(Error::invalid_argument(Stage::Match, "path is empty"));
        }

        match signature.end_offset() {
            Some(end) if end <= file_size => {}
            _ => {
                log::debug!(
                    "{} ({} bytes) cannot hold {} at {:#x}",
                    path.display(),
                    file_size,
                    signature.name,
                    signature.offset
                );
                return Ok(MatchOutcome::TooSmall);
            }
        }

        let mut file = File::open(path).map_err(|e| Error::unavailable(Stage::Match, path, e))?;
        file.seek(SeekFrom::Start(signature.offset))
            .map_err(|e| Error::io_fault(Stage::Match, IoOp::Seek, path, e))?;

        let mut window = [0u8; PATTERN_LEN];
        let read = read_window(&mut file, &mut window)
            .map_err(|e| Error::io_fault(Stage::Match, IoOp::Read, path, e))?;
        if read < PATTERN_LEN {
            return Err(Error::SizeInconsistency {
                path: path.to_path_buf(),
                offset: signature.offset,
                expected: PATTERN_LEN,
                actual: read,
            });
        }

        if signature.pattern.matches(&window) {
            Ok(MatchOutcome::Match)
        } else {
            Ok(MatchOutcome::NoMatch)
        }
    }
}

/// Fill `buf` from `reader`, stopping early only at end of file.
/// Returns the number of bytes read.
fn read_window<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == IoErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

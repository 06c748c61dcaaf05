//! File length probing.

use crate::core::error::{Error, IoOp, Result, Stage};
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;

/// Measures a file's length by seeking to its end.
pub struct SizeProbe;

impl SizeProbe {
    /// Return the exact length of the file in bytes.
    pub fn probe(path: &Path) -> Result<u64> {
        if path.as_os_str().is_empty() {
            return Err(Error::invalid_argument(Stage::SizeProbe, "path is empty"));
        }

        let mut file = File::open(path).map_err(|e| Error::unavailable(Stage::SizeProbe, path, e))?;

        file.seek(SeekFrom::End(0))
            .map_err(|e| Error::io_fault(Stage::SizeProbe, IoOp::Seek, path, e))?;
        let size = file
            .stream_position()
            .map_err(|e| Error::io_fault(Stage::SizeProbe, IoOp::PositionQuery, path, e))?;

        log::trace!("{} is {} bytes", path.display(), size);
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_probe_size() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 1234]).unwrap();
        file.flush().unwrap();

        assert_eq!(SizeProbe::probe(file.path()).unwrap(), 1234);
    }

    #[test]
    fn test_probe_empty_file() {
        let file = NamedTempFile::new().unwrap();
        assert_eq!(SizeProbe::probe(file.path()).unwrap(), 0);
    }

    #[test]
    fn test_probe_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = SizeProbe::probe(&dir.path().join("gone")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceUnavailable);
        assert_eq!(err.stage(), Some(Stage::SizeProbe));
    }

    #[test]
    fn test_probe_empty_path() {
        let err = SizeProbe::probe(Path::new("")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}

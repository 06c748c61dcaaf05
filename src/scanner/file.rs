//! Single-file scan pipeline.
//!
//! A scan runs strictly forward through four stages and never retries:
//!
//! 1. classify the target by its MZ marker (non-executables are safe),
//! 2. probe the target's size,
//! 3. check that `offset + 8` fits inside the file (otherwise safe),
//! 4. read the window at `offset` and compare it with the pattern.

use crate::core::config::Config;
use crate::core::error::{Result, Stage};
use crate::core::types::{SafeReason, ScanVerdict, SignatureRecord};
use crate::detection::matcher::{MatchOutcome, SignatureMatcher};
use crate::scanner::filetype::ExecutableClassifier;
use crate::scanner::size::SizeProbe;
use crate::utils::path::validate_path;
use std::path::Path;
use std::sync::Arc;

/// Scans one target file against one signature.
pub struct FileScanner {
    config: Arc<Config>,
}

impl FileScanner {
    /// Create a new file scanner with the given configuration.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Run the pipeline and return the verdict.
    pub fn scan(&self, target: &Path, signature: &SignatureRecord) -> Result<ScanVerdict> {
        validate_path(target, self.config.scan.max_path_len, Stage::Scan)?;
        log::debug!("Scanning {} for {}", target.display(), signature.name);

        if !ExecutableClassifier::classify(target)? {
            log::debug!("{} is not an executable", target.display());
            return Ok(self.finish(target, ScanVerdict::Safe(SafeReason::NotExecutable)));
        }

        let size = SizeProbe::probe(target)?;
        log::debug!("{} is an executable of {} bytes", target.display(), size);

        let verdict = match SignatureMatcher::match_file(target, signature, size)? {
            MatchOutcome::TooSmall => ScanVerdict::Safe(SafeReason::TooSmall),
            MatchOutcome::NoMatch => ScanVerdict::Safe(SafeReason::NoMatch),
            MatchOutcome::Match => ScanVerdict::Infected {
                name: signature.name.to_string(),
            },
        };

        Ok(self.finish(target, verdict))
    }

    fn finish(&self, target: &Path, verdict: ScanVerdict) -> ScanVerdict {
        match &verdict {
            ScanVerdict::Infected { name } => {
                log::warn!("Virus {} detected in {}", name, target.display())
            }
            ScanVerdict::Safe(reason) => log::info!("{} is safe ({})", target.display(), reason),
        }
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::core::types::{Pattern, SignatureName};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PATTERN: [u8; 8] = [0x4D, 0x5A, 0x90, 0x00, 0x03, 0x00, 0x00, 0x00];

    fn scanner() -> FileScanner {
        FileScanner::new(Arc::new(Config::default()))
    }

    fn signature(offset: u64) -> SignatureRecord {
        SignatureRecord::new(
            Pattern::new(PATTERN),
            offset,
            SignatureName::new("ExampleVirus").unwrap(),
        )
    }

    fn file_with(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    fn executable_with_pattern_at(offset: usize) -> Vec<u8> {
        let mut content = vec![0xCCu8; offset + 32];
        content[..2].copy_from_slice(b"MZ");
        content[offset..offset + 8].copy_from_slice(&PATTERN);
        content
    }

    #[test]
    fn test_not_executable() {
        let file = file_with(&[0x41, 0x41]);
        let verdict = scanner().scan(file.path(), &signature(0)).unwrap();
        assert_eq!(verdict, ScanVerdict::Safe(SafeReason::NotExecutable));
    }

    #[test]
    fn test_not_executable_even_if_pattern_present() {
        let mut content = executable_with_pattern_at(0x40);
        content[0] = b'Z';
        let file = file_with(&content);
        let verdict = scanner().scan(file.path(), &signature(0x40)).unwrap();
        assert_eq!(verdict, ScanVerdict::Safe(SafeReason::NotExecutable));
    }

    #[test]
    fn test_too_small() {
        let file = file_with(&[0x4D, 0x5A, 0x00, 0x00, 0x00]);
        let verdict = scanner().scan(file.path(), &signature(10)).unwrap();
        assert_eq!(verdict, ScanVerdict::Safe(SafeReason::TooSmall));
    }

    #[test]
    fn test_infected() {
        let file = file_with(&executable_with_pattern_at(0x100));
        let verdict = scanner().scan(file.path(), &signature(0x100)).unwrap();
        assert_eq!(
            verdict,
            ScanVerdict::Infected {
                name: "ExampleVirus".to_string()
            }
        );
        assert!(verdict.is_infected());
    }

    #[test]
    fn test_pattern_at_offset_zero() {
        // The pattern itself starts with MZ.
        let file = file_with(&PATTERN);
        let verdict = scanner().scan(file.path(), &signature(0)).unwrap();
        assert!(verdict.is_infected());
    }

    #[test]
    fn test_no_match() {
        let mut content = executable_with_pattern_at(0x100);
        content[0x105] = 0xFF;
        let file = file_with(&content);
        let verdict = scanner().scan(file.path(), &signature(0x100)).unwrap();
        assert_eq!(verdict, ScanVerdict::Safe(SafeReason::NoMatch));
    }

    #[test]
    fn test_pattern_elsewhere_is_no_match() {
        let file = file_with(&executable_with_pattern_at(0x80));
        let verdict = scanner().scan(file.path(), &signature(0x81)).unwrap();
        assert_eq!(verdict, ScanVerdict::Safe(SafeReason::NoMatch));
    }

    #[test]
    fn test_missing_target() {
        let dir = tempfile::tempdir().unwrap();
        let err = scanner()
            .scan(&dir.path().join("missing.exe"), &signature(0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceUnavailable);
    }

    #[test]
    fn test_one_byte_target_is_error() {
        let file = file_with(b"M");
        let err = scanner().scan(file.path(), &signature(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoFault);
    }

    #[test]
    fn test_empty_target_path() {
        let err = scanner().scan(Path::new(""), &signature(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.stage(), Some(Stage::Scan));
    }
}

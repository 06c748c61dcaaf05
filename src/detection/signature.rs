//! Signature definition loading.
//!
//! A definition is plain text made of whitespace-separated tokens:
//!
//! ```text
//! 4D 5A 90 00 03 00 00 00 1234 ExampleVirus
//! ```
//!
//! Eight hex byte tokens, a hex offset, and a single-word threat name. Tokens
//! are consumed strictly in order and the first bad token aborts the load.

use crate::core::error::{Error, IoOp, Result, Stage, Token};
use crate::core::types::{Pattern, SignatureName, SignatureRecord, MAX_PATH_LEN, PATTERN_LEN};
use crate::utils::path::validate_path;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Largest definition file accepted, in bytes. A valid definition needs at
/// most a few hundred.
pub const MAX_DEFINITION_LEN: u64 = 4096;

/// Loads a single signature definition from text.
#[derive(Debug, Clone)]
pub struct SignatureLoader {
    max_path_len: usize,
}

impl Default for SignatureLoader {
    fn default() -> Self {
        Self {
            max_path_len: MAX_PATH_LEN,
        }
    }
}

impl SignatureLoader {
    /// Create a loader accepting definition paths up to `max_path_len` characters.
    pub fn new(max_path_len: usize) -> Self {
        Self { max_path_len }
    }

    /// Load a signature record from a definition file.
    pub fn load(&self, path: &Path) -> Result<SignatureRecord> {
        validate_path(path, self.max_path_len, Stage::SignatureLoad)?;

        let mut contents = Vec::new();
        {
            let file =
                File::open(path).map_err(|e| Error::unavailable(Stage::SignatureLoad, path, e))?;
            file.take(MAX_DEFINITION_LEN + 1)
                .read_to_end(&mut contents)
                .map_err(|e| Error::io_fault(Stage::SignatureLoad, IoOp::Read, path, e))?;
        }
        if contents.len() as u64 > MAX_DEFINITION_LEN {
            return Err(Error::malformed(
                Token::Length,
                format!("file is larger than {} bytes", MAX_DEFINITION_LEN),
            ));
        }

        let record = Self::parse_bytes(&contents)?;
        log::debug!("Loaded signature {} from {}", record.name, path.display());
        Ok(record)
    }

    /// Parse a signature record from definition text.
    pub fn parse(text: &str) -> Result<SignatureRecord> {
        Self::parse_bytes(text.as_bytes())
    }

    /// Parse raw definition bytes. Only the name token has to be UTF-8; any
    /// other non-ASCII token is simply not valid hex.
    fn parse_bytes(data: &[u8]) -> Result<SignatureRecord> {
        let mut tokens = data
            .split(|b| b.is_ascii_whitespace())
            .filter(|t| !t.is_empty());

        let mut bytes = [0u8; PATTERN_LEN];
        for (i, slot) in bytes.iter_mut().enumerate() {
            let token = tokens
                .next()
                .ok_or_else(|| Error::malformed(Token::PatternByte(i), "missing"))?;
            *slot = parse_hex_byte(token)
                .ok_or_else(|| Error::malformed(Token::PatternByte(i), not_hex(token, "a hex byte")))?;
        }

        let token = tokens
            .next()
            .ok_or_else(|| Error::malformed(Token::Offset, "missing"))?;
        let offset = parse_hex_offset(token)
            .ok_or_else(|| Error::malformed(Token::Offset, not_hex(token, "a hex offset")))?;

        let token = tokens
            .next()
            .ok_or_else(|| Error::malformed(Token::Name, "missing"))?;
        let name = std::str::from_utf8(token)
            .map_err(|_| Error::malformed(Token::Name, "name is not valid UTF-8"))?;
        let name = SignatureName::new(name)?;

        let trailing = tokens.count();
        if trailing > 0 {
            log::debug!("Ignoring {} token(s) after signature name", trailing);
        }

        Ok(SignatureRecord::new(Pattern::new(bytes), offset, name))
    }
}

/// One or two hex digits, no prefix.
fn parse_hex_byte(token: &[u8]) -> Option<u8> {
    if token.is_empty() || token.len() > 2 || !token.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    // All ASCII hex digits, so this is valid UTF-8.
    u8::from_str_radix(std::str::from_utf8(token).ok()?, 16).ok()
}

/// Hex digits with an optional `0x`/`0X` prefix.
fn parse_hex_offset(token: &[u8]) -> Option<u64> {
    let digits = token
        .strip_prefix(b"0x")
        .or_else(|| token.strip_prefix(b"0X"))
        .unwrap_or(token);
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    u64::from_str_radix(std::str::from_utf8(digits).ok()?, 16).ok()
}

fn not_hex(token: &[u8], expected: &str) -> String {
    format!("{:?} is not {}", String::from_utf8_lossy(token), expected)
}

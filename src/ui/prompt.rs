//! Interactive prompting for the signature and target paths.

use crate::core::error::{Error, Result};
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::path::PathBuf;

pub const WELCOME: &str = "\
Welcome to sigscan!

This program checks a file on your computer for a virus.
A virus is recognised by its \"signature\": a short sequence of bytes found
at a known position inside infected Windows executables.
If the signature is found, the program names the virus; otherwise it
reports that the file is clean.
Note: paths are read up to the first space, so they must not contain spaces.
";

pub const SIGNATURE_PROMPT: &str = "\
Enter path to signature file:
Example: signature.txt or D:\\Bin1\\Bin2\\signature.txt
";

pub const TARGET_PROMPT: &str = "
Enter path to target file:
Example: target.exe or C:\\Bin1\\Bin2\\target.exe
";

/// Asks the user for paths over a pair of streams.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    /// Tokens read but not yet handed out
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pending: VecDeque::new(),
        }
    }

    /// Print the welcome banner.
    pub fn banner(&mut self) -> Result<()> {
        self.write(WELCOME, "welcome banner")
    }

    /// Print `prompt` and read one whitespace-delimited path.
    ///
    /// Blank lines are skipped. Further tokens on the same line are kept for
    /// the next call. End of input yields [`Error::MissingInput`].
    pub fn ask_path(&mut self, prompt: &str, what: &'static str) -> Result<PathBuf> {
        self.write(prompt, "prompt")?;

        let mut line = String::new();
        while self.pending.is_empty() {
            line.clear();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|source| Error::ConsoleRead { what, source })?;
            if read == 0 {
                return Err(Error::MissingInput(what));
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }

        match self.pending.pop_front() {
            Some(token) => {
                log::debug!("Read {}: {}", what, token);
                Ok(PathBuf::from(token))
            }
            None => Err(Error::MissingInput(what)),
        }
    }

    fn write(&mut self, text: &str, what: &'static str) -> Result<()> {
        self.output
            .write_all(text.as_bytes())
            .and_then(|_| self.output.flush())
            .map_err(|source| Error::ConsoleWrite { what, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use std::io::Cursor;

    #[test]
    fn test_ask_path() {
        let mut out = Vec::new();
        let mut prompter = Prompter::new(Cursor::new("\n  sig.txt\ntarget.exe\n"), &mut out);

        let sig = prompter.ask_path(SIGNATURE_PROMPT, "signature path").unwrap();
        let target = prompter.ask_path(TARGET_PROMPT, "target path").unwrap();
        assert_eq!(sig, PathBuf::from("sig.txt"));
        assert_eq!(target, PathBuf::from("target.exe"));

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Enter path to signature file"));
        assert!(printed.contains("Enter path to target file"));
    }

    #[test]
    fn test_both_paths_on_one_line() {
        let mut prompter = Prompter::new(Cursor::new("sig.txt target.exe\n"), Vec::new());

        let sig = prompter.ask_path(SIGNATURE_PROMPT, "signature path").unwrap();
        let target = prompter.ask_path(TARGET_PROMPT, "target path").unwrap();
        assert_eq!(sig, PathBuf::from("sig.txt"));
        assert_eq!(target, PathBuf::from("target.exe"));

        let err = prompter.ask_path(TARGET_PROMPT, "target path").unwrap_err();
        assert!(matches!(err, Error::MissingInput("target path")));
    }

    #[test]
    fn test_end_of_input() {
        let mut prompter = Prompter::new(Cursor::new("   \n"), Vec::new());
        let err = prompter.ask_path(TARGET_PROMPT, "target path").unwrap_err();
        assert!(matches!(err, Error::MissingInput("target path")));
        assert_eq!(err.kind(), ErrorKind::Console);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure() {
        let mut prompter = Prompter::new(Cursor::new("sig.txt\n"), BrokenPipe);
        assert!(matches!(
            prompter.banner(),
            Err(Error::ConsoleWrite { .. })
        ));
        assert!(matches!(
            prompter.ask_path(SIGNATURE_PROMPT, "signature path"),
            Err(Error::ConsoleWrite { .. })
        ));
    }
}

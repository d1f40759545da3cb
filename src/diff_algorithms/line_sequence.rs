use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::error::{Error, Result};

/// The lines of one input file. Each line keeps its terminator, so concatenating the
/// lines gives back the text exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSequence {
    lines: Vec<String>,
}

impl LineSequence {
    /// Split text into lines, keeping every `\n` (and any `\r` before it).
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_owned).collect(),
        }
    }

    /// Read a file as UTF-8 lines. Invalid sequences are replaced with U+FFFD.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read(path).map_err(|e| Error::io(path, e))?;
        let text = match String::from_utf8(raw) {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "{} is not valid UTF-8, replacing invalid sequences",
                    path.display()
                );
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        let sequence = Self::from_text(&text);
        debug!("Read {} lines from {}", sequence.len(), path.display());
        Ok(sequence)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for LineSequence {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(|s| s.as_ref().to_owned()).collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::LineSequence;
    use std::io::Write;

    #[test]
    fn keeps_terminators() {
        let seq = LineSequence::from_text("a\nb\r\nc");
        assert_eq!(seq.lines(), ["a\n", "b\r\n", "c"]);
        assert_eq!(seq.lines().concat(), "a\nb\r\nc");
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(LineSequence::from_text("").is_empty());
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let err = LineSequence::read("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, crate::Error::Io { .. }));
    }

    #[test]
    fn read_replaces_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"ok\n\xffbad\n").unwrap();
        let seq = LineSequence::read(file.path()).unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.lines()[1], "\u{fffd}bad\n");
    }
}

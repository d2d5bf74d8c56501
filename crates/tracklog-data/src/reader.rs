//! Lazy line reading from gzip-compressed tracking logs.
//!
//! [`LogLines`] decompresses on demand and yields one decoded line at a
//! time, so a log is never held in memory as a whole.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::debug;
use tracklog_core::error::{ExtractError, Result};

// ── LogLines ──────────────────────────────────────────────────────────────────

/// Iterator over the UTF-8 lines of a gzip stream.
///
/// Concatenated gzip members are read through to the end. A decoding
/// failure is yielded once as [`ExtractError::Decode`] and ends the
/// iteration; line terminators are stripped.
pub struct LogLines<R: Read> {
    lines: Lines<BufReader<MultiGzDecoder<R>>>,
    line_number: u64,
    failed: bool,
}

impl LogLines<File> {
    /// Open `path` for reading. The file handle lives as long as the
    /// iterator and is released when it is dropped.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ExtractError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Opened {}", path.display());
        Ok(Self::new(file))
    }
}

impl<R: Read> LogLines<R> {
    /// Wrap any reader producing gzip-compressed bytes.
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(MultiGzDecoder::new(reader)).lines(),
            line_number: 0,
            failed: false,
        }
    }

    /// 1-based number of the line most recently yielded, `0` before the
    /// first call to `next`.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }
}

impl<R: Read> Iterator for LogLines<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = self.lines.next()?;
        self.line_number += 1;
        match next {
            Ok(line) => Some(Ok(line)),
            Err(source) => {
                self.failed = true;
                Some(Err(ExtractError::Decode {
                    line: self.line_number,
                    source,
                }))
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    // ── LogLines ──────────────────────────────────────────────────────────────

    #[test]
    fn test_yields_lines_in_order() {
        let data = gzip(b"first\nsecond\r\nthird\n");
        let lines: Vec<String> = LogLines::new(Cursor::new(data))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_last_line_without_newline() {
        let data = gzip(b"a\nb");
        let lines: Vec<String> = LogLines::new(Cursor::new(data))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_reads_concatenated_members() {
        let mut data = gzip(b"one\n");
        data.extend(gzip(b"two\n"));
        let lines: Vec<String> = LogLines::new(Cursor::new(data))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn test_tracks_line_numbers() {
        let data = gzip(b"a\nb\n");
        let mut lines = LogLines::new(Cursor::new(data));
        assert_eq!(lines.line_number(), 0);
        lines.next();
        lines.next();
        assert_eq!(lines.line_number(), 2);
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_invalid_utf8_is_decode_error_and_stops() {
        let data = gzip(b"good\n\xff\xfe bad\nafter\n");
        let mut lines = LogLines::new(Cursor::new(data));
        assert_eq!(lines.next().unwrap().unwrap(), "good");

        let err = lines.next().unwrap().unwrap_err();
        assert!(matches!(err, ExtractError::Decode { line: 2, .. }));
        assert!(err.is_fatal());

        assert!(lines.next().is_none());
    }

    #[test]
    fn test_non_gzip_input_is_decode_error() {
        let mut lines = LogLines::new(Cursor::new(b"plain text, not gzip\n".to_vec()));
        let err = lines.next().unwrap().unwrap_err();
        assert!(matches!(err, ExtractError::Decode { .. }));
    }

    #[test]
    fn test_open_missing_file() {
        let err = LogLines::open(Path::new("/tmp/does-not-exist-tracklog-xyz.gz"))
            .err()
            .unwrap();
        assert!(matches!(err, ExtractError::FileRead { .. }));
    }

    #[test]
    fn test_open_file_and_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracking.log.gz");
        std::fs::write(&path, gzip(b"x\ny\n")).unwrap();

        let first: Vec<String> = LogLines::open(&path)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        let second: Vec<String> = LogLines::open(&path)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(first, vec!["x", "y"]);
        assert_eq!(first, second);
    }
}

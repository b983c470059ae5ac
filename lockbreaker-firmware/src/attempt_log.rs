//! Plain-text attempt log
//!
//! One line per combination tried, in the order they were tried:
//!
//! ```text
//! 2024-05-01 14:03:07 - Tried: 00-00-01 - Result: This Combination did not Work!
//! ```

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use lockbreaker_core::dial::Combination;
use lockbreaker_core::probe::ProbeOutcome;
use lockbreaker_core::traits::{AttemptLog, LogError};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One line of the attempt log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptRecord {
    /// Combination dialed
    pub combination: Combination,
    /// What the shackle probe saw
    pub outcome: ProbeOutcome,
    /// When the attempt was recorded
    pub timestamp: DateTime<Local>,
}

impl AttemptRecord {
    /// Stamp an attempt with the current local time
    pub fn now(combination: Combination, outcome: ProbeOutcome) -> Self {
        Self {
            combination,
            outcome,
            timestamp: Local::now(),
        }
    }
}

impl fmt::Display for AttemptRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = match self.outcome {
            ProbeOutcome::Open => "This Combination did Work",
            ProbeOutcome::Closed => "This Combination did not Work!",
        };
        write!(
            f,
            "{} - Tried: {} - Result: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.combination,
            result
        )
    }
}

/// Attempt log over any writer; every record is flushed before returning
pub struct AttemptWriter<W: Write> {
    writer: W,
    written: u32,
}

impl<W: Write> AttemptWriter<W> {
    /// Log to `writer`, which is taken as already positioned
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Records appended so far
    pub fn written(&self) -> u32 {
        self.written
    }

    fn write_record(&mut self, record: &AttemptRecord) -> io::Result<()> {
        writeln!(self.writer, "{record}")?;
        self.writer.flush()
    }
}

impl<W: Write> AttemptLog for AttemptWriter<W> {
    fn append(&mut self, combination: Combination, outcome: ProbeOutcome) -> Result<(), LogError> {
        let record = AttemptRecord::now(combination, outcome);
        self.write_record(&record).map_err(|e| {
            tracing::error!(%combination, error = %e, "failed to write attempt log");
            LogError::WriteFailed
        })?;
        self.written += 1;
        Ok(())
    }
}

/// Attempt log backed by a file
pub type FileAttemptLog = AttemptWriter<File>;

impl FileAttemptLog {
    /// Create (or truncate) the log at `path`
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        tracing::info!(path = %path.display(), "attempt log opened");
        Ok(Self::new(file))
    }

    /// Open the log at `path` for appending, creating it if needed
    ///
    /// Used when relaunching after a slip so earlier attempts stay on record.
    pub fn append_to(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing::info!(path = %path.display(), "attempt log opened for append");
        Ok(Self::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn combo(a: u8, b: u8, c: u8) -> Combination {
        Combination::new(a, b, c).unwrap()
    }

    #[test]
    fn test_record_format() {
        let timestamp = Local.with_ymd_and_hms(2024, 5, 1, 14, 3, 7).unwrap();
        let closed = AttemptRecord {
            combination: combo(0, 0, 1),
            outcome: ProbeOutcome::Closed,
            timestamp,
        };
        assert_eq!(
            closed.to_string(),
            "2024-05-01 14:03:07 - Tried: 00-00-01 - Result: This Combination did not Work!"
        );

        let open = AttemptRecord {
            outcome: ProbeOutcome::Open,
            combination: combo(12, 34, 5),
            ..closed
        };
        assert_eq!(
            open.to_string(),
            "2024-05-01 14:03:07 - Tried: 12-34-05 - Result: This Combination did Work"
        );
    }

    #[test]
    fn test_writer_appends_lines_in_order() {
        let mut buffer = Vec::new();
        let mut log = AttemptWriter::new(&mut buffer);
        log.append(combo(0, 0, 0), ProbeOutcome::Closed).unwrap();
        log.append(combo(0, 0, 1), ProbeOutcome::Open).unwrap();
        assert_eq!(log.written(), 2);
        drop(log);

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Tried: 00-00-00 - Result: This Combination did not Work!"));
        assert!(lines[1].ends_with("Tried: 00-00-01 - Result: This Combination did Work"));
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_reported() {
        let mut log = AttemptWriter::new(BrokenWriter);
        assert_eq!(
            log.append(combo(1, 2, 3), ProbeOutcome::Closed),
            Err(LogError::WriteFailed)
        );
        assert_eq!(log.written(), 0);
    }

    #[test]
    fn test_create_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Combinations.txt");
        std::fs::write(&path, "stale line from a previous run\n").unwrap();

        let mut log = FileAttemptLog::create(&path).unwrap();
        log.append(combo(39, 39, 39), ProbeOutcome::Closed).unwrap();
        drop(log);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("Tried: 39-39-39"));
    }

    #[test]
    fn test_append_keeps_earlier_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Combinations.txt");

        let mut first = FileAttemptLog::create(&path).unwrap();
        first.append(combo(0, 0, 39), ProbeOutcome::Closed).unwrap();
        first.append(combo(0, 1, 0), ProbeOutcome::Closed).unwrap();
        drop(first);

        let mut relaunched = FileAttemptLog::append_to(&path).unwrap();
        relaunched.append(combo(0, 1, 0), ProbeOutcome::Closed).unwrap();
        drop(relaunched);

        let text = std::fs::read_to_string(&path).unwrap();
        let tried: Vec<&str> = text
            .lines()
            .map(|line| line.split(" - ").nth(1).unwrap())
            .collect();
        assert_eq!(tried, ["Tried: 00-00-39", "Tried: 00-01-00", "Tried: 00-01-00"]);
    }
}

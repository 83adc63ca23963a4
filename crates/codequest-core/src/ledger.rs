//! The attempt ledger: an append-only CSV log of every evaluated answer.
//!
//! Rows are only ever appended. Reading is a full scan from the top, fresh
//! each time; there is no index.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Lines, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::error::TrainerError;
use crate::model::{is_storable_id, now_timestamp, Attempt, Topic, TIMESTAMP_FORMAT};

/// Header row of the ledger file.
pub const LEDGER_HEADER: &str =
    "attempt_id,student_id,topic,question_id,difficulty,correct,timestamp";

const FIELD_COUNT: usize = 7;

/// File-backed attempt log.
#[derive(Debug, Clone)]
pub struct AttemptLedger {
    path: PathBuf,
}

impl AttemptLedger {
    /// Open the ledger at `path`, writing the header if the file is new or empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let is_empty = std::fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);
        if is_empty {
            std::fs::write(&path, format!("{LEDGER_HEADER}\n"))
                .with_context(|| format!("failed to create ledger {}", path.display()))?;
        } else {
            let file = File::open(&path)
                .with_context(|| format!("failed to open ledger {}", path.display()))?;
            let mut first = String::new();
            BufReader::new(file).read_line(&mut first)?;
            anyhow::ensure!(
                first.trim_end() == LEDGER_HEADER,
                "{} is not an attempt ledger (unexpected header: {})",
                path.display(),
                first.trim_end()
            );
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one attempt and return its freshly generated id.
    pub fn record(
        &self,
        student_id: &str,
        topic: Topic,
        question_id: &str,
        question_difficulty: u8,
        correct: bool,
    ) -> Result<String> {
        let attempt = Attempt {
            attempt_id: Uuid::new_v4().simple().to_string(),
            student_id: student_id.to_string(),
            topic,
            question_id: question_id.to_string(),
            difficulty: question_difficulty,
            correct,
            timestamp: now_timestamp(),
        };
        self.append(&attempt)?;
        Ok(attempt.attempt_id)
    }

    /// Append an already-built attempt row.
    pub fn append(&self, attempt: &Attempt) -> Result<()> {
        for (name, value) in [
            ("student id", &attempt.student_id),
            ("question id", &attempt.question_id),
        ] {
            anyhow::ensure!(
                is_storable_id(value),
                "{name} {value:?} cannot be stored in the ledger"
            );
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open ledger {}", self.path.display()))?;
        // A torn or hand-edited last row must not swallow the new one.
        if !ends_with_newline(&mut file)? {
            tracing::warn!(path = %self.path.display(), "ledger did not end with a newline");
            writeln!(file)?;
        }
        writeln!(file, "{}", encode_row(attempt))
            .with_context(|| format!("failed to append to ledger {}", self.path.display()))?;

        tracing::debug!(
            attempt = %attempt.attempt_id,
            student = %attempt.student_id,
            question = %attempt.question_id,
            correct = attempt.correct,
            "recorded attempt"
        );
        Ok(())
    }

    /// Start a fresh scan over every recorded attempt, oldest first.
    pub fn iter(&self) -> Result<LedgerScan> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open ledger {}", self.path.display()))?;
        Ok(LedgerScan {
            lines: BufReader::new(file).lines(),
            line_no: 0,
        })
    }

    /// Read the whole ledger, failing on the first bad row.
    pub fn read_all(&self) -> Result<Vec<Attempt>> {
        self.iter()?.collect()
    }
}

/// Lazy iterator over ledger rows.
pub struct LedgerScan {
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl Iterator for LedgerScan {
    type Item = Result<Attempt>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e).context("failed to read ledger")),
            };
            self.line_no += 1;
            if self.line_no == 1 || line.trim().is_empty() {
                continue;
            }
            return Some(decode_row(&line, self.line_no).map_err(Into::into));
        }
    }
}

/// True for an empty file or one whose last byte is `\n`.
fn ends_with_newline(file: &mut File) -> Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn encode_row(a: &Attempt) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        a.attempt_id,
        a.student_id,
        a.topic,
        a.question_id,
        a.difficulty,
        u8::from(a.correct),
        a.timestamp.format(TIMESTAMP_FORMAT)
    )
}

fn decode_row(line: &str, line_no: usize) -> Result<Attempt, TrainerError> {
    let bad = |reason: String| TrainerError::MalformedAttempt {
        line: line_no,
        reason,
    };

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(bad(format!(
            "expected {FIELD_COUNT} fields, found {}",
            fields.len()
        )));
    }

    let topic: Topic = fields[2]
        .parse()
        .map_err(|e: TrainerError| bad(e.to_string()))?;
    let difficulty = fields[4]
        .parse::<u8>()
        .map_err(|_| bad(format!("invalid difficulty {:?}", fields[4])))?;
    let correct = match fields[5] {
        "1" => true,
        "0" => false,
        other => return Err(bad(format!("invalid correct flag {other:?}"))),
    };
    let timestamp = NaiveDateTime::parse_from_str(fields[6], TIMESTAMP_FORMAT)
        .map_err(|e| bad(format!("invalid timestamp {:?}: {e}", fields[6])))?;

    Ok(Attempt {
        attempt_id: fields[0].to_string(),
        student_id: fields[1].to_string(),
        topic,
        question_id: fields[3].to_string(),
        difficulty,
        correct,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ledger() -> (tempfile::TempDir, AttemptLedger) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = AttemptLedger::open(dir.path().join("data/attempts.csv")).unwrap();
        (dir, ledger)
    }

    #[test]
    fn open_writes_header_once() {
        let (_dir, ledger) = ledger();
        ledger.record("S001", Topic::Loops, "L1", 1, true).unwrap();
        let reopened = AttemptLedger::open(ledger.path()).unwrap();
        reopened.record("S001", Topic::Loops, "L1", 1, false).unwrap();

        let content = std::fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(content.matches(LEDGER_HEADER).count(), 1);
        assert!(content.starts_with(LEDGER_HEADER));
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn rejects_foreign_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attempts.csv");
        std::fs::write(&path, "name,score\nAda,3\n").unwrap();
        assert!(AttemptLedger::open(&path).is_err());
    }

    #[test]
    fn record_then_scan() {
        let (_dir, ledger) = ledger();
        let id = ledger.record("S001", Topic::Loops, "L1", 1, true).unwrap();
        ledger.record("S002", Topic::Functions, "F2", 2, false).unwrap();

        let attempts = ledger.read_all().unwrap();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].attempt_id, id);
        assert_eq!(attempts[0].topic, Topic::Loops);
        assert!(attempts[0].correct);
        assert_eq!(attempts[1].difficulty, 2);
        assert!(!attempts[1].correct);
    }

    #[test]
    fn attempt_ids_are_unique() {
        let (_dir, ledger) = ledger();
        let ids: HashSet<_> = (0..200)
            .map(|_| ledger.record("S001", Topic::Variables, "V1", 1, true).unwrap())
            .collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn history_is_never_rewritten() {
        let (_dir, ledger) = ledger();
        ledger.record("S001", Topic::Loops, "L1", 1, true).unwrap();
        ledger.record("S001", Topic::Loops, "L1", 1, false).unwrap();
        let before = ledger.read_all().unwrap();
        let bytes_before = std::fs::read_to_string(ledger.path()).unwrap();

        for _ in 0..5 {
            ledger.record("S002", Topic::Conditionals, "C1", 1, true).unwrap();
        }

        let after = ledger.read_all().unwrap();
        assert_eq!(&after[..before.len()], &before[..]);
        assert!(std::fs::read_to_string(ledger.path())
            .unwrap()
            .starts_with(&bytes_before));
    }

    #[test]
    fn scans_are_restartable() {
        let (_dir, ledger) = ledger();
        ledger.record("S001", Topic::Loops, "L1", 1, true).unwrap();
        let first: Vec<_> = ledger.iter().unwrap().collect::<Result<_>>().unwrap();
        let second: Vec<_> = ledger.iter().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reads_rows_from_older_tool() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attempts.csv");
        std::fs::write(
            &path,
            "attempt_id,student_id,topic,question_id,difficulty,correct,timestamp\r\n\
             1a2b3c4d,S001,Loops,L1,1,1,2025-03-01T10:00:00\r\n\
             5e6f7a8b,S001,Loops,L2,2,0,2025-03-01T10:01:00\r\n",
        )
        .unwrap();
        let ledger = AttemptLedger::open(&path).unwrap();
        let attempts = ledger.read_all().unwrap();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].attempt_id, "1a2b3c4d");
        assert!(!attempts[1].correct);
    }

    #[test]
    fn append_after_unterminated_row_starts_a_new_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attempts.csv");
        std::fs::write(
            &path,
            "attempt_id,student_id,topic,question_id,difficulty,correct,timestamp\n\
             1a2b3c4d,S001,Loops,L1,1,1,2025-03-01T10:00:00",
        )
        .unwrap();

        let ledger = AttemptLedger::open(&path).unwrap();
        let id = ledger.record("S002", Topic::Variables, "V1", 1, false).unwrap();

        let attempts = ledger.read_all().unwrap();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].attempt_id, "1a2b3c4d");
        assert_eq!(attempts[1].attempt_id, id);
        assert_eq!(attempts[1].student_id, "S002");

        ledger.record("S002", Topic::Variables, "V1", 1, true).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 4);
        assert!(!content.contains("\n\n"));
    }

    #[test]
    fn malformed_row_reports_line() {
        let (_dir, ledger) = ledger();
        ledger.record("S001", Topic::Loops, "L1", 1, true).unwrap();
        let mut file = OpenOptions::new().append(true).open(ledger.path()).unwrap();
        writeln!(file, "x,S001,Loops,L1,1,maybe,2025-03-01T10:00:00").unwrap();

        let results: Vec<_> = ledger.iter().unwrap().collect();
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        match err.downcast_ref::<TrainerError>() {
            Some(TrainerError::MalformedAttempt { line, .. }) => assert_eq!(*line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn refuses_ids_that_would_break_rows() {
        let (_dir, ledger) = ledger();
        assert!(ledger.record("S,1", Topic::Loops, "L1", 1, true).is_err());
        assert!(ledger.read_all().unwrap().is_empty());
    }
}

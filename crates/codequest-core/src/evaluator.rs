//! Answer normalization and comparison.
//!
//! Comparison is exact and case-sensitive. The only tolerance is whitespace:
//! - `predict` answers are trimmed, split into lines (`\n`, `\r\n` or `\r`),
//!   each line trimmed, and rejoined with `\n`.
//! - `fill` and `fix` answers are only trimmed at both ends.

use crate::model::{Question, QuestionKind};

/// Normalize program output for comparison.
pub fn normalize_output(s: &str) -> String {
    s.trim()
        .split("\r\n")
        .flat_map(|chunk| chunk.split(['\n', '\r']))
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Normalize a single-value or code answer for comparison.
pub fn normalize_plain(s: &str) -> &str {
    s.trim()
}

/// Judge a raw answer against the question's expected answer.
pub fn evaluate(question: &Question, raw_answer: &str) -> bool {
    match question.kind {
        QuestionKind::Predict => {
            normalize_output(raw_answer) == normalize_output(&question.expected_answer)
        }
        QuestionKind::Fill | QuestionKind::Fix => {
            normalize_plain(raw_answer) == normalize_plain(&question.expected_answer)
        }
    }
}

//! Per-student, per-topic adaptive difficulty.
//!
//! A bounded ratchet: each correct answer raises the estimate by
//! [`DIFFICULTY_STEP`], each wrong one lowers it by the same amount, and the
//! result is clamped to [`MIN_DIFFICULTY`], [`MAX_DIFFICULTY`]. The stored value
//! is never rounded; rounding happens only for display and for selection.

use anyhow::Result;

use crate::error::TrainerError;
use crate::model::{Topic, TopicStat, MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::roster::RosterStore;

/// How far one answer moves the estimate.
pub const DIFFICULTY_STEP: f64 = 0.2;

impl TopicStat {
    /// Apply one evaluated attempt.
    pub fn record_outcome(&mut self, correct: bool) {
        self.attempts += 1;
        if correct {
            self.correct += 1;
            self.difficulty = (self.difficulty + DIFFICULTY_STEP).min(MAX_DIFFICULTY);
        } else {
            self.difficulty = (self.difficulty - DIFFICULTY_STEP).max(MIN_DIFFICULTY);
        }
    }
}

/// Apply an outcome to a student's topic stat and persist the roster before
/// returning the updated stat.
pub fn update_student_stats(
    roster: &RosterStore,
    student_id: &str,
    topic: Topic,
    correct: bool,
) -> Result<TopicStat> {
    let mut students = roster.load()?;
    let student = students
        .get_mut(student_id)
        .ok_or_else(|| TrainerError::UnknownStudent(student_id.to_string()))?;

    let stat = student.stat_mut(topic);
    stat.record_outcome(correct);
    let updated = *stat;

    roster.save(&students)?;
    tracing::debug!(
        student = student_id,
        topic = %topic,
        correct,
        difficulty = updated.difficulty,
        "updated topic stat"
    );
    Ok(updated)
}

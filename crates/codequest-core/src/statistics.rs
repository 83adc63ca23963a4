//! Mastery statistics over the attempt ledger.
//!
//! Reports are always recomputed from a full scan; nothing here is cached or
//! persisted, so the same ledger and roster always yield the same report.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::ledger::AttemptLedger;
use crate::model::{mastery_pct, Attempt, Topic};
use crate::report::{ClassTopicAggregate, StudentReport, TeacherReport, TopicMastery};
use crate::roster::Roster;

/// Student mastery at or above this is `Strong`.
pub const STRONG_MIN_PCT: u32 = 85;
/// Student mastery below this is `Needs Improvement`.
pub const NEEDS_IMPROVEMENT_BELOW_PCT: u32 = 65;
/// Class mastery at or above this is `Improving`.
pub const IMPROVING_MIN_PCT: u32 = 80;
/// Class mastery below this is `Declining`.
pub const DECLINING_BELOW_PCT: u32 = 65;
/// Attempted topics below this are called out in the recommendation.
pub const RECOMMEND_BELOW_PCT: u32 = 70;

/// Name used for students missing from the roster.
pub const UNKNOWN_STUDENT_NAME: &str = "Unknown";

/// Per-student, per-topic classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MasteryStatus {
    NoData,
    NeedsImprovement,
    Stable,
    Strong,
}

impl MasteryStatus {
    pub fn classify(attempts: u32, pct: u32) -> Self {
        if attempts == 0 {
            MasteryStatus::NoData
        } else if pct >= STRONG_MIN_PCT {
            MasteryStatus::Strong
        } else if pct < NEEDS_IMPROVEMENT_BELOW_PCT {
            MasteryStatus::NeedsImprovement
        } else {
            MasteryStatus::Stable
        }
    }
}

impl fmt::Display for MasteryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MasteryStatus::NoData => write!(f, "No Data"),
            MasteryStatus::NeedsImprovement => write!(f, "Needs Improvement"),
            MasteryStatus::Stable => write!(f, "Stable"),
            MasteryStatus::Strong => write!(f, "Strong"),
        }
    }
}

/// Class-wide direction for a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassTrend {
    Declining,
    Stable,
    Improving,
}

impl ClassTrend {
    pub fn classify(pct: u32) -> Self {
        if pct < DECLINING_BELOW_PCT {
            ClassTrend::Declining
        } else if pct >= IMPROVING_MIN_PCT {
            ClassTrend::Improving
        } else {
            ClassTrend::Stable
        }
    }
}

impl fmt::Display for ClassTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassTrend::Declining => write!(f, "Declining"),
            ClassTrend::Stable => write!(f, "Stable"),
            ClassTrend::Improving => write!(f, "Improving"),
        }
    }
}

/// Buckets wrong answers are sorted into. Declaration order breaks ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MistakeCategory {
    IncorrectAnswer,
}

impl MistakeCategory {
    pub fn label(&self) -> &'static str {
        match self {
            MistakeCategory::IncorrectAnswer => "Incorrect answers",
        }
    }
}

impl fmt::Display for MistakeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which bucket a wrong attempt falls into; `None` for correct attempts.
pub fn classify_mistake(attempt: &Attempt) -> Option<MistakeCategory> {
    if attempt.correct {
        None
    } else {
        Some(MistakeCategory::IncorrectAnswer)
    }
}

/// Attempt and correct counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub attempts: u32,
    pub correct: u32,
}

impl Tally {
    fn add(&mut self, correct: bool) {
        self.attempts += 1;
        if correct {
            self.correct += 1;
        }
    }

    pub fn mastery_pct(&self) -> u32 {
        mastery_pct(self.correct, self.attempts)
    }
}

#[derive(Debug, Default)]
struct TopicAccumulator {
    tally: Tally,
    mistakes: BTreeMap<MistakeCategory, u32>,
}

/// Single-pass reducer over attempts.
#[derive(Debug, Default)]
pub struct Aggregator {
    /// Student ids in order of first appearance.
    student_order: Vec<String>,
    per_student: HashMap<String, BTreeMap<Topic, Tally>>,
    per_topic: BTreeMap<Topic, TopicAccumulator>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one attempt into the counters.
    pub fn add(&mut self, attempt: &Attempt) {
        if !self.per_student.contains_key(&attempt.student_id) {
            self.student_order.push(attempt.student_id.clone());
        }
        self.per_student
            .entry(attempt.student_id.clone())
            .or_default()
            .entry(attempt.topic)
            .or_default()
            .add(attempt.correct);

        let class = self.per_topic.entry(attempt.topic).or_default();
        class.tally.add(attempt.correct);
        if let Some(category) = classify_mistake(attempt) {
            *class.mistakes.entry(category).or_default() += 1;
        }
    }

    /// Produce the report, naming students from the roster.
    pub fn finish(self, roster: &Roster) -> TeacherReport {
        let students = self
            .student_order
            .iter()
            .map(|id| {
                let tallies = self.per_student.get(id);
                let topics: Vec<TopicMastery> = Topic::ALL
                    .into_iter()
                    .map(|topic| {
                        let tally = tallies
                            .and_then(|t| t.get(&topic))
                            .copied()
                            .unwrap_or_default();
                        let pct = tally.mastery_pct();
                        TopicMastery {
                            topic,
                            attempts: tally.attempts,
                            correct: tally.correct,
                            mastery_pct: pct,
                            status: MasteryStatus::classify(tally.attempts, pct),
                        }
                    })
                    .collect();
                let focus_topics = topics
                    .iter()
                    .filter(|t| t.attempts > 0 && t.mastery_pct < RECOMMEND_BELOW_PCT)
                    .map(|t| t.topic)
                    .collect();
                let name = roster
                    .get(id)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| UNKNOWN_STUDENT_NAME.to_string());

                StudentReport {
                    student_id: id.clone(),
                    name,
                    topics,
                    focus_topics,
                }
            })
            .collect();

        let topics = Topic::ALL
            .into_iter()
            .map(|topic| {
                let acc = self.per_topic.get(&topic);
                let tally = acc.map(|a| a.tally).unwrap_or_default();
                let mistakes = acc.map(|a| a.mistakes.clone()).unwrap_or_default();
                let pct = tally.mastery_pct();
                ClassTopicAggregate {
                    topic,
                    attempts: tally.attempts,
                    correct: tally.correct,
                    mastery_pct: pct,
                    trend: ClassTrend::classify(pct),
                    common_mistake: most_common_mistake(&mistakes),
                    mistakes,
                }
            })
            .collect();

        TeacherReport { students, topics }
    }
}

/// The bucket with the highest count; ties go to the earlier bucket.
fn most_common_mistake(mistakes: &BTreeMap<MistakeCategory, u32>) -> Option<MistakeCategory> {
    mistakes
        .iter()
        .filter(|(_, n)| **n > 0)
        .fold(None, |best: Option<(MistakeCategory, u32)>, (&category, &n)| match best {
            Some((_, top)) if top >= n => best,
            _ => Some((category, n)),
        })
        .map(|(category, _)| category)
}

/// Reduce a sequence of attempts and the current roster into a report.
pub fn generate<'a>(
    attempts: impl IntoIterator<Item = &'a Attempt>,
    roster: &Roster,
) -> TeacherReport {
    let mut aggregator = Aggregator::new();
    for attempt in attempts {
        aggregator.add(attempt);
    }
    aggregator.finish(roster)
}

/// Scan the ledger once and build a report.
pub fn generate_from_ledger(ledger: &AttemptLedger, roster: &Roster) -> Result<TeacherReport> {
    let mut aggregator = Aggregator::new();
    for attempt in ledger.iter()? {
        aggregator.add(&attempt?);
    }
    let report = aggregator.finish(roster);
    tracing::info!(
        students = report.students.len(),
        attempts = report.total_attempts(),
        "aggregated ledger"
    );
    Ok(report)
}

//! Core data model types for codequest.
//!
//! Questions, students with their per-topic stats, and ledger attempts.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

use crate::error::TrainerError;

/// Lowest student difficulty estimate.
pub const MIN_DIFFICULTY: f64 = 1.0;
/// Highest student difficulty estimate.
pub const MAX_DIFFICULTY: f64 = 3.0;

/// Timestamp format shared by the roster and the ledger.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Current local time truncated to whole seconds.
pub fn now_timestamp() -> NaiveDateTime {
    chrono::Local::now().naive_local().trunc_subsecs(0)
}

/// Subject areas questions are grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Topic {
    Variables,
    Conditionals,
    Loops,
    Functions,
}

impl Topic {
    /// Every topic, in the order menus and reports list them.
    pub const ALL: [Topic; 4] = [
        Topic::Variables,
        Topic::Conditionals,
        Topic::Loops,
        Topic::Functions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Variables => "Variables",
            Topic::Conditionals => "Conditionals",
            Topic::Loops => "Loops",
            Topic::Functions => "Functions",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TrainerError::UnknownTopic(s.trim().to_string()))
    }
}

/// How a question is answered, which decides how answers are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Predict the program's output.
    Predict,
    /// Fill in a blank.
    Fill,
    /// Fix broken code.
    Fix,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Predict => write!(f, "predict"),
            QuestionKind::Fill => write!(f, "fill"),
            QuestionKind::Fix => write!(f, "fix"),
        }
    }
}

/// A single catalogue question. Never mutated once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier (e.g. "L1").
    pub id: String,
    pub topic: Topic,
    /// Intrinsic difficulty tier, 1 to 3.
    pub difficulty: u8,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub prompt: String,
    /// The answer a submission is compared against.
    #[serde(rename = "answer")]
    pub expected_answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    /// Whether the expected answer spans more than one line.
    pub fn is_multiline(&self) -> bool {
        self.expected_answer.trim().contains('\n')
    }
}

/// Attempt counters and adaptive difficulty for one student on one topic.
///
/// `correct <= attempts` always holds, and `difficulty` stays within
/// [`MIN_DIFFICULTY`, `MAX_DIFFICULTY`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopicStat {
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub correct: u32,
    #[serde(default = "default_difficulty")]
    pub difficulty: f64,
}

fn default_difficulty() -> f64 {
    MIN_DIFFICULTY
}

impl Default for TopicStat {
    fn default() -> Self {
        Self {
            attempts: 0,
            correct: 0,
            difficulty: MIN_DIFFICULTY,
        }
    }
}

impl TopicStat {
    /// Percentage of correct attempts, rounded down. Zero when unattempted.
    pub fn mastery_pct(&self) -> u32 {
        mastery_pct(self.correct, self.attempts)
    }

    /// Difficulty as shown to people: one decimal place.
    pub fn display_difficulty(&self) -> String {
        format!("{:.1}", self.difficulty)
    }
}

/// `floor(100 * correct / attempts)`, or 0 when there are no attempts.
pub fn mastery_pct(correct: u32, attempts: u32) -> u32 {
    if attempts == 0 {
        return 0;
    }
    (u64::from(correct) * 100 / u64::from(attempts)) as u32
}

/// Whether an id can go into a ledger row unquoted.
pub fn is_storable_id(id: &str) -> bool {
    !id.is_empty() && !id.contains([',', '\n', '\r'])
}

/// A learner profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Sequential identifier (`S001`, `S002`, ...).
    pub id: String,
    pub name: String,
    pub created_at: NaiveDateTime,
    /// One entry per topic.
    #[serde(default)]
    pub stats: BTreeMap<Topic, TopicStat>,
}

impl Student {
    /// Create a fresh profile with default stats for every topic.
    pub fn new(id: impl Into<String>, name: impl Into<String>, created_at: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at,
            stats: Topic::ALL
                .into_iter()
                .map(|t| (t, TopicStat::default()))
                .collect(),
        }
    }

    /// Stats for a topic; defaults if the profile predates the topic.
    pub fn stat(&self, topic: Topic) -> TopicStat {
        self.stats.get(&topic).copied().unwrap_or_default()
    }

    pub fn stat_mut(&mut self, topic: Topic) -> &mut TopicStat {
        self.stats.entry(topic).or_default()
    }
}

/// One evaluated answer event, as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub attempt_id: String,
    pub student_id: String,
    pub topic: Topic,
    pub question_id: String,
    /// The question's intrinsic difficulty, not the student's estimate.
    pub difficulty: u8,
    pub correct: bool,
    pub timestamp: NaiveDateTime,
}

//! Teacher report types with JSON persistence.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Topic;
use crate::statistics::{ClassTrend, MasteryStatus, MistakeCategory};

/// A complete teacher report: per-student breakdowns plus class summary rows.
///
/// Built fresh from the ledger every time; see [`crate::statistics::generate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherReport {
    /// Students with at least one attempt, in order of first attempt.
    pub students: Vec<StudentReport>,
    /// One row per topic, in [`Topic::ALL`] order.
    pub topics: Vec<ClassTopicAggregate>,
}

/// One student's breakdown across every topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentReport {
    pub student_id: String,
    pub name: String,
    pub topics: Vec<TopicMastery>,
    /// Attempted topics whose mastery is below the recommendation threshold.
    pub focus_topics: Vec<Topic>,
}

/// A student's result on one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicMastery {
    pub topic: Topic,
    pub attempts: u32,
    pub correct: u32,
    pub mastery_pct: u32,
    pub status: MasteryStatus,
}

/// Class-wide figures for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassTopicAggregate {
    pub topic: Topic,
    pub attempts: u32,
    pub correct: u32,
    pub mastery_pct: u32,
    pub trend: ClassTrend,
    /// Wrong-answer counts per bucket.
    pub mistakes: BTreeMap<MistakeCategory, u32>,
    pub common_mistake: Option<MistakeCategory>,
}

impl ClassTopicAggregate {
    /// The label shown in the summary table; empty when nobody got it wrong.
    pub fn common_mistake_label(&self) -> &'static str {
        self.common_mistake.map(|m| m.label()).unwrap_or("")
    }
}

impl StudentReport {
    pub fn topic(&self, topic: Topic) -> Option<&TopicMastery> {
        self.topics.iter().find(|t| t.topic == topic)
    }
}

impl TeacherReport {
    pub fn topic(&self, topic: Topic) -> Option<&ClassTopicAggregate> {
        self.topics.iter().find(|t| t.topic == topic)
    }

    pub fn student(&self, id: &str) -> Option<&StudentReport> {
        self.students.iter().find(|s| s.student_id == id)
    }

    pub fn total_attempts(&self) -> u32 {
        self.topics.iter().map(|t| t.attempts).sum()
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: TeacherReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

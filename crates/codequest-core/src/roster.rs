//! The student roster: a JSON mapping from student id to profile.
//!
//! The file is always read and rewritten whole. There is no locking; one
//! process owns the data directory at a time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::TrainerError;
use crate::model::{now_timestamp, Student, MAX_DIFFICULTY, MIN_DIFFICULTY};

/// Students keyed by id.
pub type Roster = BTreeMap<String, Student>;

/// File-backed roster.
#[derive(Debug, Clone)]
pub struct RosterStore {
    path: PathBuf,
}

impl RosterStore {
    /// Open the roster at `path`, creating an empty one if it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };
        if !store.path.exists() {
            store.save(&Roster::new())?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole roster.
    pub fn load(&self) -> Result<Roster> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read roster from {}", self.path.display()))?;
        let mut roster: Roster = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse roster {}", self.path.display()))?;

        for student in roster.values_mut() {
            for (topic, stat) in student.stats.iter_mut() {
                anyhow::ensure!(
                    stat.correct <= stat.attempts,
                    "student {} has more correct answers than attempts on {}",
                    student.id,
                    topic
                );
                stat.difficulty = stat.difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
            }
        }
        Ok(roster)
    }

    /// Replace the whole roster on disk.
    pub fn save(&self, roster: &Roster) -> Result<()> {
        let json = serde_json::to_string_pretty(roster).context("failed to serialize roster")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write roster to {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), students = roster.len(), "saved roster");
        Ok(())
    }

    /// Create a profile with the next sequential id.
    pub fn create_student(&self, name: &str) -> Result<Student> {
        let name = name.trim();
        anyhow::ensure!(!name.is_empty(), "student name must not be empty");

        let mut roster = self.load()?;
        let id = next_student_id(&roster);
        let student = Student::new(id.clone(), name, now_timestamp());
        roster.insert(id.clone(), student.clone());
        self.save(&roster)?;

        tracing::info!(student = %id, name, "created student");
        Ok(student)
    }

    /// Look up a student by id.
    pub fn find(&self, id: &str) -> Result<Option<Student>> {
        Ok(self.load()?.remove(id.trim()))
    }

    /// Look up a student, treating absence as a selection error.
    pub fn get(&self, id: &str) -> Result<Student> {
        self.find(id)?
            .ok_or_else(|| TrainerError::UnknownStudent(id.trim().to_string()).into())
    }

    /// All students ordered by id.
    pub fn list(&self) -> Result<Vec<Student>> {
        Ok(self.load()?.into_values().collect())
    }
}

/// Highest numeric suffix among `S###` ids, plus one.
///
/// Not safe against two processes creating students at once.
pub fn next_student_id(roster: &Roster) -> String {
    let max = roster
        .keys()
        .filter_map(|id| id.strip_prefix('S'))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("S{:03}", max + 1)
}

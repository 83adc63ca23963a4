//! TOML question bank parser.
//!
//! Loads question banks from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{is_storable_id, Question, QuestionKind, Topic};

/// A parsed question bank file.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    pub id: String,
    pub name: String,
    pub description: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    topic: String,
    #[serde(default = "default_difficulty")]
    difficulty: u8,
    #[serde(rename = "type")]
    kind: QuestionKind,
    prompt: String,
    answer: String,
    #[serde(default)]
    explanation: String,
}

fn default_difficulty() -> u8 {
    1
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank`.
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let topic: Topic = q
                .topic
                .parse()
                .with_context(|| format!("question {}", q.id))?;
            anyhow::ensure!(
                (1..=3).contains(&q.difficulty),
                "question {}: difficulty must be 1, 2 or 3 (got {})",
                q.id,
                q.difficulty
            );
            Ok(Question {
                id: q.id,
                topic,
                difficulty: q.difficulty,
                kind: q.kind,
                prompt: q.prompt,
                expected_answer: q.answer,
                explanation: q.explanation,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions,
    })
}

/// Recursively load all `.toml` bank files from a directory.
///
/// Files are visited in name order so the combined declaration order is
/// stable between runs.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match load_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a bank file, or every bank in a directory.
pub fn load_banks(path: &Path) -> Result<Vec<QuestionBank>> {
    if path.is_dir() {
        load_bank_directory(path)
    } else {
        Ok(vec![load_bank(path)?])
    }
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    pub message: String,
}

/// Check a set of questions for problems the catalogue or ledger would trip on.
pub fn validate_questions(questions: &[Question]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for q in questions {
        if !seen_ids.insert(&q.id) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("duplicate question ID: {}", q.id),
            });
        }
    }

    for q in questions {
        if !is_storable_id(&q.id) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: "question ID must be non-empty without commas or line breaks".into(),
            });
        }
        if !(1..=3).contains(&q.difficulty) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("difficulty {} is outside 1..=3", q.difficulty),
            });
        }
        if q.prompt.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: "prompt is empty".into(),
            });
        }
        if q.expected_answer.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: "answer is empty".into(),
            });
        }
    }

    for topic in Topic::ALL {
        if !questions.iter().any(|q| q.topic == topic) {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("no question for topic {topic}"),
            });
        }
    }

    warnings
}

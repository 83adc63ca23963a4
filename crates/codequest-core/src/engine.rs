//! The trainer: the calls the command-line layer makes.
//!
//! Every call is synchronous and leaves nothing behind except what it wrote
//! to the roster or the ledger.

use std::fmt;

use anyhow::Result;

use crate::bank::load_banks;
use crate::catalogue::Catalogue;
use crate::config::CodequestConfig;
use crate::evaluator::evaluate;
use crate::ledger::AttemptLedger;
use crate::model::{Question, Student, Topic, TopicStat};
use crate::report::TeacherReport;
use crate::roster::RosterStore;
use crate::statistics::generate_from_ledger;
use crate::tracker;

/// Judgement on a submitted answer, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub correct: bool,
    pub explanation: String,
}

/// Everything that happened when an answer was submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub evaluation: Evaluation,
    pub attempt_id: String,
    /// The student's stat for the topic after the update.
    pub stat: TopicStat,
}

/// One line of a student's progress overview.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressLine {
    pub topic: Topic,
    pub attempts: u32,
    pub correct: u32,
    pub mastery_pct: u32,
    pub difficulty: f64,
}

impl fmt::Display for ProgressLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {}: {}% ({}/{}) | difficulty {:.1}",
            self.topic, self.mastery_pct, self.correct, self.attempts, self.difficulty
        )
    }
}

/// Catalogue plus the two file-backed stores.
#[derive(Debug, Clone)]
pub struct Trainer {
    catalogue: Catalogue,
    roster: RosterStore,
    ledger: AttemptLedger,
}

impl Trainer {
    pub fn new(catalogue: Catalogue, roster: RosterStore, ledger: AttemptLedger) -> Self {
        Self {
            catalogue,
            roster,
            ledger,
        }
    }

    /// Open the stores under the configured data directory and load the
    /// configured question bank (or the built-in one).
    ///
    /// Fails if the bank leaves any topic without a question.
    pub fn open(config: &CodequestConfig) -> Result<Self> {
        let catalogue = match &config.question_bank {
            Some(path) => {
                let questions = load_banks(path)?
                    .into_iter()
                    .flat_map(|bank| bank.questions)
                    .collect();
                Catalogue::new(questions)?
            }
            None => Catalogue::builtin(),
        };
        let roster = RosterStore::open(config.students_path())?;
        let ledger = AttemptLedger::open(config.attempts_path())?;
        Ok(Self::new(catalogue, roster, ledger))
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    pub fn ledger(&self) -> &AttemptLedger {
        &self.ledger
    }

    pub fn create_student(&self, name: &str) -> Result<Student> {
        self.roster.create_student(name)
    }

    pub fn student(&self, id: &str) -> Result<Student> {
        self.roster.get(id)
    }

    pub fn students(&self) -> Result<Vec<Student>> {
        self.roster.list()
    }

    /// Choose the next question for a student from their stored difficulty.
    pub fn pick_question(&self, student_id: &str, topic: Topic) -> Result<&Question> {
        let student = self.roster.get(student_id)?;
        let difficulty = student.stat(topic).difficulty;
        Ok(self.catalogue.select(topic, difficulty)?)
    }

    /// Judge an answer without recording anything.
    pub fn present_question(&self, question: &Question, raw_answer: &str) -> Evaluation {
        Evaluation {
            correct: evaluate(question, raw_answer),
            explanation: if question.explanation.is_empty() {
                "No explanation available.".to_string()
            } else {
                question.explanation.clone()
            },
        }
    }

    pub fn update_student_stats(
        &self,
        student_id: &str,
        topic: Topic,
        correct: bool,
    ) -> Result<TopicStat> {
        tracker::update_student_stats(&self.roster, student_id, topic, correct)
    }

    /// Evaluate an answer, append it to the ledger, then update the student.
    ///
    /// The ledger append and the roster update are two separate writes with no
    /// rollback. If the process dies between them the ledger holds an attempt
    /// the student's counters and difficulty never saw; nothing reconciles
    /// the two afterwards.
    pub fn submit_answer(
        &self,
        student_id: &str,
        question: &Question,
        raw_answer: &str,
    ) -> Result<AnswerOutcome> {
        // Reject unknown students before anything is written.
        self.roster.get(student_id)?;

        let evaluation = self.present_question(question, raw_answer);
        let attempt_id = self.ledger.record(
            student_id,
            question.topic,
            &question.id,
            question.difficulty,
            evaluation.correct,
        )?;
        let stat = self.update_student_stats(student_id, question.topic, evaluation.correct)?;

        Ok(AnswerOutcome {
            evaluation,
            attempt_id,
            stat,
        })
    }

    /// Per-topic progress for a student, in topic order.
    pub fn show_progress(&self, student_id: &str) -> Result<Vec<ProgressLine>> {
        let student = self.roster.get(student_id)?;
        Ok(progress_lines(&student))
    }

    /// Aggregate the full ledger against the current roster.
    pub fn generate_teacher_report(&self) -> Result<TeacherReport> {
        let roster = self.roster.load()?;
        generate_from_ledger(&self.ledger, &roster)
    }
}

/// Progress lines straight from a loaded profile.
pub fn progress_lines(student: &Student) -> Vec<ProgressLine> {
    Topic::ALL
        .into_iter()
        .map(|topic| {
            let stat = student.stat(topic);
            ProgressLine {
                topic,
                attempts: stat.attempts,
                correct: stat.correct,
                mastery_pct: stat.mastery_pct(),
                difficulty: stat.difficulty,
            }
        })
        .collect()
}

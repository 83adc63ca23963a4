//! The interactive `codequest play` session.
//!
//! Generic over its input and output so a whole session can be scripted.
//! Closed input behaves like choosing "back" at every level, so the session
//! always unwinds to a clean exit.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use codequest_core::lesson::lesson;
use codequest_core::model::{Question, Topic};
use codequest_core::{Trainer, TrainerError};

use super::report::{write_reports, DEFAULT_FORMATS};

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (config, trainer) = super::open_trainer(config_path)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(
        &trainer,
        config.report_dir().to_path_buf(),
        stdin.lock(),
        stdout.lock(),
    );
    session.run()
}

pub struct Session<'a, R, W> {
    trainer: &'a Trainer,
    report_dir: PathBuf,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(trainer: &'a Trainer, report_dir: PathBuf, input: R, out: W) -> Self {
        Self {
            trainer,
            report_dir,
            input,
            out,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        writeln!(self.out, "Welcome to CodeQuest")?;
        loop {
            writeln!(self.out, "\nMain Menu:")?;
            writeln!(self.out, "1) Login / Select Student")?;
            writeln!(self.out, "2) Create Student Profile")?;
            writeln!(self.out, "3) Generate Teacher Reports")?;
            writeln!(self.out, "4) Quit")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                break;
            };
            match choice.as_str() {
                "1" => {
                    if let Some(student_id) = self.select_student()? {
                        self.student_menu(&student_id)?;
                    }
                }
                "2" => {
                    self.create_student()?;
                }
                "3" => self.generate_reports()?,
                "4" => break,
                _ => writeln!(self.out, "Invalid choice, try again.")?,
            }
        }
        writeln!(self.out, "Goodbye!")?;
        Ok(())
    }

    /// Print a prompt and read one trimmed line. `None` once input is closed.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(self.read_line()?.map(|l| l.trim().to_string()))
    }

    /// One raw line without its terminator.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn create_student(&mut self) -> Result<Option<String>> {
        let Some(name) = self.prompt("Enter student name: ")? else {
            return Ok(None);
        };
        if name.is_empty() {
            writeln!(self.out, "Name cannot be empty.")?;
            return Ok(None);
        }
        let student = self.trainer.create_student(&name)?;
        writeln!(
            self.out,
            "Created student {} with ID {}",
            student.name, student.id
        )?;
        Ok(Some(student.id))
    }

    fn select_student(&mut self) -> Result<Option<String>> {
        let students = self.trainer.students()?;
        if students.is_empty() {
            writeln!(self.out, "No students found. Please create a profile.")?;
            return Ok(None);
        }
        writeln!(self.out, "Choose a student:")?;
        for s in &students {
            writeln!(self.out, "{}: {}", s.id, s.name)?;
        }
        let Some(choice) = self.prompt("Enter student ID (or type \"new\"): ")? else {
            return Ok(None);
        };
        if choice.eq_ignore_ascii_case("new") {
            return self.create_student();
        }
        if students.iter().any(|s| s.id == choice) {
            return Ok(Some(choice));
        }
        writeln!(self.out, "Invalid choice. Try again.")?;
        Ok(None)
    }

    fn student_menu(&mut self, student_id: &str) -> Result<()> {
        loop {
            writeln!(self.out, "\nStudent Menu:")?;
            writeln!(self.out, "1) Show progress")?;
            writeln!(self.out, "2) Select topic")?;
            writeln!(self.out, "3) Back to main menu")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                return Ok(());
            };
            match choice.as_str() {
                "1" => self.show_progress(student_id)?,
                "2" => {
                    if let Some(topic) = self.select_topic()? {
                        self.practice(student_id, topic)?;
                    }
                }
                "3" => return Ok(()),
                _ => writeln!(self.out, "Invalid choice.")?,
            }
        }
    }

    fn show_progress(&mut self, student_id: &str) -> Result<()> {
        writeln!(self.out, "\nProgress overview:")?;
        for line in self.trainer.show_progress(student_id)? {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn select_topic(&mut self) -> Result<Option<Topic>> {
        writeln!(self.out, "\nTopics:")?;
        for (i, topic) in Topic::ALL.iter().enumerate() {
            writeln!(self.out, "{}) {topic}", i + 1)?;
        }
        let Some(choice) = self.prompt("Select topic number: ")? else {
            return Ok(None);
        };
        let topic = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| Topic::ALL.get(i).copied());
        if topic.is_none() {
            writeln!(self.out, "Invalid selection.")?;
        }
        Ok(topic)
    }

    /// Lesson, question, answer, feedback: one round on a topic.
    fn practice(&mut self, student_id: &str, topic: Topic) -> Result<()> {
        writeln!(self.out, "\nLesson:")?;
        writeln!(self.out, "{}\n", lesson(topic))?;

        let question = match self.trainer.pick_question(student_id, topic) {
            Ok(q) => q.clone(),
            Err(e) => return self.recover(e),
        };
        writeln!(self.out, "Question:")?;
        writeln!(self.out, "{}", question.prompt)?;

        let Some(answer) = self.read_answer(&question)? else {
            return Ok(());
        };

        let outcome = match self.trainer.submit_answer(student_id, &question, &answer) {
            Ok(outcome) => outcome,
            Err(e) => return self.recover(e),
        };
        let verdict = if outcome.evaluation.correct {
            "Correct!"
        } else {
            "Not quite."
        };
        writeln!(self.out, "\n{verdict}")?;
        writeln!(self.out, "Explanation: {}", outcome.evaluation.explanation)?;
        Ok(())
    }

    /// Single-line answers end at the first newline. Multi-line ones end at
    /// an empty line, or when input closes.
    fn read_answer(&mut self, question: &Question) -> Result<Option<String>> {
        if !question.is_multiline() {
            return self.prompt("\nYour answer: ");
        }

        write!(self.out, "\nYour answer (finish with an empty line):\n")?;
        self.out.flush()?;
        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line.trim().is_empty() && !lines.is_empty() {
                break;
            }
            lines.push(line);
        }
        if lines.is_empty() {
            return Ok(None);
        }
        Ok(Some(lines.join("\n")))
    }

    fn generate_reports(&mut self) -> Result<()> {
        let report_dir = self.report_dir.clone();
        let (_, written) = write_reports(self.trainer, &report_dir, DEFAULT_FORMATS)?;
        let names: Vec<String> = written
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        writeln!(
            self.out,
            "Teacher reports generated in {} ({})",
            report_dir.display(),
            names.join(" and ")
        )?;
        Ok(())
    }

    /// Print recoverable trainer errors and carry on; anything else aborts.
    fn recover(&mut self, err: anyhow::Error) -> Result<()> {
        match err.downcast_ref::<TrainerError>() {
            Some(e) if e.is_recoverable() => {
                writeln!(self.out, "{e}")?;
                Ok(())
            }
            _ => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codequest_core::config::CodequestConfig;

    fn run_script(script: &str) -> (tempfile::TempDir, Trainer, String) {
        let dir = tempfile::tempdir().unwrap();
        let config = CodequestConfig {
            data_dir: dir.path().join("data"),
            ..Default::default()
        };
        let trainer = Trainer::open(&config).unwrap();
        let mut out = Vec::new();
        Session::new(
            &trainer,
            config.report_dir().to_path_buf(),
            script.as_bytes(),
            &mut out,
        )
        .run()
        .unwrap();
        (dir, trainer, String::from_utf8(out).unwrap())
    }

    #[test]
    fn full_session_answers_a_multiline_question() {
        let script = "2\nAda\n1\nS001\n2\n3\n0\n1\n2\n\n1\n3\n4\n";
        let (_dir, trainer, out) = run_script(script);

        assert!(out.contains("Created student Ada with ID S001"));
        assert!(out.contains("Loops repeat actions."));
        assert!(out.contains("Correct!"));
        assert!(out.contains("Explanation: range(3) yields 0,1,2"));
        assert!(out.contains("- Loops: 100% (1/1) | difficulty 1.2"));
        assert!(out.trim_end().ends_with("Goodbye!"));
        assert_eq!(trainer.ledger().read_all().unwrap().len(), 1);
    }

    #[test]
    fn invalid_input_reprompts_without_writing() {
        let (_dir, trainer, out) = run_script("9\n1\n2\n\n2\nGrace\n1\nS999\n4\n");
        assert!(out.contains("Invalid choice, try again."));
        assert!(out.contains("No students found. Please create a profile."));
        assert!(out.contains("Name cannot be empty."));
        assert!(out.contains("Invalid choice. Try again."));
        assert_eq!(trainer.students().unwrap().len(), 1);
        assert!(trainer.ledger().read_all().unwrap().is_empty());
    }

    #[test]
    fn wrong_single_line_answer_is_reported() {
        let (_dir, trainer, out) = run_script("2\nAda\n1\nnew\nLin\n2\n0\n2\n5\n2\n4\n7\n3\n4\n");
        assert!(out.contains("Created student Lin with ID S002"));
        assert!(out.contains("Invalid selection."));
        assert!(out.contains("Not quite."));
        assert!(out.contains("Explanation: add returns the sum 2 + 3."));
        let stat = trainer.student("S002").unwrap().stat(Topic::Variables);
        assert_eq!((stat.attempts, stat.correct), (0, 0));
        let stat = trainer.student("S002").unwrap().stat(Topic::Functions);
        assert_eq!((stat.attempts, stat.correct), (1, 0));
    }

    #[test]
    fn closed_input_exits_cleanly() {
        let (_dir, _trainer, out) = run_script("2\nAda\n1\nS001\n");
        assert!(out.trim_end().ends_with("Goodbye!"));
    }

    #[test]
    fn reports_are_written_from_the_menu() {
        let (dir, _trainer, out) = run_script("3\n4\n");
        assert!(out.contains("teacher_report.txt and teacher_report_summary.csv"));
        assert!(dir.path().join("data/teacher_report.txt").exists());
        assert!(dir.path().join("data/teacher_report_summary.csv").exists());
    }
}

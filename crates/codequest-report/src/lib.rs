//! codequest-report: teacher report artifacts.
//!
//! Renders a [`TeacherReport`] as the narrative text report, the class summary
//! table, or a self-contained HTML dashboard. Every artifact is regenerated in
//! full on each run.
//!
//! [`TeacherReport`]: codequest_core::report::TeacherReport

pub mod html;
pub mod summary;
pub mod text;

pub use html::write_html_report;
pub use summary::write_summary_csv;
pub use text::write_text_report;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDateTime;
    use codequest_core::model::{Attempt, Student, Topic, TIMESTAMP_FORMAT};
    use codequest_core::report::TeacherReport;
    use codequest_core::roster::Roster;
    use codequest_core::statistics::generate;

    pub fn timestamp() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2026-10-16T09:30:00", TIMESTAMP_FORMAT).unwrap()
    }

    /// Ada: Loops 2/3. Grace: Variables 1/1, Loops 0/1. Plus one unknown id.
    pub fn sample_report() -> TeacherReport {
        let rows = [
            ("S001", Topic::Loops, true),
            ("S001", Topic::Loops, true),
            ("S001", Topic::Loops, false),
            ("S002", Topic::Variables, true),
            ("S002", Topic::Loops, false),
            ("S042", Topic::Functions, true),
        ];
        let attempts: Vec<Attempt> = rows
            .iter()
            .enumerate()
            .map(|(i, (student, topic, correct))| Attempt {
                attempt_id: format!("a{i}"),
                student_id: student.to_string(),
                topic: *topic,
                question_id: "Q".into(),
                difficulty: 1,
                correct: *correct,
                timestamp: timestamp(),
            })
            .collect();
        let mut roster = Roster::new();
        roster.insert("S001".into(), Student::new("S001", "Ada", timestamp()));
        roster.insert("S002".into(), Student::new("S002", "Grace <3", timestamp()));
        generate(&attempts, &roster)
    }
}

//! End-to-end pipeline tests over the library crates.
//!
//! A small class plays through the trainer, the ledger is aggregated, and
//! every report artifact is rendered from the result.

use codequest_core::config::CodequestConfig;
use codequest_core::model::Topic;
use codequest_core::report::TeacherReport;
use codequest_core::statistics::{ClassTrend, MasteryStatus, MistakeCategory};
use codequest_core::{AttemptLedger, Trainer};
use codequest_report::html::generate_html;
use codequest_report::summary::render_summary_csv;
use codequest_report::text::render_text;

fn open_trainer() -> (tempfile::TempDir, Trainer) {
    let dir = tempfile::tempdir().unwrap();
    let config = CodequestConfig {
        data_dir: dir.path().join("data"),
        ..Default::default()
    };
    let trainer = Trainer::open(&config).unwrap();
    (dir, trainer)
}

fn answer(trainer: &Trainer, student: &str, question_id: &str, raw: &str) -> bool {
    let q = trainer.catalogue().get(question_id).unwrap().clone();
    trainer.submit_answer(student, &q, raw).unwrap().evaluation.correct
}

/// Ada: Loops 2/3. Grace: Variables 1/1, Conditionals 0/1.
/// S042 is only in the ledger: Functions 1/1.
fn play_class(trainer: &Trainer) {
    let ada = trainer.create_student("Ada").unwrap();
    let grace = trainer.create_student("Grace").unwrap();

    assert!(answer(trainer, &ada.id, "L1", "0\n1\n2"));
    assert!(answer(trainer, &grace.id, "V1", " 3 "));
    assert!(answer(trainer, &ada.id, "L1", "0\r\n1\r\n2\r\n"));
    assert!(!answer(trainer, &grace.id, "C1", "No"));
    assert!(!answer(trainer, &ada.id, "L1", "1\n2\n3"));

    trainer
        .ledger()
        .record("S042", Topic::Functions, "F1", 1, true)
        .unwrap();
}

#[test]
fn e2e_class_report() {
    let (_dir, trainer) = open_trainer();
    play_class(&trainer);

    let report = trainer.generate_teacher_report().unwrap();

    let ids: Vec<&str> = report.students.iter().map(|s| s.student_id.as_str()).collect();
    assert_eq!(ids, ["S001", "S002", "S042"]);

    let ada = report.student("S001").unwrap();
    let loops = ada.topic(Topic::Loops).unwrap();
    assert_eq!((loops.correct, loops.attempts, loops.mastery_pct), (2, 3, 66));
    assert_eq!(loops.status, MasteryStatus::Stable);
    assert_eq!(ada.topic(Topic::Variables).unwrap().status, MasteryStatus::NoData);
    assert_eq!(ada.focus_topics, [Topic::Loops]);

    let grace = report.student("S002").unwrap();
    assert_eq!(grace.focus_topics, [Topic::Conditionals]);
    assert_eq!(report.student("S042").unwrap().name, "Unknown");

    let class_loops = report.topic(Topic::Loops).unwrap();
    assert_eq!(class_loops.trend, ClassTrend::Stable);
    assert_eq!(class_loops.common_mistake, Some(MistakeCategory::IncorrectAnswer));
    assert_eq!(
        report.topic(Topic::Functions).unwrap().trend,
        ClassTrend::Improving
    );
    assert_eq!(report.total_attempts(), 6);
}

#[test]
fn e2e_artifacts_render_from_one_report() {
    let (dir, trainer) = open_trainer();
    play_class(&trainer);
    let report = trainer.generate_teacher_report().unwrap();
    let generated_at = codequest_core::model::now_timestamp();

    let text = render_text(&report, generated_at);
    assert!(text.contains("STUDENT: Unknown (ID: S042)"));
    assert!(text.contains("- Conditionals: 0% (0/1) -> Needs Improvement"));
    assert!(text.contains("Recommendation: Focus on topics with percentage < 70% (Loops)"));

    let csv = render_summary_csv(&report);
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(
        rows,
        [
            "topic,average_mastery,class_trend,common_mistake",
            "Variables,100%,Improving,",
            "Conditionals,0%,Declining,Incorrect answers",
            "Loops,66%,Stable,Incorrect answers",
            "Functions,100%,Improving,",
        ]
    );

    let html = generate_html(&report, generated_at);
    assert!(html.contains("3 students | 6 attempts"));

    let json_path = dir.path().join("report.json");
    report.save_json(&json_path).unwrap();
    assert_eq!(TeacherReport::load_json(&json_path).unwrap(), report);
}

#[test]
fn e2e_report_survives_reopen() {
    let (dir, trainer) = open_trainer();
    play_class(&trainer);
    let before = trainer.generate_teacher_report().unwrap();
    drop(trainer);

    let config = CodequestConfig {
        data_dir: dir.path().join("data"),
        ..Default::default()
    };
    let reopened = Trainer::open(&config).unwrap();
    assert_eq!(reopened.generate_teacher_report().unwrap(), before);

    let stat = reopened.student("S001").unwrap().stat(Topic::Loops);
    assert_eq!((stat.attempts, stat.correct), (3, 2));
    // 1.0 -> 1.2 -> 1.4 -> 1.2
    assert!((stat.difficulty - 1.2).abs() < 1e-9);
}

#[test]
fn e2e_malformed_ledger_row_stops_aggregation() {
    let (dir, trainer) = open_trainer();
    play_class(&trainer);

    let path = dir.path().join("data/attempts.csv");
    let mut content = std::fs::read_to_string(&path).unwrap();
    content.push_str("not,a,valid,row\n");
    std::fs::write(&path, content).unwrap();

    let ledger = AttemptLedger::open(&path).unwrap();
    let err = ledger.read_all().unwrap_err();
    assert!(format!("{err:#}").contains("line 8"));
    assert!(trainer.generate_teacher_report().is_err());
}

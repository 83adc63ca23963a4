//! Narrative per-student report.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use codequest_core::model::TIMESTAMP_FORMAT;
use codequest_core::report::TeacherReport;
use codequest_core::statistics::RECOMMEND_BELOW_PCT;

/// Render the detailed teacher report.
pub fn render_text(report: &TeacherReport, generated_at: NaiveDateTime) -> String {
    let mut out = String::new();
    out.push_str("Teacher Report - Detailed\n");
    out.push_str(&format!(
        "Generated: {}\n\n",
        generated_at.format(TIMESTAMP_FORMAT)
    ));

    if report.students.is_empty() {
        out.push_str("No attempts recorded yet.\n");
        return out;
    }

    for student in &report.students {
        out.push_str(&format!(
            "STUDENT: {} (ID: {})\n",
            student.name, student.student_id
        ));
        out.push_str(&"-".repeat(40));
        out.push('\n');
        for t in &student.topics {
            out.push_str(&format!(
                "- {}: {}% ({}/{}) -> {}\n",
                t.topic, t.mastery_pct, t.correct, t.attempts, t.status
            ));
        }

        out.push_str(&format!(
            "\nRecommendation: Focus on topics with percentage < {RECOMMEND_BELOW_PCT}%"
        ));
        if !student.focus_topics.is_empty() {
            let names: Vec<&str> = student.focus_topics.iter().map(|t| t.as_str()).collect();
            out.push_str(&format!(" ({})", names.join(", ")));
        }
        out.push_str("\n\n");
    }

    out
}

/// Write the narrative report, replacing any previous one.
pub fn write_text_report(
    report: &TeacherReport,
    generated_at: NaiveDateTime,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_text(report, generated_at))
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

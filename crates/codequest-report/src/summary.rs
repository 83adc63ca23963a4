//! Class summary table, one CSV row per topic.

use std::path::Path;

use anyhow::{Context, Result};

use codequest_core::report::TeacherReport;

/// Header row of the summary table.
pub const SUMMARY_HEADER: &str = "topic,average_mastery,class_trend,common_mistake";

/// Quote a field if it would otherwise break the row.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Render the summary table.
pub fn render_summary_csv(report: &TeacherReport) -> String {
    let mut out = String::from(SUMMARY_HEADER);
    out.push('\n');
    for t in &report.topics {
        out.push_str(&format!(
            "{},{}%,{},{}\n",
            t.topic,
            t.mastery_pct,
            t.trend,
            csv_field(t.common_mistake_label())
        ));
    }
    out
}

/// Write the summary table, replacing any previous one.
pub fn write_summary_csv(report: &TeacherReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_summary_csv(report))
        .with_context(|| format!("failed to write summary to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_report;

    #[test]
    fn one_row_per_topic_in_order() {
        let csv = render_summary_csv(&sample_report());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                SUMMARY_HEADER,
                "Variables,100%,Improving,",
                "Conditionals,0%,Declining,",
                "Loops,50%,Declining,Incorrect answers",
                "Functions,100%,Improving,",
            ]
        );
    }

    #[test]
    fn quotes_awkward_fields() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/teacher_report_summary.csv");
        write_summary_csv(&sample_report(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(SUMMARY_HEADER));
        assert_eq!(content.lines().count(), 5);
    }
}

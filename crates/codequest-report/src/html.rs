//! HTML class dashboard.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use chrono::NaiveDateTime;
use std::path::Path;

use codequest_core::model::TIMESTAMP_FORMAT;
use codequest_core::report::{ClassTopicAggregate, TeacherReport};
use codequest_core::statistics::{
    ClassTrend, MasteryStatus, DECLINING_BELOW_PCT, IMPROVING_MIN_PCT,
};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn status_class(status: MasteryStatus) -> &'static str {
    match status {
        MasteryStatus::Strong => "strong",
        MasteryStatus::Stable => "stable",
        MasteryStatus::NeedsImprovement => "weak",
        MasteryStatus::NoData => "nodata",
    }
}

fn trend_class(trend: ClassTrend) -> &'static str {
    match trend {
        ClassTrend::Improving => "strong",
        ClassTrend::Stable => "stable",
        ClassTrend::Declining => "weak",
    }
}

/// Generate the dashboard for a teacher report.
pub fn generate_html(report: &TeacherReport, generated_at: NaiveDateTime) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>codequest class report</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>codequest class report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} students | {} attempts | generated {}</p>\n",
        report.students.len(),
        report.total_attempts(),
        generated_at.format(TIMESTAMP_FORMAT)
    ));
    html.push_str("</header>\n");

    // Class summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Class summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Topic</th><th>Average mastery</th><th>Attempts</th><th>Trend</th><th>Common mistake</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for t in &report.topics {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}%</td><td>{}/{}</td><td class=\"{}\">{}</td><td>{}</td></tr>\n",
            t.topic,
            t.mastery_pct,
            t.correct,
            t.attempts,
            trend_class(t.trend),
            t.trend,
            html_escape(t.common_mistake_label()),
        ));
    }
    html.push_str("</tbody></table>\n");

    if !report.topics.is_empty() {
        html.push_str(&generate_bar_chart(&report.topics));
    }
    html.push_str("</section>\n");

    // Per-student breakdown
    html.push_str("<section class=\"students\">\n");
    html.push_str("<h2>Students</h2>\n");
    if report.students.is_empty() {
        html.push_str("<p>No attempts recorded yet.</p>\n");
    } else {
        html.push_str("<table class=\"results-table\" id=\"students\">\n");
        html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Student</th><th onclick=\"sortTable(1)\">ID</th><th onclick=\"sortTable(2)\">Topic</th><th onclick=\"sortTable(3)\">Mastery</th><th onclick=\"sortTable(4)\">Status</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for s in &report.students {
            for t in &s.topics {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}% ({}/{})</td><td class=\"{}\">{}</td></tr>\n",
                    html_escape(&s.name),
                    html_escape(&s.student_id),
                    t.topic,
                    t.mastery_pct,
                    t.correct,
                    t.attempts,
                    status_class(t.status),
                    t.status,
                ));
            }
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write the dashboard to a file.
pub fn write_html_report(
    report: &TeacherReport,
    generated_at: NaiveDateTime,
    path: &Path,
) -> Result<()> {
    let html = generate_html(report, generated_at);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn generate_bar_chart(topics: &[ClassTopicAggregate]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 140;

    let total_height = topics.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, t) in topics.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = t.mastery_pct as usize * max_width / 100;

        let color = if t.mastery_pct >= IMPROVING_MIN_PCT {
            "#22c55e"
        } else if t.mastery_pct >= DECLINING_BELOW_PCT {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            t.topic
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            t.mastery_pct
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --strong: #dcfce7; --stable: #fef9c3; --weak: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --strong: #064e3b; --stable: #713f12; --weak: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.strong { background: var(--strong); }
.stable { background: var(--stable); }
.weak { background: var(--weak); }
.nodata { color: #6b7280; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('students');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb) : vb.localeCompare(va);
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{sample_report, timestamp};

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_html(&sample_report(), timestamp());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("3 students | 6 attempts"));
        assert!(html.contains("<td>Loops</td><td>50%</td>"));
        assert!(html.contains("Incorrect answers"));
        assert!(html.contains("Needs Improvement"));
    }

    #[test]
    fn html_escapes_student_names() {
        let html = generate_html(&sample_report(), timestamp());
        assert!(html.contains("Grace &lt;3"));
        assert!(!html.contains("Grace <3"));
    }

    #[test]
    fn html_report_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");

        write_html_report(&sample_report(), timestamp(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}

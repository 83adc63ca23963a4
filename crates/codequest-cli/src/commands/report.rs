//! The `codequest report` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use codequest_core::config::{REPORT_FILE, SUMMARY_FILE};
use codequest_core::model::now_timestamp;
use codequest_core::report::TeacherReport;
use codequest_core::Trainer;
use codequest_report::{write_html_report, write_summary_csv, write_text_report};

/// The formats written when none are asked for.
pub const DEFAULT_FORMATS: &[&str] = &["text", "csv"];

/// Every format `write_reports` understands.
pub const KNOWN_FORMATS: &[&str] = &["text", "csv", "json", "html"];

pub fn execute(output: Option<PathBuf>, format: String, config_path: Option<PathBuf>) -> Result<()> {
    let (config, trainer) = super::open_trainer(config_path)?;
    let output = output.unwrap_or_else(|| config.report_dir().to_path_buf());

    let formats: Vec<&str> = if format == "all" {
        KNOWN_FORMATS.to_vec()
    } else {
        format.split(',').map(str::trim).collect()
    };

    let (report, written) = write_reports(&trainer, &output, &formats)?;

    print_summary(&report);
    for path in &written {
        println!("Wrote {}", path.display());
    }

    Ok(())
}

/// Aggregate the ledger and write every requested artifact into `output`.
///
/// Unknown formats are reported and skipped. Fails before writing anything
/// if none of the requested formats is known.
pub fn write_reports(
    trainer: &Trainer,
    output: &Path,
    formats: &[&str],
) -> Result<(TeacherReport, Vec<PathBuf>)> {
    if !formats.iter().any(|f| KNOWN_FORMATS.contains(f)) {
        anyhow::bail!(
            "no known report format in {:?} (expected {} or all)",
            formats.join(","),
            KNOWN_FORMATS.join(", ")
        );
    }

    let report = trainer.generate_teacher_report()?;
    let generated_at = now_timestamp();

    std::fs::create_dir_all(output)?;
    let mut written = Vec::new();

    for fmt in formats {
        match *fmt {
            "text" => {
                let path = output.join(REPORT_FILE);
                write_text_report(&report, generated_at, &path)?;
                written.push(path);
            }
            "csv" => {
                let path = output.join(SUMMARY_FILE);
                write_summary_csv(&report, &path)?;
                written.push(path);
            }
            "json" => {
                let path = output.join("teacher_report.json");
                report.save_json(&path)?;
                written.push(path);
            }
            "html" => {
                let path = output.join("teacher_report.html");
                write_html_report(&report, generated_at, &path)?;
                written.push(path);
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    tracing::info!(
        students = report.students.len(),
        files = written.len(),
        dir = %output.display(),
        "teacher reports written"
    );
    Ok((report, written))
}

fn print_summary(report: &TeacherReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Topic",
        "Average mastery",
        "Attempts",
        "Class trend",
        "Common mistake",
    ]);

    for t in &report.topics {
        table.add_row(vec![
            Cell::new(t.topic),
            Cell::new(format!("{}%", t.mastery_pct)),
            Cell::new(format!("{}/{}", t.correct, t.attempts)),
            Cell::new(t.trend),
            Cell::new(t.common_mistake_label()),
        ]);
    }

    println!("{table}");
}

//! The `codequest validate` command.

use std::path::PathBuf;

use anyhow::Result;

use codequest_core::bank::{load_banks, validate_questions};
use codequest_core::model::Question;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let banks = load_banks(&bank_path)?;

    for bank in &banks {
        println!("Question bank: {} ({} questions)", bank.name, bank.questions.len());
    }

    // Checked as one catalogue: ids collide across files and topics may be
    // covered by a different file.
    let all: Vec<Question> = banks.into_iter().flat_map(|b| b.questions).collect();
    let warnings = validate_questions(&all);
    for w in &warnings {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All question banks valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}

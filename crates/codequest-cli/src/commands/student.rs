//! The `codequest student` commands.

use std::path::PathBuf;

use anyhow::Result;

pub fn create(name: String, config_path: Option<PathBuf>) -> Result<()> {
    let (_, trainer) = super::open_trainer(config_path)?;
    let student = trainer.create_student(&name)?;
    println!("Created student {} with ID {}", student.name, student.id);
    Ok(())
}

pub fn list(config_path: Option<PathBuf>) -> Result<()> {
    use comfy_table::{Cell, Table};

    let (_, trainer) = super::open_trainer(config_path)?;
    let students = trainer.students()?;

    if students.is_empty() {
        println!("No students found. Create one with: codequest student create --name <name>");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Created", "Attempts"]);
    for s in &students {
        let attempts: u32 = s.stats.values().map(|st| st.attempts).sum();
        table.add_row(vec![
            Cell::new(&s.id),
            Cell::new(&s.name),
            Cell::new(s.created_at.format(codequest_core::model::TIMESTAMP_FORMAT)),
            Cell::new(attempts),
        ]);
    }

    println!("{table}");
    Ok(())
}

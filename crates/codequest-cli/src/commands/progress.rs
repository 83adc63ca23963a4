//! The `codequest progress` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(student_id: String, config_path: Option<PathBuf>) -> Result<()> {
    let (_, trainer) = super::open_trainer(config_path)?;
    let student = trainer.student(&student_id)?;

    println!("Progress for {} ({}):", student.name, student.id);
    for line in trainer.show_progress(&student.id)? {
        println!("{line}");
    }
    Ok(())
}

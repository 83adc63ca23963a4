pub mod init;
pub mod play;
pub mod progress;
pub mod report;
pub mod student;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use codequest_core::{load_config_from, CodequestConfig, Trainer};

/// Load config (explicit path or search) and open the trainer it describes.
pub fn open_trainer(config_path: Option<PathBuf>) -> Result<(CodequestConfig, Trainer)> {
    let config = load_config_from(config_path.as_deref())?;
    let trainer = Trainer::open(&config)?;
    Ok((config, trainer))
}

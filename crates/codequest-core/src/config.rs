//! Trainer configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Roster file name inside the data directory.
pub const STUDENTS_FILE: &str = "students.json";
/// Ledger file name inside the data directory.
pub const ATTEMPTS_FILE: &str = "attempts.csv";
/// Narrative report file name.
pub const REPORT_FILE: &str = "teacher_report.txt";
/// Class summary table file name.
pub const SUMMARY_FILE: &str = "teacher_report_summary.csv";

/// Top-level codequest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodequestConfig {
    /// Directory holding the roster and the ledger.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Question bank file or directory. The built-in bank is used when unset.
    #[serde(default)]
    pub question_bank: Option<PathBuf>,
    /// Where reports are written. Defaults to the data directory.
    #[serde(default)]
    pub report_dir: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for CodequestConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            question_bank: None,
            report_dir: None,
        }
    }
}

impl CodequestConfig {
    pub fn students_path(&self) -> PathBuf {
        self.data_dir.join(STUDENTS_FILE)
    }

    pub fn attempts_path(&self) -> PathBuf {
        self.data_dir.join(ATTEMPTS_FILE)
    }

    pub fn report_dir(&self) -> &Path {
        self.report_dir.as_deref().unwrap_or(&self.data_dir)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `codequest.toml` in the current directory
/// 2. `~/.config/codequest/config.toml`
///
/// Environment variable override: `CODEQUEST_DATA_DIR`.
pub fn load_config() -> Result<CodequestConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<CodequestConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("codequest.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<CodequestConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => CodequestConfig::default(),
    };

    if let Ok(dir) = std::env::var("CODEQUEST_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }

    config.data_dir = resolve_path(&config.data_dir);
    config.question_bank = config.question_bank.as_deref().map(resolve_path);
    config.report_dir = config.report_dir.as_deref().map(resolve_path);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("codequest"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_CODEQUEST_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_CODEQUEST_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_CODEQUEST_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars ${unclosed"), "no vars ${unclosed");
        std::env::remove_var("_CODEQUEST_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = CodequestConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.students_path(), PathBuf::from("./data/students.json"));
        assert_eq!(config.attempts_path(), PathBuf::from("./data/attempts.csv"));
        assert_eq!(config.report_dir(), Path::new("./data"));
    }

    #[test]
    fn parse_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codequest.toml");
        std::fs::write(
            &path,
            r#"
data_dir = "/srv/codequest"
question_bank = "banks/"
report_dir = "/srv/reports"
"#,
        )
        .unwrap();

        let config: CodequestConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(config.question_bank, Some(PathBuf::from("banks/")));
        assert_eq!(config.report_dir(), Path::new("/srv/reports"));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/codequest.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}

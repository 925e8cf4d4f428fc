//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level ecoquiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcoquizConfig {
    /// Directory the profile is stored in.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Question bank file or directory used when `--bank` is not given.
    #[serde(default)]
    pub question_bank: Option<PathBuf>,
    /// Questions per quiz.
    #[serde(default = "default_question_count")]
    pub question_count: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./ecoquiz-data")
}
fn default_question_count() -> usize {
    10
}

impl Default for EcoquizConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            question_bank: None,
            question_count: default_question_count(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `ecoquiz.toml` in the current directory
/// 2. `~/.config/ecoquiz/config.toml`
///
/// Environment variable overrides: `ECOQUIZ_DATA_DIR`, `ECOQUIZ_QUESTION_BANK`.
pub fn load_config_from(path: Option<&Path>) -> Result<EcoquizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("ecoquiz.toml");
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
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<EcoquizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => EcoquizConfig::default(),
    };

    if let Ok(dir) = std::env::var("ECOQUIZ_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Ok(bank) = std::env::var("ECOQUIZ_QUESTION_BANK") {
        config.question_bank = Some(PathBuf::from(bank));
    }

    config.data_dir = resolve_path(&config.data_dir);
    config.question_bank = config.question_bank.as_deref().map(resolve_path);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("ecoquiz"))
}

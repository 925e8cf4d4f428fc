//! Subcommand implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use ecoquiz_core::bank::load_banks;
use ecoquiz_core::model::QuestionItem;
use ecoquiz_core::storage::FileStorage;
use ecoquiz_core::store::ProfileStore;

use crate::config::EcoquizConfig;

pub mod init;
pub mod profile;
pub mod quiz;
pub mod record;
pub mod reset;
pub mod select;
pub mod survey;
pub mod validate;

/// A profile store backed by files in the configured data directory.
pub(crate) fn open_store(config: &EcoquizConfig) -> ProfileStore {
    tracing::debug!("profile data dir: {}", config.data_dir.display());
    ProfileStore::new(Arc::new(FileStorage::new(&config.data_dir)))
}

/// Every question from the bank at `bank`, or from the configured bank.
pub(crate) fn load_questions(
    bank: Option<PathBuf>,
    config: &EcoquizConfig,
) -> Result<Vec<QuestionItem>> {
    let path = bank
        .or_else(|| config.question_bank.clone())
        .context("no question bank configured; pass --bank or run `ecoquiz init`")?;
    load_questions_from(&path)
}

fn load_questions_from(path: &Path) -> Result<Vec<QuestionItem>> {
    let banks = load_banks(path)?;
    let questions: Vec<QuestionItem> = banks.into_iter().flat_map(|b| b.questions).collect();
    if questions.is_empty() {
        anyhow::bail!("no questions found in {}", path.display());
    }
    Ok(questions)
}

//! The `ecoquiz reset` command.

use std::path::PathBuf;

use anyhow::Result;

use crate::config::load_config_from;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    super::open_store(&config).reset_profile();
    println!("Profile reset.");
    Ok(())
}

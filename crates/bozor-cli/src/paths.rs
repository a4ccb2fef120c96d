use std::path::PathBuf;

use anyhow::{Context, Result};

fn bozor_dir() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".bozor"))
}

/// `--config` / `BOZOR_CONFIG`, else `~/.bozor/config.toml`.
pub fn config_path(cli_path: &Option<PathBuf>) -> Result<PathBuf> {
    match cli_path {
        Some(p) => Ok(p.clone()),
        None => Ok(bozor_dir()?.join("config.toml")),
    }
}

/// `--session-file` / `BOZOR_SESSION_FILE`, else `~/.bozor/session.json`.
pub fn session_path(cli_path: &Option<PathBuf>) -> Result<PathBuf> {
    match cli_path {
        Some(p) => Ok(p.clone()),
        None => Ok(bozor_dir()?.join("session.json")),
    }
}

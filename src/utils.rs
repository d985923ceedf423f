//! Shared helpers for the binary and the live integration tests.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Gets the cross-platform path of the user-level env file.
///
/// Returns the path as `{config_dir}/askweb/.env` where `config_dir` is:
/// - Linux: `~/.config`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// # Errors
///
/// Returns an error if the config directory cannot be determined.
pub fn get_user_env_path() -> Result<PathBuf> {
    let config_dir =
        dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine config directory"))?;

    Ok(config_dir.join("askweb").join(".env"))
}

/// Loads `.env` from the working directory, then the user-level env file.
///
/// Variables already present in the environment are never overwritten, so
/// the process environment wins over `./.env`, which wins over the user file.
/// Missing files are skipped.
///
/// # Errors
///
/// Returns an error if an existing env file cannot be parsed.
pub fn load_env_files() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e).context("Failed to load .env"),
    }

    if let Ok(path) = get_user_env_path() {
        load_env_file(&path)?;
    }

    Ok(())
}

/// Loads one env file if it exists.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load_env_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    dotenvy::from_path(path)
        .with_context(|| format!("Failed to load env file: {}", path.display()))
}

//! Session token persistence between invocations.
//!
//! The token is an opaque credential, stored in the user config dir
//! (`<config>/taskdeck/session`). Config and env (`TASKDECK_API__SESSION_TOKEN`)
//! take precedence over the stored file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

fn token_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskdeck").join("session"))
}

/// The stored token, if a previous `tdk login` saved one.
#[must_use]
pub fn load() -> Option<String> {
    let path = token_path()?;
    let raw = fs::read_to_string(path).ok()?;
    let token = raw.trim().to_string();
    (!token.is_empty()).then_some(token)
}

/// Persist the token for subsequent invocations.
///
/// # Errors
///
/// Returns an error when the config directory cannot be created or
/// written.
pub fn store(token: &str) -> Result<()> {
    let path = token_path().context("no user config directory available")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(&path, token).with_context(|| format!("writing {}", path.display()))
}

/// Forget the stored token. Missing files are fine.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be removed.
pub fn clear() -> Result<()> {
    let Some(path) = token_path() else {
        return Ok(());
    };
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("removing {}", path.display())),
    }
}

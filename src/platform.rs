//! Cross-platform data directory resolution.
//!
//! The library file has to live somewhere writable no matter how the binary
//! is installed, so resolution walks a fallback chain.

use crate::config::APP_DIR_NAME;
use crate::library::FileStore;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the data directory with cross-platform fallback chain.
///
/// Priority order:
/// 1. Explicit override (for testing/CI)
/// 2. Home directory (~/.animetime)
/// 3. Platform-specific data directory (XDG on Linux, AppData on Windows)
/// 4. Current working directory (last resort)
pub fn get_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        ensure_writable(dir)?;
        return Ok(dir.to_path_buf());
    }

    if let Some(home) = home::home_dir() {
        let dir = home.join(APP_DIR_NAME);
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
        tracing::warn!(
            dir = %dir.display(),
            "cannot write to home data dir, trying fallback locations"
        );
    }

    if let Some(data) = dirs::data_local_dir() {
        let dir = data.join("animetime");
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
    }

    let dir = PathBuf::from(APP_DIR_NAME);
    ensure_writable(&dir).context(
        "Cannot create data directory in any location. \
         Check file permissions or set storage.data_dir_override in config.",
    )?;
    Ok(dir)
}

/// Ensure a directory exists and is writable by the current user.
pub fn ensure_writable(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let test_path = dir.join(".write_test");
    fs::write(&test_path, b"test")
        .with_context(|| format!("Directory {} is not writable", dir.display()))?;

    // may be held open by antivirus on Windows
    let _ = fs::remove_file(&test_path);

    Ok(())
}

/// The library store for the resolved data directory.
pub fn library_store(data_dir_override: Option<&Path>) -> Result<FileStore> {
    let dir = get_data_dir(data_dir_override)?;
    Ok(FileStore::in_dir(&dir))
}

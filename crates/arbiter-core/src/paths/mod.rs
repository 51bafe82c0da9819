//! Path utilities for the arbiter settings file.
//!
//! Resolution order for the settings file:
//! 1. An explicit path (`--config` / `ARBITER_CONFIG`)
//! 2. `ARBITER_CONFIG_DIR` joined with [`SETTINGS_FILE_NAME`]
//! 3. The platform config directory (e.g. `~/.config/arbiter/settings.json`)
//!
//! The pure [`resolve_settings_path`] holds the ordering so it can be tested
//! without touching the process environment.

mod error;

use std::env;
use std::path::{Path, PathBuf};

pub use error::PathError;

/// File name of the settings file inside the config root.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Directory name under the platform config directory.
pub const APP_DIR_NAME: &str = "arbiter";

/// Environment variable overriding the config root.
pub const CONFIG_DIR_ENV: &str = "ARBITER_CONFIG_DIR";

/// Get the default settings file path from the environment and platform.
pub fn settings_path() -> Result<PathBuf, PathError> {
    let env_dir = env::var(CONFIG_DIR_ENV).ok();
    let system_dir = dirs::config_dir();
    resolve_settings_path(None, env_dir.as_deref(), system_dir.as_deref())
}

/// Resolve the settings file from explicit inputs.
///
/// `env_dir` is the value of [`CONFIG_DIR_ENV`] if set, `system_dir` the
/// platform config directory if known.
pub fn resolve_settings_path(
    explicit: Option<&Path>,
    env_dir: Option<&str>,
    system_dir: Option<&Path>,
) -> Result<PathBuf, PathError> {
    if let Some(path) = explicit {
        if path.as_os_str().is_empty() {
            return Err(PathError::EmptyPath);
        }
        return Ok(path.to_path_buf());
    }

    if let Some(dir) = env_dir {
        if dir.trim().is_empty() {
            return Err(PathError::EmptyPath);
        }
        return Ok(Path::new(dir).join(SETTINGS_FILE_NAME));
    }

    let system_dir = system_dir.ok_or(PathError::NoConfigDir)?;
    Ok(system_dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
}

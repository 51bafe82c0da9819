//! Settings loading for the CLI.
//!
//! Values are layered: protocol defaults, then the settings file, then
//! command-line flags and `ARBITER_*` environment variables.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use arbiter_core::{PathError, Settings, resolve_settings_path, settings_path, validate_settings};
use tracing::{debug, warn};

use crate::error::CliError;

/// Effective configuration for one CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub settings: Settings,
    /// Settings file that was read, if any.
    pub source: Option<PathBuf>,
}

impl CliConfig {
    /// Load settings from `explicit` or the default location, then apply
    /// `overrides` and validate the result.
    ///
    /// A missing settings file is not an error.
    pub fn load(explicit: Option<&Path>, overrides: &Settings) -> Result<Self, CliError> {
        let path = match explicit {
            Some(path) => Some(resolve_settings_path(Some(path), None, None)?),
            None => match settings_path() {
                Ok(path) => Some(path),
                Err(PathError::NoConfigDir) => {
                    debug!("No config directory on this platform, using defaults");
                    None
                }
                Err(e) => return Err(e.into()),
            },
        };

        let file_settings = match &path {
            Some(path) => read_settings(path)?,
            None => None,
        };
        if file_settings.is_none() && explicit.is_some() {
            warn!(path = ?path, "Settings file not found, using defaults");
        }

        let source = file_settings.as_ref().and(path);
        let mut settings = file_settings.unwrap_or_default();
        settings.merge(overrides);
        validate_settings(&settings)?;

        Ok(Self { settings, source })
    }
}

/// Read and parse a settings file. `Ok(None)` when it does not exist.
fn read_settings(path: &Path) -> Result<Option<Settings>, CliError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CliError::Io(format!("{}: {e}", path.display()))),
    };

    let settings = serde_json::from_str(&text)
        .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), "Loaded settings file");
    Ok(Some(settings))
}

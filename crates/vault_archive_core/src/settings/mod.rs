//! Persisted archive settings.
//!
//! # Responsibility
//! - Load the archive folder setting merged over defaults.
//! - Validate every edit before it replaces the current value.
//!
//! # Invariants
//! - A stored `archive_folder` always passes `validate_archive_folder`.
//! - A rejected edit leaves the previous value untouched.

use crate::model::item::normalize_path;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Archive folder used when nothing valid is configured.
pub const DEFAULT_ARCHIVE_FOLDER: &str = "Archive";

static FORBIDDEN_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[:\\]").expect("static regex"));

/// Errors from settings validation and persistence.
#[derive(Debug)]
pub enum SettingsError {
    /// Archive folder value violates naming rules.
    InvalidArchiveFolder { value: String, reason: &'static str },
    /// Settings file could not be read or written.
    Io(std::io::Error),
    /// Settings file is not valid JSON for this schema.
    Parse(serde_json::Error),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArchiveFolder { value, reason } => {
                write!(f, "invalid archive folder `{value}`: {reason}")
            }
            Self::Io(err) => write!(f, "settings i/o failed: {err}"),
            Self::Parse(err) => write!(f, "settings file is invalid: {err}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidArchiveFolder { .. } => None,
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Validates and normalizes one archive folder value.
///
/// Surrounding whitespace and trailing separators are dropped. The value must
/// be non-empty, must not start with `.`, must not contain `:`, and no segment
/// may be empty, start with `.`, or contain `\`.
pub fn validate_archive_folder(value: &str) -> Result<String, SettingsError> {
    let reject = |reason: &'static str| SettingsError::InvalidArchiveFolder {
        value: value.to_string(),
        reason,
    };

    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(reject("must not be empty"));
    }
    if trimmed.starts_with('.') {
        return Err(reject("must not start with `.`"));
    }
    if trimmed.starts_with('/') {
        return Err(reject("must be relative to the vault root"));
    }
    if FORBIDDEN_CHARS.is_match(trimmed) {
        return Err(reject("must not contain `:` or `\\`"));
    }
    for segment in trimmed.split('/') {
        if segment.trim().is_empty() {
            return Err(reject("must not contain empty path segments"));
        }
        if segment.starts_with('.') {
            return Err(reject("path segments must not start with `.`"));
        }
    }
    Ok(normalize_path(trimmed))
}

/// User-editable archive settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArchiveSettings {
    pub archive_folder: String,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            archive_folder: DEFAULT_ARCHIVE_FOLDER.to_string(),
        }
    }
}

impl ArchiveSettings {
    /// Loads settings from a JSON file, merged over defaults.
    ///
    /// A missing file yields defaults. A stored folder that fails validation
    /// is replaced by the default.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("event=settings_load module=settings status=ok source=default");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let mut settings: Self = serde_json::from_str(&raw)?;
        match validate_archive_folder(&settings.archive_folder) {
            Ok(folder) => settings.archive_folder = folder,
            Err(err) => {
                warn!(
                    "event=settings_load module=settings status=skip reason=invalid_archive_folder error={}",
                    err
                );
                settings.archive_folder = DEFAULT_ARCHIVE_FOLDER.to_string();
            }
        }
        info!("event=settings_load module=settings status=ok source=file");
        Ok(settings)
    }

    /// Writes settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Applies a validated archive folder edit.
    ///
    /// On rejection the previous value is kept and the error is returned so
    /// the caller can redisplay the current value.
    pub fn set_archive_folder(&mut self, value: &str) -> Result<(), SettingsError> {
        match validate_archive_folder(value) {
            Ok(folder) => {
                info!("event=settings_update module=settings status=ok field=archive_folder");
                self.archive_folder = folder;
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=settings_update module=settings status=error field=archive_folder"
                );
                Err(err)
            }
        }
    }
}

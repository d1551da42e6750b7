//! Extension manifest declaration and validation.

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Capability string for command palette entries.
pub const CAPABILITY_COMMAND: &str = "command";
/// Capability string for single- and multi-item context menu entries.
pub const CAPABILITY_CONTEXT_MENU: &str = "context_menu";
/// Capability string for a settings tab.
pub const CAPABILITY_SETTINGS_TAB: &str = "settings_tab";

const SUPPORTED_CAPABILITIES: &[&str] = &[
    CAPABILITY_COMMAND,
    CAPABILITY_CONTEXT_MENU,
    CAPABILITY_SETTINGS_TAB,
];

/// Returns supported capability strings for manifest validation.
pub fn supported_capabilities() -> &'static [&'static str] {
    SUPPORTED_CAPABILITIES
}

/// Where a declared command is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommandSurface {
    /// Command palette / hotkey, acting on the active item.
    Palette,
    /// Context menu of one item.
    FileMenu,
    /// Context menu of a multi-item selection.
    FilesMenu,
}

impl CommandSurface {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Palette => "palette",
            Self::FileMenu => "file_menu",
            Self::FilesMenu => "files_menu",
        }
    }

    /// Capability a manifest must declare to use this surface.
    pub fn required_capability(self) -> &'static str {
        match self {
            Self::Palette => CAPABILITY_COMMAND,
            Self::FileMenu | Self::FilesMenu => CAPABILITY_CONTEXT_MENU,
        }
    }
}

/// One command declared by an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDeclaration {
    /// Stable command id, e.g. `move-to-archive`.
    pub id: String,
    /// User-facing label.
    pub label: String,
    pub surface: CommandSurface,
}

/// Declarative extension manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionManifest {
    /// Stable extension identifier, e.g. `builtin.vault.archive`.
    pub id: String,
    /// Manifest semantic version string (`major.minor.patch`).
    pub version: String,
    /// Declared capabilities (`command|context_menu|settings_tab`).
    pub capabilities: Vec<String>,
    pub commands: Vec<CommandDeclaration>,
}

impl ExtensionManifest {
    /// Validates declaration-level manifest invariants.
    pub fn validate(&self) -> Result<(), ManifestValidationError> {
        if self.id.trim().is_empty() {
            return Err(ManifestValidationError::EmptyId);
        }
        if !is_valid_identifier(self.id.trim()) {
            return Err(ManifestValidationError::InvalidId(self.id.clone()));
        }

        if self.version.trim().is_empty() {
            return Err(ManifestValidationError::EmptyVersion);
        }
        if !is_semver_triplet(self.version.trim()) {
            return Err(ManifestValidationError::InvalidVersion(
                self.version.clone(),
            ));
        }

        if self.capabilities.is_empty() {
            return Err(ManifestValidationError::MissingCapabilities);
        }

        let mut declared = BTreeSet::<&str>::new();
        for capability in &self.capabilities {
            let normalized = capability.trim();
            if normalized.is_empty() {
                return Err(ManifestValidationError::EmptyCapability);
            }
            if !supported_capabilities().contains(&normalized) {
                return Err(ManifestValidationError::UnsupportedCapability(
                    normalized.to_string(),
                ));
            }
            if !declared.insert(normalized) {
                return Err(ManifestValidationError::DuplicateCapability(
                    normalized.to_string(),
                ));
            }
        }

        let mut command_ids = BTreeSet::<&str>::new();
        for command in &self.commands {
            let id = command.id.trim();
            if !is_valid_identifier(id) {
                return Err(ManifestValidationError::InvalidCommandId(command.id.clone()));
            }
            if !command_ids.insert(id) {
                return Err(ManifestValidationError::DuplicateCommandId(id.to_string()));
            }
            if command.label.trim().is_empty() {
                return Err(ManifestValidationError::EmptyCommandLabel(id.to_string()));
            }
            let required = command.surface.required_capability();
            if !declared.contains(required) {
                return Err(ManifestValidationError::MissingCapabilityForCommand {
                    command_id: id.to_string(),
                    capability: required,
                });
            }
        }
        Ok(())
    }
}

fn is_valid_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !first.is_ascii_lowercase() && !first.is_ascii_digit() {
        return false;
    }

    let mut prev_separator = false;
    for c in chars {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            prev_separator = false;
            continue;
        }
        if c == '.' || c == '_' || c == '-' {
            if prev_separator {
                return false;
            }
            prev_separator = true;
            continue;
        }
        return false;
    }
    !prev_separator
}

fn is_semver_triplet(value: &str) -> bool {
    let parts: Vec<&str> = value.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

/// Manifest validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestValidationError {
    EmptyId,
    InvalidId(String),
    EmptyVersion,
    InvalidVersion(String),
    MissingCapabilities,
    EmptyCapability,
    UnsupportedCapability(String),
    DuplicateCapability(String),
    InvalidCommandId(String),
    DuplicateCommandId(String),
    EmptyCommandLabel(String),
    MissingCapabilityForCommand {
        command_id: String,
        capability: &'static str,
    },
}

impl Display for ManifestValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "manifest id must not be empty"),
            Self::InvalidId(value) => write!(f, "manifest id is invalid: {value}"),
            Self::EmptyVersion => write!(f, "manifest version must not be empty"),
            Self::InvalidVersion(value) => write!(
                f,
                "manifest version is invalid: {value} (expected major.minor.patch)"
            ),
            Self::MissingCapabilities => write!(f, "manifest capabilities must not be empty"),
            Self::EmptyCapability => write!(f, "manifest contains empty capability value"),
            Self::UnsupportedCapability(value) => {
                write!(f, "manifest capability is unsupported: {value}")
            }
            Self::DuplicateCapability(value) => {
                write!(f, "manifest capability is duplicated: {value}")
            }
            Self::InvalidCommandId(value) => write!(f, "command id is invalid: {value}"),
            Self::DuplicateCommandId(value) => write!(f, "command id is duplicated: {value}"),
            Self::EmptyCommandLabel(value) => write!(f, "command label is empty: {value}"),
            Self::MissingCapabilityForCommand {
                command_id,
                capability,
            } => write!(
                f,
                "command {command_id} requires undeclared capability: {capability}"
            ),
        }
    }
}

impl Error for ManifestValidationError {}

//! Conflict-resolution prompt contract.
//!
//! # Responsibility
//! - Describe a collision to the host UI as a title, message and 2-4 choices.
//! - Resume the archive flow with exactly one of the offered choices.
//!
//! # Invariants
//! - A resolver answer that was not offered is treated as `Cancel`.
//! - Resolution happens before any filesystem mutation of the colliding item.

use crate::model::item::VaultItem;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One button of a conflict prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictChoice {
    /// Trash the existing item and move the incoming item into its place.
    Replace,
    /// Move the incoming item next to the existing one under a unique name.
    Rename,
    /// Reconcile folder contents item by item.
    Merge,
    /// Abort before touching the vault.
    Cancel,
}

impl ConflictChoice {
    /// Stable lowercase id used by CLI and FFI hosts.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Rename => "rename",
            Self::Merge => "merge",
            Self::Cancel => "cancel",
        }
    }

    /// Button label shown by UI hosts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Replace => "Replace",
            Self::Rename => "Rename",
            Self::Merge => "Merge",
            Self::Cancel => "Cancel",
        }
    }
}

impl Display for ConflictChoice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown choice id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownConflictChoice(pub String);

impl Display for UnknownConflictChoice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown conflict choice `{}`; expected replace|rename|merge|cancel",
            self.0
        )
    }
}

impl Error for UnknownConflictChoice {}

impl FromStr for ConflictChoice {
    type Err = UnknownConflictChoice;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "rename" => Ok(Self::Rename),
            "merge" => Ok(Self::Merge),
            "cancel" => Ok(Self::Cancel),
            other => Err(UnknownConflictChoice(other.to_string())),
        }
    }
}

/// Modal prompt content handed to a `ConflictResolver`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictPrompt {
    pub title: String,
    pub message: String,
    /// Offered choices in button order.
    pub choices: Vec<ConflictChoice>,
}

impl ConflictPrompt {
    /// Prompt for an archive move that lands on an existing item.
    pub fn archive_collision(item: &VaultItem, destination: &str) -> Self {
        Self {
            title: "Item already archived".to_string(),
            message: format!(
                "An item named {} already exists at {destination}. \
                 Replace it, keep both by renaming, or cancel?",
                item.name
            ),
            choices: vec![
                ConflictChoice::Replace,
                ConflictChoice::Rename,
                ConflictChoice::Cancel,
            ],
        }
    }

    /// Prompt for an unarchive move that lands on an existing item.
    pub fn unarchive_collision(item: &VaultItem, destination: &str) -> Self {
        Self {
            title: "Item already exists".to_string(),
            message: format!(
                "An item named {} already exists at {destination}. Replace it or cancel?",
                item.name
            ),
            choices: vec![ConflictChoice::Replace, ConflictChoice::Cancel],
        }
    }

    pub fn offers(&self, choice: ConflictChoice) -> bool {
        self.choices.contains(&choice)
    }
}

/// Host-side decision maker for collisions.
///
/// Implementations may block until a human answers; there is no timeout.
pub trait ConflictResolver {
    fn resolve(&self, prompt: &ConflictPrompt) -> ConflictChoice;
}

impl<F> ConflictResolver for F
where
    F: Fn(&ConflictPrompt) -> ConflictChoice,
{
    fn resolve(&self, prompt: &ConflictPrompt) -> ConflictChoice {
        self(prompt)
    }
}

/// Resolver that always answers the same choice, for non-interactive hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedChoice(pub ConflictChoice);

impl ConflictResolver for FixedChoice {
    fn resolve(&self, _prompt: &ConflictPrompt) -> ConflictChoice {
        self.0
    }
}

/// Asks `resolver` and downgrades answers that were not offered to `Cancel`.
pub fn resolve_offered(resolver: &impl ConflictResolver, prompt: &ConflictPrompt) -> ConflictChoice {
    let choice = resolver.resolve(prompt);
    if prompt.offers(choice) {
        info!(
            "event=conflict_prompt module=conflict status=ok choice={} offered={}",
            choice,
            prompt.choices.len()
        );
        return choice;
    }
    warn!(
        "event=conflict_prompt module=conflict status=skip reason=choice_not_offered choice={}",
        choice
    );
    ConflictChoice::Cancel
}

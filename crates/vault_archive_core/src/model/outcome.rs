//! Archive operation outcome records.
//!
//! # Invariants
//! - `ArchiveResult` is immutable once produced.
//! - `MergeStats` lives for one merge invocation and is read once to build
//!   the final result.

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Classification of a failed top-level operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArchiveFailure {
    /// Item already lives under the archive folder.
    AlreadyArchived,
    /// Item does not live under the archive folder.
    NotArchived,
    /// User declined or cancelled a conflict prompt.
    OperationCancelled,
    /// A gateway call failed; carries the underlying description.
    IoFailure(String),
    /// One or more children could not be merged.
    PartialMergeFailure { failed_items: Vec<String> },
}

impl Display for ArchiveFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyArchived => write!(f, "already archived"),
            Self::NotArchived => write!(f, "not archived"),
            Self::OperationCancelled => write!(f, "operation cancelled"),
            Self::IoFailure(message) => write!(f, "i/o failure: {message}"),
            Self::PartialMergeFailure { failed_items } => {
                write!(f, "{} item(s) failed to merge", failed_items.len())
            }
        }
    }
}

/// Outcome of one top-level archive or unarchive operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveResult {
    pub success: bool,
    /// Human-readable message for display.
    pub message: String,
    /// Failure classification; `None` on success.
    pub failure: Option<ArchiveFailure>,
}

impl ArchiveResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            failure: None,
        }
    }

    pub fn failure(failure: ArchiveFailure, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            failure: Some(failure),
        }
    }

    pub fn cancelled() -> Self {
        Self::failure(ArchiveFailure::OperationCancelled, "Operation cancelled")
    }
}

/// Counters accumulated by one recursive folder merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub files_added: usize,
    pub files_replaced: usize,
    /// Files skipped because destination content was identical.
    pub files_skipped: usize,
    pub folders_created: usize,
    /// Names of children that could not be processed, in walk order.
    pub failed_items: Vec<String>,
}

impl MergeStats {
    /// Files that now live at the destination because of this merge.
    pub fn files_processed(&self) -> usize {
        self.files_added + self.files_replaced
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_items.is_empty()
    }

    /// Builds the user-facing summary for a finished merge.
    ///
    /// `source_removed` tells whether the emptied source folder was deleted.
    pub fn summary(&self, folder_name: &str, source_removed: bool) -> String {
        let mut message = format!(
            "{folder_name} merged: {} files processed",
            self.files_processed()
        );

        let mut breakdown = Vec::new();
        if self.files_replaced > 0 {
            breakdown.push(format!("{} replaced", self.files_replaced));
        }
        if self.files_skipped > 0 {
            breakdown.push(format!("{} skipped", self.files_skipped));
        }
        if !self.failed_items.is_empty() {
            breakdown.push(format!("{} failed", self.failed_items.len()));
        }
        if !breakdown.is_empty() {
            message.push_str(&format!(" ({})", breakdown.join(", ")));
        }

        if !self.failed_items.is_empty() {
            message.push_str(&format!(". Failed: {}", self.failed_items.join(", ")));
        }
        if !source_removed {
            message.push_str(&format!(". Source folder {folder_name} was kept"));
        }
        message
    }

    /// Converts finished stats into the top-level result.
    pub fn into_result(self, folder_name: &str, source_removed: bool) -> ArchiveResult {
        let message = self.summary(folder_name, source_removed);
        if self.failed_items.is_empty() {
            ArchiveResult::success(message)
        } else {
            ArchiveResult::failure(
                ArchiveFailure::PartialMergeFailure {
                    failed_items: self.failed_items,
                },
                message,
            )
        }
    }
}

/// Aggregate outcome of a sequential batch operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub total: usize,
    pub succeeded: usize,
    /// Per-item results in input order.
    pub results: Vec<(String, ArchiveResult)>,
    /// Aggregate count message, e.g. `2 of 3 items archived`.
    pub message: String,
}

impl BatchOutcome {
    pub fn from_results(results: Vec<(String, ArchiveResult)>, verb: &str) -> Self {
        let total = results.len();
        let succeeded = results.iter().filter(|(_, result)| result.success).count();
        Self {
            total,
            succeeded,
            results,
            message: format!("{succeeded} of {total} items {verb}"),
        }
    }

    pub fn failed(&self) -> impl Iterator<Item = &(String, ArchiveResult)> {
        self.results.iter().filter(|(_, result)| !result.success)
    }
}

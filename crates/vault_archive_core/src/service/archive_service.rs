//! Archive orchestration.
//!
//! # Responsibility
//! - Decide per item whether a plain move suffices or a collision branch
//!   (merge, replace, rename, cancel) is needed.
//! - Turn every terminal state into one `ArchiveResult`.
//!
//! # Invariants
//! - Archived-ness is checked before any path translation.
//! - Folder-onto-folder archive collisions merge without prompting; every
//!   other archive collision offers Replace/Rename/Cancel; unarchive
//!   collisions offer Replace/Cancel.
//! - `Cancel` returns before any vault mutation for the colliding item.
//! - A collision with an ancestor of the item itself is refused untouched.

use crate::model::item::{file_name, normalize_path, parent_path, VaultItem};
use crate::model::outcome::{ArchiveFailure, ArchiveResult, BatchOutcome};
use crate::repo::vault_repo::{VaultRepoResult, VaultRepository};
use crate::service::archive_paths::{
    contains_archive_folder, from_archive_path, is_archived, to_archive_parent_path,
    to_archive_path, unique_renamed_item_path,
};
use crate::service::conflict::{resolve_offered, ConflictChoice, ConflictPrompt, ConflictResolver};
use crate::service::merge_service::MergeService;
use log::{debug, info, warn};
use std::time::Instant;

/// Direction of one move relative to the archive folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Archive,
    Unarchive,
}

impl Direction {
    fn event(self) -> &'static str {
        match self {
            Self::Archive => "archive_item",
            Self::Unarchive => "unarchive_item",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Unarchive => "unarchive",
        }
    }

    fn past(self) -> &'static str {
        match self {
            Self::Archive => "archived",
            Self::Unarchive => "unarchived",
        }
    }
}

/// Archive use-case service over a vault repository and a conflict resolver.
pub struct ArchiveService<R: VaultRepository, C: ConflictResolver> {
    repo: R,
    resolver: C,
    archive_folder: String,
}

impl<R: VaultRepository, C: ConflictResolver> ArchiveService<R, C> {
    /// Creates a service; `archive_folder` is expected to be validated
    /// settings input.
    pub fn new(repo: R, resolver: C, archive_folder: impl AsRef<str>) -> Self {
        Self {
            repo,
            resolver,
            archive_folder: normalize_path(archive_folder.as_ref()),
        }
    }

    pub fn archive_folder(&self) -> &str {
        &self.archive_folder
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn is_archived(&self, item: &VaultItem) -> bool {
        is_archived(&item.path, &self.archive_folder)
    }

    /// Moves one item into the archive, mirroring its parent path.
    pub fn archive_item(&self, item: &VaultItem) -> ArchiveResult {
        let started_at = Instant::now();
        let result = self.archive_item_inner(item);
        log_outcome(Direction::Archive, item, &result, started_at);
        result
    }

    /// Moves one archived item back to its original location.
    pub fn unarchive_item(&self, item: &VaultItem) -> ArchiveResult {
        let started_at = Instant::now();
        let result = self.unarchive_item_inner(item);
        log_outcome(Direction::Unarchive, item, &result, started_at);
        result
    }

    /// Archives items one after another in input order.
    pub fn archive_items(&self, items: &[VaultItem]) -> BatchOutcome {
        self.run_batch(items, Direction::Archive)
    }

    /// Unarchives items one after another in input order.
    pub fn unarchive_items(&self, items: &[VaultItem]) -> BatchOutcome {
        self.run_batch(items, Direction::Unarchive)
    }

    fn run_batch(&self, items: &[VaultItem], direction: Direction) -> BatchOutcome {
        let started_at = Instant::now();
        let results = items
            .iter()
            .map(|item| {
                let result = match direction {
                    Direction::Archive => self.archive_item(item),
                    Direction::Unarchive => self.unarchive_item(item),
                };
                (item.path.clone(), result)
            })
            .collect();
        let outcome = BatchOutcome::from_results(results, direction.past());
        info!(
            "event={}_batch module=archive status=ok duration_ms={} total={} succeeded={}",
            direction.verb(),
            started_at.elapsed().as_millis(),
            outcome.total,
            outcome.succeeded
        );
        outcome
    }

    fn archive_item_inner(&self, item: &VaultItem) -> ArchiveResult {
        if self.is_archived(item) {
            return ArchiveResult::failure(
                ArchiveFailure::AlreadyArchived,
                format!("{} is already archived", item.name),
            );
        }
        if contains_archive_folder(&item.path, &self.archive_folder) {
            return ArchiveResult::failure(
                ArchiveFailure::IoFailure("item contains the archive folder".to_string()),
                format!(
                    "Unable to archive {}: it contains the archive folder {}",
                    item.name, self.archive_folder
                ),
            );
        }

        let destination_folder = to_archive_parent_path(item.parent_path(), &self.archive_folder);
        let destination = to_archive_path(&item.path, &self.archive_folder);
        debug!("event=archive_item module=archive status=start destination={destination}");

        let Some(existing) = self.repo.get_item(&destination) else {
            return self.plain_move(item, &destination, Direction::Archive);
        };

        if item.is_folder() && existing.is_folder() {
            return self.merge_into(item, &existing, Direction::Archive);
        }

        let prompt = ConflictPrompt::archive_collision(item, &destination_folder);
        match resolve_offered(&self.resolver, &prompt) {
            ConflictChoice::Replace => self.replace(item, &existing, Direction::Archive),
            ConflictChoice::Rename => self.rename_into(item, &destination_folder),
            ConflictChoice::Merge | ConflictChoice::Cancel => ArchiveResult::cancelled(),
        }
    }

    fn unarchive_item_inner(&self, item: &VaultItem) -> ArchiveResult {
        if !self.is_archived(item) {
            return ArchiveResult::failure(
                ArchiveFailure::NotArchived,
                format!("{} is not archived", item.name),
            );
        }
        let Some(original) = from_archive_path(&item.path, &self.archive_folder) else {
            return ArchiveResult::failure(
                ArchiveFailure::NotArchived,
                format!("{} is the archive folder itself and cannot be unarchived", item.name),
            );
        };

        if let Err(err) = self.ensure_folder(parent_path(&original)) {
            return io_failure(item, Direction::Unarchive, err.to_string());
        }

        let Some(existing) = self.repo.get_item(&original) else {
            return self.plain_move(item, &original, Direction::Unarchive);
        };
        if item.path.starts_with(&format!("{}/", existing.path)) {
            return ArchiveResult::failure(
                ArchiveFailure::IoFailure("original location contains the item".to_string()),
                format!(
                    "Unable to unarchive {}: {} contains it and cannot be replaced",
                    item.name, existing.path
                ),
            );
        }

        let prompt = ConflictPrompt::unarchive_collision(item, parent_or_root(&original));
        match resolve_offered(&self.resolver, &prompt) {
            ConflictChoice::Replace => self.replace(item, &existing, Direction::Unarchive),
            ConflictChoice::Rename | ConflictChoice::Merge | ConflictChoice::Cancel => {
                ArchiveResult::cancelled()
            }
        }
    }

    /// Ensures the destination parent exists, then moves in one rename.
    fn plain_move(&self, item: &VaultItem, destination: &str, direction: Direction) -> ArchiveResult {
        match self.move_with_parent(item, destination) {
            Ok(()) => ArchiveResult::success(format!(
                "{} {} successfully",
                item.name,
                direction.past()
            )),
            Err(err) => io_failure(item, direction, err.to_string()),
        }
    }

    fn replace(&self, item: &VaultItem, existing: &VaultItem, direction: Direction) -> ArchiveResult {
        let replaced = self
            .repo
            .trash(existing)
            .and_then(|()| self.move_with_parent(item, &existing.path));
        match replaced {
            Ok(()) => ArchiveResult::success(format!(
                "{} {} successfully, replacing the existing item",
                item.name,
                direction.past()
            )),
            Err(err) => io_failure(item, direction, err.to_string()),
        }
    }

    fn rename_into(&self, item: &VaultItem, destination_folder: &str) -> ArchiveResult {
        let destination = unique_renamed_item_path(item, destination_folder, |candidate| {
            self.repo.exists(candidate)
        });
        match self.move_with_parent(item, &destination) {
            Ok(()) => ArchiveResult::success(format!(
                "{} archived as {}",
                item.name,
                file_name(&destination)
            )),
            Err(err) => io_failure(item, Direction::Archive, err.to_string()),
        }
    }

    fn merge_into(&self, item: &VaultItem, existing: &VaultItem, direction: Direction) -> ArchiveResult {
        let merger = MergeService::new(&self.repo);
        let stats = merger.merge_folder(item, &existing.path);
        let source_removed = merger.remove_if_empty(item);
        if !source_removed {
            warn!(
                "event={} module=archive status=skip reason=source_not_empty",
                direction.event()
            );
        }
        stats.into_result(&item.name, source_removed)
    }

    fn move_with_parent(&self, item: &VaultItem, destination: &str) -> VaultRepoResult<()> {
        self.ensure_folder(parent_path(destination))?;
        self.repo.move_item(item, destination)
    }

    fn ensure_folder(&self, path: &str) -> VaultRepoResult<()> {
        if path.is_empty() || self.repo.get_item(path).is_some() {
            return Ok(());
        }
        self.repo.create_folder(path).map(|_| ())
    }
}

fn parent_or_root(path: &str) -> &str {
    match parent_path(path) {
        "" => "the vault root",
        parent => parent,
    }
}

fn io_failure(item: &VaultItem, direction: Direction, message: String) -> ArchiveResult {
    let text = format!("Unable to {} {}: {}", direction.verb(), item.name, message);
    ArchiveResult::failure(ArchiveFailure::IoFailure(message), text)
}

fn log_outcome(direction: Direction, item: &VaultItem, result: &ArchiveResult, started_at: Instant) {
    let kind = if item.is_folder() { "folder" } else { "file" };
    match &result.failure {
        None => info!(
            "event={} module=archive status=ok kind={} duration_ms={}",
            direction.event(),
            kind,
            started_at.elapsed().as_millis()
        ),
        Some(failure) => warn!(
            "event={} module=archive status=error kind={} duration_ms={} error={}",
            direction.event(),
            kind,
            started_at.elapsed().as_millis(),
            failure
        ),
    }
}

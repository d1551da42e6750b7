//! Recursive folder merge.
//!
//! # Responsibility
//! - Reconcile a source folder's children into an existing destination
//!   folder, item by item.
//! - Convert every per-item gateway failure into a failed-item entry.
//!
//! # Invariants
//! - Children are listed once per folder before any mutation, so the walk
//!   never observes its own moves or deletes.
//! - A failed child stays at its original location and siblings continue.
//! - Source folders are only deleted when empty, never force-deleted.

use crate::model::item::{join_path, VaultItem};
use crate::model::outcome::MergeStats;
use crate::repo::vault_repo::{VaultRepoError, VaultRepoResult, VaultRepository};
use log::{debug, info, warn};
use std::time::Instant;

/// How one source file was reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileMerge {
    Added,
    Replaced,
    Skipped,
}

/// Folder merge engine over one repository.
pub struct MergeService<R: VaultRepository> {
    repo: R,
}

impl<R: VaultRepository> MergeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Merges the contents of `source` into the folder at `destination_path`.
    ///
    /// Nested source folders emptied by the walk are removed; `source` itself
    /// is left for the caller to clean up via [`Self::remove_if_empty`].
    pub fn merge_folder(&self, source: &VaultItem, destination_path: &str) -> MergeStats {
        let started_at = Instant::now();
        info!("event=merge_folder module=merge status=start");

        let mut stats = MergeStats::default();
        self.merge_children(source, destination_path, &mut stats);

        let status = if stats.has_failures() { "error" } else { "ok" };
        info!(
            "event=merge_folder module=merge status={} duration_ms={} added={} replaced={} skipped={} folders_created={} failed={}",
            status,
            started_at.elapsed().as_millis(),
            stats.files_added,
            stats.files_replaced,
            stats.files_skipped,
            stats.folders_created,
            stats.failed_items.len()
        );
        stats
    }

    /// Deletes `folder` when it has no remaining children.
    ///
    /// Returns `true` only when the folder was deleted.
    pub fn remove_if_empty(&self, folder: &VaultItem) -> bool {
        match self.repo.list_children(folder) {
            Ok(children) if children.is_empty() => match self.repo.delete(folder) {
                Ok(()) => true,
                Err(err) => {
                    warn!(
                        "event=merge_folder module=merge phase=cleanup status=error error={}",
                        err
                    );
                    false
                }
            },
            Ok(children) => {
                debug!(
                    "event=merge_folder module=merge phase=cleanup status=skip remaining={} folder={}",
                    children.len(),
                    folder.path
                );
                false
            }
            Err(err) => {
                warn!(
                    "event=merge_folder module=merge phase=cleanup status=error error={}",
                    err
                );
                false
            }
        }
    }

    fn merge_children(&self, source: &VaultItem, destination_path: &str, stats: &mut MergeStats) {
        let children = match self.repo.list_children(source) {
            Ok(children) => children,
            Err(err) => {
                warn!(
                    "event=merge_item module=merge status=error kind=folder op=list error={}",
                    err
                );
                stats.failed_items.push(source.name.clone());
                return;
            }
        };

        for child in children {
            let target = join_path(destination_path, &child.name);
            if child.is_folder() {
                self.merge_child_folder(&child, &target, stats);
            } else {
                self.merge_child_file(&child, &target, stats);
            }
        }
    }

    fn merge_child_folder(&self, child: &VaultItem, target: &str, stats: &mut MergeStats) {
        match self.repo.get_item(target) {
            Some(existing) if existing.is_folder() => {}
            Some(_) => {
                warn!(
                    "event=merge_item module=merge status=error kind=folder reason=file_in_the_way"
                );
                stats.failed_items.push(child.name.clone());
                return;
            }
            None => match self.repo.create_folder(target) {
                Ok(_) => stats.folders_created += 1,
                Err(err) => {
                    warn!(
                        "event=merge_item module=merge status=error kind=folder op=create error={}",
                        err
                    );
                    stats.failed_items.push(child.name.clone());
                    return;
                }
            },
        }

        self.merge_children(child, target, stats);
        self.remove_if_empty(child);
    }

    fn merge_child_file(&self, child: &VaultItem, target: &str, stats: &mut MergeStats) {
        match self.reconcile_file(child, target) {
            Ok(FileMerge::Added) => stats.files_added += 1,
            Ok(FileMerge::Replaced) => stats.files_replaced += 1,
            Ok(FileMerge::Skipped) => stats.files_skipped += 1,
            Err(err) => {
                warn!(
                    "event=merge_item module=merge status=error kind=file error={}",
                    err
                );
                stats.failed_items.push(child.name.clone());
            }
        }
    }

    fn reconcile_file(&self, child: &VaultItem, target: &str) -> VaultRepoResult<FileMerge> {
        let Some(existing) = self.repo.get_item(target) else {
            self.repo.move_item(child, target)?;
            return Ok(FileMerge::Added);
        };
        if existing.is_folder() {
            return Err(VaultRepoError::NotAFile(existing.path));
        }

        let incoming = self.repo.read_contents(child)?;
        let current = self.repo.read_contents(&existing)?;
        if incoming == current {
            self.repo.delete(child)?;
            return Ok(FileMerge::Skipped);
        }

        self.repo.trash(&existing)?;
        self.repo.move_item(child, target)?;
        Ok(FileMerge::Replaced)
    }
}

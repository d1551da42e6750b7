//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose archive/unarchive and settings validation to Dart via FRB.
//! - Flatten core results into plain response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Conflicts are resolved by a caller-supplied policy string; the modal
//!   prompt itself lives on the Dart side.

use log::warn;
use vault_archive_core::{
    available_commands as available_commands_inner, core_version as core_version_inner,
    init_logging as init_logging_inner, validate_archive_folder as validate_archive_folder_inner,
    ArchiveFailure, ArchiveResult, ArchiveService, BatchOutcome, CommandSurface, ConflictChoice,
    DiskVaultRepository, FixedChoice, VaultItem, VaultRepository,
};

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Settings field validation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsFieldResponse {
    pub ok: bool,
    /// Normalized value on success, the rejected input otherwise.
    pub archive_folder: String,
    pub message: String,
}

/// Result for one item of an archive batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemActionResponse {
    pub path: String,
    pub ok: bool,
    pub message: String,
}

/// Aggregate response for archive/unarchive calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchActionResponse {
    pub ok: bool,
    pub succeeded: u32,
    pub total: u32,
    /// Aggregate message for a notice, e.g. `2 of 3 items archived`.
    pub message: String,
    pub items: Vec<ItemActionResponse>,
}

impl BatchActionResponse {
    fn failure(message: impl Into<String>, total: usize) -> Self {
        Self {
            ok: false,
            succeeded: 0,
            total: total as u32,
            message: message.into(),
            items: Vec::new(),
        }
    }
}

impl From<BatchOutcome> for BatchActionResponse {
    fn from(outcome: BatchOutcome) -> Self {
        Self {
            ok: outcome.succeeded == outcome.total,
            succeeded: outcome.succeeded as u32,
            total: outcome.total as u32,
            message: outcome.message,
            items: outcome
                .results
                .into_iter()
                .map(|(path, result)| to_item_response(path, result))
                .collect(),
        }
    }
}

/// Validates one archive folder edit from the settings tab.
///
/// # FFI contract
/// - Sync call, no I/O.
/// - On rejection the caller keeps and redisplays its previous value.
#[flutter_rust_bridge::frb(sync)]
pub fn validate_archive_folder(value: String) -> SettingsFieldResponse {
    match validate_archive_folder_inner(&value) {
        Ok(folder) => SettingsFieldResponse {
            ok: true,
            archive_folder: folder,
            message: String::new(),
        },
        Err(err) => SettingsFieldResponse {
            ok: false,
            archive_folder: value,
            message: err.to_string(),
        },
    }
}

/// Moves items into the archive folder of the vault at `vault_root`.
///
/// `on_conflict` is `replace|rename|cancel`; unknown values cancel.
///
/// # FFI contract
/// - Sync call, filesystem-backed execution.
/// - Items are processed in input order.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn archive_items(
    vault_root: String,
    archive_folder: String,
    paths: Vec<String>,
    on_conflict: String,
) -> BatchActionResponse {
    run_batch(vault_root, archive_folder, paths, on_conflict, true)
}

/// Moves archived items back to their original locations.
///
/// `on_conflict` is `replace|cancel`; anything else cancels.
#[flutter_rust_bridge::frb(sync)]
pub fn unarchive_items(
    vault_root: String,
    archive_folder: String,
    paths: Vec<String>,
    on_conflict: String,
) -> BatchActionResponse {
    run_batch(vault_root, archive_folder, paths, on_conflict, false)
}

/// Returns palette command ids applicable to one vault path.
///
/// # FFI contract
/// - Sync call, no I/O.
/// - Invalid archive folders yield an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn available_commands(path: String, is_folder: bool, archive_folder: String) -> Vec<String> {
    let Ok(archive_folder) = validate_archive_folder_inner(&archive_folder) else {
        return Vec::new();
    };
    let item = if is_folder {
        VaultItem::folder(path)
    } else {
        VaultItem::file(path)
    };
    available_commands_inner(&item, &archive_folder)
        .into_iter()
        .map(|command| command.id(CommandSurface::Palette).to_string())
        .collect()
}

fn run_batch(
    vault_root: String,
    archive_folder: String,
    paths: Vec<String>,
    on_conflict: String,
    archive: bool,
) -> BatchActionResponse {
    let archive_folder = match validate_archive_folder_inner(&archive_folder) {
        Ok(folder) => folder,
        Err(err) => return BatchActionResponse::failure(err.to_string(), paths.len()),
    };
    let repo = match DiskVaultRepository::open(vault_root.trim()) {
        Ok(repo) => repo,
        Err(err) => {
            return BatchActionResponse::failure(format!("vault open failed: {err}"), paths.len())
        }
    };
    let choice = on_conflict.parse::<ConflictChoice>().unwrap_or_else(|err| {
        warn!("event=ffi_batch module=ffi status=skip reason=unknown_conflict_policy error={err}");
        ConflictChoice::Cancel
    });

    let service = ArchiveService::new(&repo, FixedChoice(choice), &archive_folder);
    let results = paths
        .into_iter()
        .map(|path| {
            let result = match repo.get_item(&path) {
                Some(item) if archive => service.archive_item(&item),
                Some(item) => service.unarchive_item(&item),
                None => ArchiveResult::failure(
                    ArchiveFailure::IoFailure("item not found".to_string()),
                    format!("{path} does not exist"),
                ),
            };
            (path, result)
        })
        .collect();
    let verb = if archive { "archived" } else { "unarchived" };
    BatchActionResponse::from(BatchOutcome::from_results(results, verb))
}

fn to_item_response(path: String, result: ArchiveResult) -> ItemActionResponse {
    ItemActionResponse {
        path,
        ok: result.success,
        message: result.message,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        archive_items, available_commands, core_version, init_logging, unarchive_items,
        validate_archive_folder,
    };
    use std::fs;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn validate_archive_folder_reports_normalized_value() {
        let ok = validate_archive_folder(" Old/Archive/ ".to_string());
        assert!(ok.ok);
        assert_eq!(ok.archive_folder, "Old/Archive");

        let rejected = validate_archive_folder(".hidden".to_string());
        assert!(!rejected.ok);
        assert!(!rejected.message.is_empty());
    }

    #[test]
    fn available_commands_follow_archived_ness() {
        assert_eq!(
            available_commands("Notes/a.md".to_string(), false, "Archive".to_string()),
            vec!["move-to-archive".to_string()]
        );
        assert_eq!(
            available_commands("Archive/a.md".to_string(), false, "Archive".to_string()),
            vec!["move-out-of-archive".to_string()]
        );
    }

    #[test]
    fn archive_then_unarchive_through_ffi() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::create_dir_all(dir.path().join("Notes")).expect("create notes");
        fs::write(dir.path().join("Notes/a.md"), "a").expect("write note");
        let root = dir.path().to_str().expect("utf-8 path").to_string();

        let archived = archive_items(
            root.clone(),
            "Archive".to_string(),
            vec!["Notes/a.md".to_string(), "Notes/missing.md".to_string()],
            "cancel".to_string(),
        );
        assert_eq!(archived.succeeded, 1);
        assert_eq!(archived.total, 2);
        assert_eq!(archived.message, "1 of 2 items archived");
        assert!(!archived.ok);
        let paths: Vec<&str> = archived.items.iter().map(|item| item.path.as_str()).collect();
        assert_eq!(paths, vec!["Notes/a.md", "Notes/missing.md"]);
        assert!(!archived.items[1].ok);
        assert!(dir.path().join("Archive/Notes/a.md").is_file());

        let restored = unarchive_items(
            root,
            "Archive".to_string(),
            vec!["Archive/Notes/a.md".to_string()],
            "cancel".to_string(),
        );
        assert!(restored.ok, "{}", restored.message);
        assert_eq!(restored.message, "1 of 1 items unarchived");
        assert!(dir.path().join("Notes/a.md").is_file());
    }
}

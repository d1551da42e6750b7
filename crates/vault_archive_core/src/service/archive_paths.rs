//! Live path <-> archive path translation.
//!
//! # Invariants
//! - An item is archived iff its path is the archive folder or lies below it.
//! - `from_archive_path(to_archive_path(p, a), a) == p` for normalized `p`.

use crate::model::item::{join_path, normalize_path, split_extension, VaultItem};
use chrono::{Local, NaiveDateTime, Timelike};

/// Timestamp layout appended to renamed items (`YYYYMMDD-HHMMSS`).
pub const RENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Maps a live item path to its location under the archive folder.
pub fn to_archive_path(item_path: &str, archive_folder: &str) -> String {
    join_path(archive_folder, item_path)
}

/// Maps the parent folder of a live item to the mirrored archive folder.
///
/// This is the destination folder, not the destination item path.
pub fn to_archive_parent_path(item_parent_path: &str, archive_folder: &str) -> String {
    join_path(archive_folder, item_parent_path)
}

/// Strips the archive folder prefix from an archived path.
///
/// Returns `None` when `item_path` is not strictly below `archive_folder`.
pub fn from_archive_path(item_path: &str, archive_folder: &str) -> Option<String> {
    let item_path = normalize_path(item_path);
    let archive_folder = normalize_path(archive_folder);
    if archive_folder.is_empty() {
        return None;
    }
    item_path
        .strip_prefix(archive_folder.as_str())
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}

/// Returns `true` when `item_path` is the archive folder or lies below it.
pub fn is_archived(item_path: &str, archive_folder: &str) -> bool {
    let item_path = normalize_path(item_path);
    let archive_folder = normalize_path(archive_folder);
    if archive_folder.is_empty() {
        return false;
    }
    item_path == archive_folder || item_path.starts_with(&format!("{archive_folder}/"))
}

/// Returns `true` when moving `item_path` into the archive would move the
/// archive folder into itself.
pub fn contains_archive_folder(item_path: &str, archive_folder: &str) -> bool {
    let item_path = normalize_path(item_path);
    let archive_folder = normalize_path(archive_folder);
    item_path.is_empty() || archive_folder.starts_with(&format!("{item_path}/"))
}

/// Builds a collision-free `base-YYYYMMDD-HHMMSS[ext]` path in
/// `destination_folder` using the current local time.
pub fn unique_renamed_path(
    original_name: &str,
    destination_folder: &str,
    exists: impl Fn(&str) -> bool,
) -> String {
    unique_renamed_path_at(original_name, destination_folder, now_truncated(), exists)
}

/// Same as [`unique_renamed_path`] but keeps folder names whole, since folders
/// carry no extension.
pub fn unique_renamed_item_path(
    item: &VaultItem,
    destination_folder: &str,
    exists: impl Fn(&str) -> bool,
) -> String {
    let timestamp = now_truncated();
    if item.is_folder() {
        build_unique(&item.name, "", destination_folder, timestamp, exists)
    } else {
        unique_renamed_path_at(&item.name, destination_folder, timestamp, exists)
    }
}

/// Deterministic variant of [`unique_renamed_path`] with an explicit timestamp.
///
/// The name splits at its last `.` unless that dot is the first character.
/// When `base-TS[ext]` is taken, `-1`, `-2`, ... are tried in order and the
/// first free candidate wins.
pub fn unique_renamed_path_at(
    original_name: &str,
    destination_folder: &str,
    timestamp: NaiveDateTime,
    exists: impl Fn(&str) -> bool,
) -> String {
    let (base, extension) = split_extension(original_name);
    build_unique(
        base,
        extension.unwrap_or(""),
        destination_folder,
        timestamp,
        exists,
    )
}

fn build_unique(
    base: &str,
    extension: &str,
    destination_folder: &str,
    timestamp: NaiveDateTime,
    exists: impl Fn(&str) -> bool,
) -> String {
    let stamp = timestamp.format(RENAME_TIMESTAMP_FORMAT).to_string();
    let candidate = join_path(destination_folder, &format!("{base}-{stamp}{extension}"));
    if !exists(&candidate) {
        return candidate;
    }

    let mut counter = 1u64;
    loop {
        let candidate = join_path(
            destination_folder,
            &format!("{base}-{stamp}-{counter}{extension}"),
        );
        if !exists(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

fn now_truncated() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

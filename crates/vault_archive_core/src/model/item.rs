//! Vault item model and path helpers.
//!
//! # Invariants
//! - Paths are `/`-separated and relative to the vault root.
//! - The vault root is represented by the empty path `""`.
//! - `name` is always the final segment of `path`.

use serde::{Deserialize, Serialize};

/// Path separator used by vault paths on every platform.
pub const PATH_SEPARATOR: char = '/';

/// Entry kind for one vault item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Regular file with byte contents.
    File,
    /// Folder owning child items.
    Folder,
}

/// One file or folder snapshot as reported by a vault repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultItem {
    /// Normalized vault-relative path.
    pub path: String,
    /// Final path segment.
    pub name: String,
    /// File or folder.
    pub kind: ItemKind,
}

impl VaultItem {
    /// Builds an item from any path spelling; the path is normalized.
    pub fn new(path: impl AsRef<str>, kind: ItemKind) -> Self {
        let path = normalize_path(path.as_ref());
        let name = file_name(&path).to_string();
        Self { path, name, kind }
    }

    pub fn file(path: impl AsRef<str>) -> Self {
        Self::new(path, ItemKind::File)
    }

    pub fn folder(path: impl AsRef<str>) -> Self {
        Self::new(path, ItemKind::Folder)
    }

    pub fn is_folder(&self) -> bool {
        self.kind == ItemKind::Folder
    }

    /// Parent folder path; root-level items return `""`.
    pub fn parent_path(&self) -> &str {
        parent_path(&self.path)
    }

    /// File extension including the leading dot, for files only.
    ///
    /// Dotfiles such as `.env` have no extension.
    pub fn extension(&self) -> Option<&str> {
        if self.is_folder() {
            return None;
        }
        split_extension(&self.name).1
    }
}

/// Collapses redundant separators and drops `.` segments.
///
/// `..` segments are kept verbatim; archive paths only ever move forward.
pub fn normalize_path(path: &str) -> String {
    path.split(PATH_SEPARATOR)
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Joins two vault paths and normalizes the result.
pub fn join_path(base: &str, child: &str) -> String {
    normalize_path(&format!("{base}{PATH_SEPARATOR}{child}"))
}

/// Returns the parent folder portion of a normalized path.
pub fn parent_path(path: &str) -> &str {
    match path.rfind(PATH_SEPARATOR) {
        Some(index) => &path[..index],
        None => "",
    }
}

/// Returns the final segment of a normalized path.
pub fn file_name(path: &str) -> &str {
    match path.rfind(PATH_SEPARATOR) {
        Some(index) => &path[index + 1..],
        None => path,
    }
}

/// Splits a name into `(base, extension)` at the last `.`.
///
/// No split happens when the only dot is at position 0, so dotfiles keep
/// their whole name as base.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(index) if index > 0 => (&name[..index], Some(&name[index..])),
        _ => (name, None),
    }
}

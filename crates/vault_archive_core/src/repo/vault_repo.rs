//! Vault repository contract.
//!
//! # Responsibility
//! - Describe existence lookup, folder creation, move, trash, delete and
//!   content read for vault items.
//!
//! # Invariants
//! - `get_item` is total: lookup problems are reported as "absent".
//! - `delete` on a folder only succeeds when the folder is empty.

use crate::model::item::VaultItem;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by vault repository operations.
pub type VaultRepoResult<T> = Result<T, VaultRepoError>;

/// Primitive operation kind, used for error reporting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VaultOp {
    List,
    CreateFolder,
    Move,
    Trash,
    Delete,
    Read,
}

impl VaultOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::CreateFolder => "create_folder",
            Self::Move => "move",
            Self::Trash => "trash",
            Self::Delete => "delete",
            Self::Read => "read",
        }
    }
}

/// Errors from vault repository operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultRepoError {
    /// Underlying storage failure with its description.
    Io {
        op: VaultOp,
        path: String,
        message: String,
    },
    /// Target item does not exist.
    NotFound(String),
    /// Destination path is already occupied.
    AlreadyExists(String),
    /// Path escapes the vault or is otherwise unusable.
    InvalidPath(String),
    /// Folder still has children.
    FolderNotEmpty(String),
    /// Item exists but is not a folder.
    NotAFolder(String),
    /// Item exists but is not a file.
    NotAFile(String),
}

impl Display for VaultRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { op, path, message } => {
                write!(f, "{} failed for `{path}`: {message}", op.as_str())
            }
            Self::NotFound(path) => write!(f, "item not found: {path}"),
            Self::AlreadyExists(path) => write!(f, "destination already exists: {path}"),
            Self::InvalidPath(path) => write!(f, "invalid vault path: {path}"),
            Self::FolderNotEmpty(path) => write!(f, "folder is not empty: {path}"),
            Self::NotAFolder(path) => write!(f, "not a folder: {path}"),
            Self::NotAFile(path) => write!(f, "not a file: {path}"),
        }
    }
}

impl Error for VaultRepoError {}

/// Filesystem gateway consumed by the archive core.
pub trait VaultRepository {
    /// Looks up one item by vault-relative path.
    fn get_item(&self, path: &str) -> Option<VaultItem>;
    /// Lists direct children of one folder as a snapshot.
    fn list_children(&self, folder: &VaultItem) -> VaultRepoResult<Vec<VaultItem>>;
    /// Creates one folder; parent folders are created as needed.
    fn create_folder(&self, path: &str) -> VaultRepoResult<VaultItem>;
    /// Moves one item to `new_path`; the destination parent must exist.
    fn move_item(&self, item: &VaultItem, new_path: &str) -> VaultRepoResult<()>;
    /// Soft-deletes one item.
    fn trash(&self, item: &VaultItem) -> VaultRepoResult<()>;
    /// Hard-deletes one file or empty folder.
    fn delete(&self, item: &VaultItem) -> VaultRepoResult<()>;
    /// Reads the full byte contents of one file.
    fn read_contents(&self, item: &VaultItem) -> VaultRepoResult<Vec<u8>>;

    /// Returns `true` when an item exists at `path`.
    fn exists(&self, path: &str) -> bool {
        self.get_item(path).is_some()
    }
}

impl<T: VaultRepository + ?Sized> VaultRepository for &T {
    fn get_item(&self, path: &str) -> Option<VaultItem> {
        (**self).get_item(path)
    }

    fn list_children(&self, folder: &VaultItem) -> VaultRepoResult<Vec<VaultItem>> {
        (**self).list_children(folder)
    }

    fn create_folder(&self, path: &str) -> VaultRepoResult<VaultItem> {
        (**self).create_folder(path)
    }

    fn move_item(&self, item: &VaultItem, new_path: &str) -> VaultRepoResult<()> {
        (**self).move_item(item, new_path)
    }

    fn trash(&self, item: &VaultItem) -> VaultRepoResult<()> {
        (**self).trash(item)
    }

    fn delete(&self, item: &VaultItem) -> VaultRepoResult<()> {
        (**self).delete(item)
    }

    fn read_contents(&self, item: &VaultItem) -> VaultRepoResult<Vec<u8>> {
        (**self).read_contents(item)
    }
}

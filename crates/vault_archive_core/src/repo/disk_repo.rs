//! Disk-backed vault repository.
//!
//! # Responsibility
//! - Map vault-relative paths onto one root directory on disk.
//! - Implement soft-delete by relocating items into `<vault>/.trash`.
//!
//! # Invariants
//! - Paths containing `..` segments are rejected before touching disk.
//! - The trash directory is never listed as a vault child.

use crate::model::item::{
    file_name, join_path, normalize_path, parent_path, split_extension, ItemKind, VaultItem,
};
use crate::repo::vault_repo::{VaultOp, VaultRepoError, VaultRepoResult, VaultRepository};
use log::warn;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory name used for soft-deleted items, relative to the vault root.
pub const TRASH_DIR_NAME: &str = ".trash";

/// `VaultRepository` rooted at one directory on disk.
#[derive(Debug, Clone)]
pub struct DiskVaultRepository {
    root: PathBuf,
}

impl DiskVaultRepository {
    /// Opens an existing vault directory.
    pub fn open(root: impl Into<PathBuf>) -> VaultRepoResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(VaultRepoError::NotFound(root.display().to_string()));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> VaultRepoResult<PathBuf> {
        let normalized = normalize_path(path);
        if normalized.split('/').any(|segment| segment == "..") {
            return Err(VaultRepoError::InvalidPath(path.to_string()));
        }
        let mut resolved = self.root.clone();
        for segment in normalized.split('/').filter(|segment| !segment.is_empty()) {
            resolved.push(segment);
        }
        Ok(resolved)
    }

    fn trash_destination(&self, name: &str) -> PathBuf {
        let trash_dir = self.root.join(TRASH_DIR_NAME);
        let candidate = trash_dir.join(name);
        if fs::symlink_metadata(&candidate).is_err() {
            return candidate;
        }

        let (base, extension) = split_extension(name);
        let extension = extension.unwrap_or("");
        let mut counter = 1u64;
        loop {
            let candidate = trash_dir.join(format!("{base} {counter}{extension}"));
            if fs::symlink_metadata(&candidate).is_err() {
                return candidate;
            }
            counter += 1;
        }
    }
}

fn io_error(op: VaultOp, path: &str, err: std::io::Error) -> VaultRepoError {
    match err.kind() {
        ErrorKind::NotFound => VaultRepoError::NotFound(path.to_string()),
        ErrorKind::AlreadyExists => VaultRepoError::AlreadyExists(path.to_string()),
        _ => VaultRepoError::Io {
            op,
            path: path.to_string(),
            message: err.to_string(),
        },
    }
}

fn kind_of(path: &Path) -> Option<ItemKind> {
    let metadata = fs::metadata(path).ok()?;
    if metadata.is_dir() {
        Some(ItemKind::Folder)
    } else {
        Some(ItemKind::File)
    }
}

impl VaultRepository for DiskVaultRepository {
    fn get_item(&self, path: &str) -> Option<VaultItem> {
        let resolved = self.resolve(path).ok()?;
        kind_of(&resolved).map(|kind| VaultItem::new(path, kind))
    }

    fn list_children(&self, folder: &VaultItem) -> VaultRepoResult<Vec<VaultItem>> {
        let resolved = self.resolve(&folder.path)?;
        let entries =
            fs::read_dir(&resolved).map_err(|err| io_error(VaultOp::List, &folder.path, err))?;

        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| io_error(VaultOp::List, &folder.path, err))?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                warn!(
                    "event=vault_list module=repo status=skip reason=non_utf8_name folder={}",
                    folder.path
                );
                continue;
            };
            if folder.path.is_empty() && name == TRASH_DIR_NAME {
                continue;
            }
            let Some(kind) = kind_of(&entry.path()) else {
                continue;
            };
            children.push(VaultItem::new(join_path(&folder.path, &name), kind));
        }
        children.sort_by(|left, right| left.path.cmp(&right.path));
        Ok(children)
    }

    fn create_folder(&self, path: &str) -> VaultRepoResult<VaultItem> {
        let normalized = normalize_path(path);
        let resolved = self.resolve(&normalized)?;
        if normalized.is_empty() || fs::symlink_metadata(&resolved).is_ok() {
            return Err(VaultRepoError::AlreadyExists(normalized));
        }
        fs::create_dir_all(&resolved)
            .map_err(|err| io_error(VaultOp::CreateFolder, &normalized, err))?;
        Ok(VaultItem::folder(normalized))
    }

    fn move_item(&self, item: &VaultItem, new_path: &str) -> VaultRepoResult<()> {
        let normalized = normalize_path(new_path);
        let source = self.resolve(&item.path)?;
        let destination = self.resolve(&normalized)?;
        if item.path.is_empty() || normalized.is_empty() {
            return Err(VaultRepoError::InvalidPath(item.path.clone()));
        }
        if fs::symlink_metadata(&destination).is_ok() {
            return Err(VaultRepoError::AlreadyExists(normalized));
        }
        let parent = parent_path(&normalized);
        if kind_of(&self.resolve(parent)?) != Some(ItemKind::Folder) {
            return Err(VaultRepoError::NotFound(parent.to_string()));
        }
        fs::rename(&source, &destination).map_err(|err| io_error(VaultOp::Move, &item.path, err))
    }

    fn trash(&self, item: &VaultItem) -> VaultRepoResult<()> {
        if item.path.is_empty() {
            return Err(VaultRepoError::InvalidPath(item.path.clone()));
        }
        let source = self.resolve(&item.path)?;
        let trash_dir = self.root.join(TRASH_DIR_NAME);
        fs::create_dir_all(&trash_dir)
            .map_err(|err| io_error(VaultOp::Trash, TRASH_DIR_NAME, err))?;
        let destination = self.trash_destination(file_name(&item.path));
        fs::rename(&source, &destination).map_err(|err| io_error(VaultOp::Trash, &item.path, err))
    }

    fn delete(&self, item: &VaultItem) -> VaultRepoResult<()> {
        if item.path.is_empty() {
            return Err(VaultRepoError::InvalidPath(item.path.clone()));
        }
        let resolved = self.resolve(&item.path)?;
        match kind_of(&resolved) {
            None => Err(VaultRepoError::NotFound(item.path.clone())),
            Some(ItemKind::File) => fs::remove_file(&resolved)
                .map_err(|err| io_error(VaultOp::Delete, &item.path, err)),
            Some(ItemKind::Folder) => {
                let has_entries = fs::read_dir(&resolved)
                    .map_err(|err| io_error(VaultOp::Delete, &item.path, err))?
                    .next()
                    .is_some();
                if has_entries {
                    return Err(VaultRepoError::FolderNotEmpty(item.path.clone()));
                }
                fs::remove_dir(&resolved).map_err(|err| io_error(VaultOp::Delete, &item.path, err))
            }
        }
    }

    fn read_contents(&self, item: &VaultItem) -> VaultRepoResult<Vec<u8>> {
        let resolved = self.resolve(&item.path)?;
        if kind_of(&resolved) == Some(ItemKind::Folder) {
            return Err(VaultRepoError::NotAFile(item.path.clone()));
        }
        fs::read(&resolved).map_err(|err| io_error(VaultOp::Read, &item.path, err))
    }
}

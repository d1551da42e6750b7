//! In-memory vault repository.
//!
//! # Responsibility
//! - Provide a process-local vault tree with the same contract as disk vaults.
//! - Allow callers to inject per-operation failures to exercise partial paths.
//!
//! # Invariants
//! - The root folder (`""`) always exists and is never stored explicitly.
//! - Every stored path has all of its ancestors stored as folders.

use crate::model::item::{normalize_path, parent_path, ItemKind, VaultItem};
use crate::repo::vault_repo::{VaultOp, VaultRepoError, VaultRepoResult, VaultRepository};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Folder,
    File(Vec<u8>),
}

/// One item removed through `trash`, kept for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashedEntry {
    /// Vault path the item had when trashed.
    pub path: String,
    pub kind: ItemKind,
    /// File contents; `None` for folders.
    pub contents: Option<Vec<u8>>,
}

/// In-memory `VaultRepository` implementation.
#[derive(Debug, Default)]
pub struct MemoryVaultRepository {
    nodes: RefCell<BTreeMap<String, Node>>,
    trashed: RefCell<Vec<TrashedEntry>>,
    failures: RefCell<BTreeSet<(VaultOp, String)>>,
}

impl MemoryVaultRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or overwrites one file, creating missing parent folders.
    pub fn add_file(&self, path: &str, contents: impl Into<Vec<u8>>) -> VaultItem {
        let path = normalize_path(path);
        self.insert_ancestors(parent_path(&path));
        self.nodes
            .borrow_mut()
            .insert(path.clone(), Node::File(contents.into()));
        VaultItem::file(path)
    }

    /// Adds one folder and its missing ancestors.
    pub fn add_folder(&self, path: &str) -> VaultItem {
        let path = normalize_path(path);
        self.insert_ancestors(&path);
        VaultItem::folder(path)
    }

    /// Makes the next and every later `op` on `path` fail.
    pub fn inject_failure(&self, op: VaultOp, path: &str) {
        self.failures
            .borrow_mut()
            .insert((op, normalize_path(path)));
    }

    pub fn clear_failures(&self) {
        self.failures.borrow_mut().clear();
    }

    /// Returns file contents at `path`, or `None` for folders and absent paths.
    pub fn file_contents(&self, path: &str) -> Option<Vec<u8>> {
        match self.nodes.borrow().get(&normalize_path(path)) {
            Some(Node::File(contents)) => Some(contents.clone()),
            _ => None,
        }
    }

    /// Returns every stored path in sorted order.
    pub fn paths(&self) -> Vec<String> {
        self.nodes.borrow().keys().cloned().collect()
    }

    /// Returns items removed through `trash`, oldest first.
    pub fn trashed(&self) -> Vec<TrashedEntry> {
        self.trashed.borrow().clone()
    }

    fn insert_ancestors(&self, path: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let mut current = String::new();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            nodes.entry(current.clone()).or_insert(Node::Folder);
        }
    }

    fn check_failure(&self, op: VaultOp, path: &str) -> VaultRepoResult<()> {
        if self.failures.borrow().contains(&(op, path.to_string())) {
            return Err(VaultRepoError::Io {
                op,
                path: path.to_string(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn kind_of(&self, path: &str) -> Option<ItemKind> {
        if path.is_empty() {
            return Some(ItemKind::Folder);
        }
        self.nodes.borrow().get(path).map(|node| match node {
            Node::Folder => ItemKind::Folder,
            Node::File(_) => ItemKind::File,
        })
    }

    fn subtree_keys(&self, path: &str) -> Vec<String> {
        let prefix = format!("{path}/");
        self.nodes
            .borrow()
            .keys()
            .filter(|key| key.as_str() == path || key.starts_with(&prefix))
            .cloned()
            .collect()
    }

    fn has_children(&self, path: &str) -> bool {
        self.nodes
            .borrow()
            .keys()
            .any(|key| key.as_str() != path && parent_path(key) == path)
    }
}

impl VaultRepository for MemoryVaultRepository {
    fn get_item(&self, path: &str) -> Option<VaultItem> {
        let path = normalize_path(path);
        self.kind_of(&path).map(|kind| VaultItem::new(path, kind))
    }

    fn list_children(&self, folder: &VaultItem) -> VaultRepoResult<Vec<VaultItem>> {
        self.check_failure(VaultOp::List, &folder.path)?;
        match self.kind_of(&folder.path) {
            None => return Err(VaultRepoError::NotFound(folder.path.clone())),
            Some(ItemKind::File) => return Err(VaultRepoError::NotAFolder(folder.path.clone())),
            Some(ItemKind::Folder) => {}
        }

        let nodes = self.nodes.borrow();
        Ok(nodes
            .iter()
            .filter(|(key, _)| !key.is_empty() && parent_path(key) == folder.path)
            .map(|(key, node)| match node {
                Node::Folder => VaultItem::folder(key),
                Node::File(_) => VaultItem::file(key),
            })
            .collect())
    }

    fn create_folder(&self, path: &str) -> VaultRepoResult<VaultItem> {
        let path = normalize_path(path);
        self.check_failure(VaultOp::CreateFolder, &path)?;
        if path.is_empty() || self.kind_of(&path).is_some() {
            return Err(VaultRepoError::AlreadyExists(path));
        }

        let mut ancestor = parent_path(&path);
        while !ancestor.is_empty() {
            if self.kind_of(ancestor) == Some(ItemKind::File) {
                return Err(VaultRepoError::NotAFolder(ancestor.to_string()));
            }
            ancestor = parent_path(ancestor);
        }

        self.insert_ancestors(&path);
        Ok(VaultItem::folder(path))
    }

    fn move_item(&self, item: &VaultItem, new_path: &str) -> VaultRepoResult<()> {
        let new_path = normalize_path(new_path);
        self.check_failure(VaultOp::Move, &item.path)?;
        if item.path.is_empty() || new_path.is_empty() {
            return Err(VaultRepoError::InvalidPath(item.path.clone()));
        }
        if self.kind_of(&item.path).is_none() {
            return Err(VaultRepoError::NotFound(item.path.clone()));
        }
        if self.kind_of(&new_path).is_some() {
            return Err(VaultRepoError::AlreadyExists(new_path));
        }
        let new_parent = parent_path(&new_path);
        match self.kind_of(new_parent) {
            None => return Err(VaultRepoError::NotFound(new_parent.to_string())),
            Some(ItemKind::File) => return Err(VaultRepoError::NotAFolder(new_parent.to_string())),
            Some(ItemKind::Folder) => {}
        }
        if new_path.starts_with(&format!("{}/", item.path)) {
            return Err(VaultRepoError::InvalidPath(new_path));
        }

        let keys = self.subtree_keys(&item.path);
        let mut nodes = self.nodes.borrow_mut();
        for key in keys {
            if let Some(node) = nodes.remove(&key) {
                let moved = format!("{new_path}{}", &key[item.path.len()..]);
                nodes.insert(moved, node);
            }
        }
        Ok(())
    }

    fn trash(&self, item: &VaultItem) -> VaultRepoResult<()> {
        self.check_failure(VaultOp::Trash, &item.path)?;
        let kind = self
            .kind_of(&item.path)
            .filter(|_| !item.path.is_empty())
            .ok_or_else(|| VaultRepoError::NotFound(item.path.clone()))?;

        let keys = self.subtree_keys(&item.path);
        let mut nodes = self.nodes.borrow_mut();
        let mut contents = None;
        for key in keys {
            if let Some(Node::File(bytes)) = nodes.remove(&key) {
                if key == item.path {
                    contents = Some(bytes);
                }
            }
        }
        self.trashed.borrow_mut().push(TrashedEntry {
            path: item.path.clone(),
            kind,
            contents,
        });
        Ok(())
    }

    fn delete(&self, item: &VaultItem) -> VaultRepoResult<()> {
        self.check_failure(VaultOp::Delete, &item.path)?;
        match self.kind_of(&item.path) {
            None => Err(VaultRepoError::NotFound(item.path.clone())),
            Some(_) if item.path.is_empty() => Err(VaultRepoError::InvalidPath(item.path.clone())),
            Some(ItemKind::Folder) if self.has_children(&item.path) => {
                Err(VaultRepoError::FolderNotEmpty(item.path.clone()))
            }
            Some(_) => {
                self.nodes.borrow_mut().remove(&item.path);
                Ok(())
            }
        }
    }

    fn read_contents(&self, item: &VaultItem) -> VaultRepoResult<Vec<u8>> {
        self.check_failure(VaultOp::Read, &item.path)?;
        match self.nodes.borrow().get(&item.path) {
            Some(Node::File(contents)) => Ok(contents.clone()),
            Some(Node::Folder) => Err(VaultRepoError::NotAFile(item.path.clone())),
            None => Err(VaultRepoError::NotFound(item.path.clone())),
        }
    }
}

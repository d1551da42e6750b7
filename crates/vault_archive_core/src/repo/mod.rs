//! Vault filesystem gateway contracts and implementations.
//!
//! # Responsibility
//! - Define the primitive operations the archive core needs from a vault.
//! - Keep physical storage details (disk, in-memory) behind one trait.
//!
//! # Invariants
//! - Every primitive is all-or-nothing; a failed move leaves the item where
//!   it was.
//! - Repositories never overwrite an existing item on move or create.

pub mod disk_repo;
pub mod memory_repo;
pub mod vault_repo;

//! Vault item and archive outcome models.
//!
//! # Responsibility
//! - Define the read-only view of vault entries the archive core works on.
//! - Define result records handed back to UI/host callers.
//!
//! # Invariants
//! - Items are created and destroyed only by a `VaultRepository`; the core
//!   reads attributes and issues move/delete commands.
//! - Archived-ness is derived from the item path, never stored.

pub mod item;
pub mod outcome;

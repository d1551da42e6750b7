//! Archive use-case services.
//!
//! # Responsibility
//! - Translate live paths to archive paths and back.
//! - Orchestrate archive/unarchive moves over a `VaultRepository`.
//! - Reconcile folder trees when a move lands on an existing folder.
//!
//! # Invariants
//! - Top-level operations always return a result value; gateway errors never
//!   escape as `Err`.
//! - Batch operations run strictly in input order, one item at a time.

pub mod archive_paths;
pub mod archive_service;
pub mod conflict;
pub mod merge_service;

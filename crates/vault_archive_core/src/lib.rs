//! Core archive logic for vault notes.
//! Moves items between the live vault namespace and the archive subtree,
//! merging folder trees when both sides already exist.

pub mod extension;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod settings;

pub use extension::commands::{
    archive_extension_manifest, available_commands, command_available, eligible_items,
    ArchiveCommand, ARCHIVE_EXTENSION_ID,
};
pub use extension::manifest::{
    CommandDeclaration, CommandSurface, ExtensionManifest, ManifestValidationError,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{ItemKind, VaultItem};
pub use model::outcome::{ArchiveFailure, ArchiveResult, BatchOutcome, MergeStats};
pub use repo::disk_repo::DiskVaultRepository;
pub use repo::memory_repo::{MemoryVaultRepository, TrashedEntry};
pub use repo::vault_repo::{VaultOp, VaultRepoError, VaultRepoResult, VaultRepository};
pub use service::archive_paths::{
    from_archive_path, is_archived, to_archive_parent_path, to_archive_path, unique_renamed_path,
    unique_renamed_path_at,
};
pub use service::archive_service::ArchiveService;
pub use service::conflict::{ConflictChoice, ConflictPrompt, ConflictResolver, FixedChoice};
pub use service::merge_service::MergeService;
pub use settings::{validate_archive_folder, ArchiveSettings, SettingsError, DEFAULT_ARCHIVE_FOLDER};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Archive command declarations and eligibility gating.
//!
//! # Invariants
//! - "Move to archive" is offered only for items outside the archive folder
//!   that do not contain it.
//! - "Move out of archive" is offered only for items strictly below the
//!   archive folder.

use crate::extension::manifest::{
    CommandDeclaration, CommandSurface, ExtensionManifest, CAPABILITY_COMMAND,
    CAPABILITY_CONTEXT_MENU, CAPABILITY_SETTINGS_TAB,
};
use crate::model::item::VaultItem;
use crate::service::archive_paths::{contains_archive_folder, from_archive_path, is_archived};

/// Stable extension id of the archive extension.
pub const ARCHIVE_EXTENSION_ID: &str = "builtin.vault.archive";

/// One of the two archive actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveCommand {
    MoveToArchive,
    MoveOutOfArchive,
}

impl ArchiveCommand {
    pub const ALL: [ArchiveCommand; 2] = [Self::MoveToArchive, Self::MoveOutOfArchive];

    /// Stable command id for one surface.
    pub fn id(self, surface: CommandSurface) -> &'static str {
        match (self, surface) {
            (Self::MoveToArchive, CommandSurface::FilesMenu) => "move-selection-to-archive",
            (Self::MoveOutOfArchive, CommandSurface::FilesMenu) => "move-selection-out-of-archive",
            (Self::MoveToArchive, CommandSurface::FileMenu) => "move-file-to-archive",
            (Self::MoveOutOfArchive, CommandSurface::FileMenu) => "move-file-out-of-archive",
            (Self::MoveToArchive, CommandSurface::Palette) => "move-to-archive",
            (Self::MoveOutOfArchive, CommandSurface::Palette) => "move-out-of-archive",
        }
    }

    /// User-facing label for one surface.
    pub fn label(self, surface: CommandSurface) -> &'static str {
        match (self, surface) {
            (Self::MoveToArchive, CommandSurface::FilesMenu) => "Move selection to archive",
            (Self::MoveOutOfArchive, CommandSurface::FilesMenu) => {
                "Move selection out of archive"
            }
            (Self::MoveToArchive, _) => "Move to archive",
            (Self::MoveOutOfArchive, _) => "Move out of archive",
        }
    }
}

/// Builds the archive extension manifest with every command surface.
pub fn archive_extension_manifest() -> ExtensionManifest {
    let mut commands = Vec::new();
    for command in ArchiveCommand::ALL {
        for surface in [
            CommandSurface::Palette,
            CommandSurface::FileMenu,
            CommandSurface::FilesMenu,
        ] {
            commands.push(CommandDeclaration {
                id: command.id(surface).to_string(),
                label: command.label(surface).to_string(),
                surface,
            });
        }
    }

    ExtensionManifest {
        id: ARCHIVE_EXTENSION_ID.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        capabilities: vec![
            CAPABILITY_COMMAND.to_string(),
            CAPABILITY_CONTEXT_MENU.to_string(),
            CAPABILITY_SETTINGS_TAB.to_string(),
        ],
        commands,
    }
}

/// Returns `true` when `command` applies to `item`.
///
/// Palette and single-item context menu entries share this gate.
pub fn command_available(command: ArchiveCommand, item: &VaultItem, archive_folder: &str) -> bool {
    match command {
        ArchiveCommand::MoveToArchive => {
            !is_archived(&item.path, archive_folder)
                && !contains_archive_folder(&item.path, archive_folder)
        }
        ArchiveCommand::MoveOutOfArchive => from_archive_path(&item.path, archive_folder).is_some(),
    }
}

/// Commands applicable to one item, in declaration order.
pub fn available_commands(item: &VaultItem, archive_folder: &str) -> Vec<ArchiveCommand> {
    ArchiveCommand::ALL
        .into_iter()
        .filter(|command| command_available(*command, item, archive_folder))
        .collect()
}

/// Filters a multi-item selection down to the items `command` applies to.
///
/// The multi-item menu entry is shown when this returns a non-empty list.
pub fn eligible_items(
    command: ArchiveCommand,
    items: &[VaultItem],
    archive_folder: &str,
) -> Vec<VaultItem> {
    items
        .iter()
        .filter(|item| command_available(command, item, archive_folder))
        .cloned()
        .collect()
}

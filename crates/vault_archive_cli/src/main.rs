//! Command-line host for the vault archive core.
//!
//! # Responsibility
//! - Drive archive/unarchive operations against an on-disk vault.
//! - Stand in for the UI shell: print notices and ask conflict questions on
//!   stdin.

mod prompt;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::warn;
use std::path::{Path, PathBuf};
use vault_archive_core::{
    available_commands, default_log_level, init_logging, ArchiveFailure, ArchiveResult,
    ArchiveService, ArchiveSettings, BatchOutcome, CommandSurface, ConflictChoice, ConflictPrompt,
    ConflictResolver, DiskVaultRepository, VaultRepository,
};

const SETTINGS_RELATIVE_PATH: &str = ".vault-archive/settings.json";

#[derive(Debug, Parser)]
#[command(
    name = "vault-archive",
    version,
    about = "Move vault notes in and out of an archive folder"
)]
struct Cli {
    /// Vault root directory.
    #[arg(long, global = true, default_value = ".")]
    vault: PathBuf,
    /// Settings file; defaults to `<vault>/.vault-archive/settings.json`.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<String>,
    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Move items into the archive folder.
    Archive(MoveArgs),
    /// Move archived items back to their original location.
    Unarchive(MoveArgs),
    /// Show or edit the archive folder setting.
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// List archive commands available for one item.
    Commands { path: String },
}

#[derive(Debug, Args)]
struct MoveArgs {
    /// How to resolve collisions.
    #[arg(long, value_enum, default_value_t = ConflictPolicy::Ask)]
    on_conflict: ConflictPolicy,
    /// Vault-relative paths, processed in order.
    #[arg(required = true)]
    paths: Vec<String>,
}

#[derive(Debug, Subcommand)]
enum SettingsCommand {
    Show,
    SetFolder { value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ConflictPolicy {
    Ask,
    Replace,
    Rename,
    Cancel,
}

/// Either asks on stdin or answers with a fixed choice.
struct CliResolver {
    policy: ConflictPolicy,
}

impl ConflictResolver for CliResolver {
    fn resolve(&self, prompt: &ConflictPrompt) -> ConflictChoice {
        match self.policy {
            ConflictPolicy::Ask => prompt::ask(prompt),
            ConflictPolicy::Replace => ConflictChoice::Replace,
            ConflictPolicy::Rename => ConflictChoice::Rename,
            ConflictPolicy::Cancel => ConflictChoice::Cancel,
        }
    }
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("logging init failed")?;
    }

    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(|| cli.vault.join(SETTINGS_RELATIVE_PATH));
    let mut settings = ArchiveSettings::load(&settings_path)
        .with_context(|| format!("cannot load settings from {}", settings_path.display()))?;

    match cli.command {
        Command::Archive(args) => run_moves(&cli.vault, &settings, args, true),
        Command::Unarchive(args) => run_moves(&cli.vault, &settings, args, false),
        Command::Settings(SettingsCommand::Show) => {
            println!("archiveFolder={}", settings.archive_folder);
            Ok(())
        }
        Command::Settings(SettingsCommand::SetFolder { value }) => {
            if let Err(err) = settings.set_archive_folder(&value) {
                println!("archiveFolder={}", settings.archive_folder);
                return Err(err.into());
            }
            settings
                .save(&settings_path)
                .with_context(|| format!("cannot save settings to {}", settings_path.display()))?;
            println!("archiveFolder={}", settings.archive_folder);
            Ok(())
        }
        Command::Commands { path } => {
            let repo = DiskVaultRepository::open(&cli.vault)?;
            let item = repo
                .get_item(&path)
                .with_context(|| format!("{path} does not exist in the vault"))?;
            for command in available_commands(&item, &settings.archive_folder) {
                println!(
                    "{}\t{}",
                    command.id(CommandSurface::Palette),
                    command.label(CommandSurface::Palette)
                );
            }
            Ok(())
        }
    }
}

fn run_moves(
    vault: &Path,
    settings: &ArchiveSettings,
    args: MoveArgs,
    archive: bool,
) -> Result<()> {
    let repo = DiskVaultRepository::open(vault)?;
    let resolver = CliResolver {
        policy: args.on_conflict,
    };
    let service = ArchiveService::new(&repo, resolver, &settings.archive_folder);
    let results = args
        .paths
        .into_iter()
        .map(|path| {
            let result = match repo.get_item(&path) {
                Some(item) if archive => service.archive_item(&item),
                Some(item) => service.unarchive_item(&item),
                None => {
                    warn!("event=cli_move module=cli status=skip reason=not_found");
                    ArchiveResult::failure(
                        ArchiveFailure::IoFailure("item not found".to_string()),
                        "not found in vault",
                    )
                }
            };
            (path, result)
        })
        .collect();
    let verb = if archive { "archived" } else { "unarchived" };
    let outcome = BatchOutcome::from_results(results, verb);

    for (path, result) in &outcome.results {
        let marker = if result.success { "ok" } else { "failed" };
        println!("[{marker}] {path}: {}", result.message);
    }
    println!("{}", outcome.message);

    if outcome.succeeded != outcome.total {
        bail!("{} item(s) were not moved", outcome.total - outcome.succeeded);
    }
    Ok(())
}

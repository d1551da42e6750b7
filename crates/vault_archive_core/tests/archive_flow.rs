use std::cell::RefCell;
use vault_archive_core::{
    eligible_items, ArchiveCommand, ArchiveFailure, ArchiveService, ConflictChoice,
    ConflictPrompt, FixedChoice, MemoryVaultRepository, VaultItem, VaultOp, VaultRepository,
};

fn item(repo: &MemoryVaultRepository, path: &str) -> VaultItem {
    repo.get_item(path).expect("item should exist")
}

#[test]
fn archive_file_without_collision_mirrors_parent_path() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Notes/todo.md", "buy milk");
    let service = ArchiveService::new(&repo, FixedChoice(ConflictChoice::Cancel), "Archive");

    let result = service.archive_item(&item(&repo, "Notes/todo.md"));

    assert!(result.success);
    assert_eq!(result.message, "todo.md archived successfully");
    assert!(!repo.exists("Notes/todo.md"));
    assert_eq!(
        repo.file_contents("Archive/Notes/todo.md"),
        Some(b"buy milk".to_vec())
    );
}

#[test]
fn unarchive_file_without_collision_restores_original_path() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Archive/Notes/todo.md", "buy milk");
    let service = ArchiveService::new(&repo, FixedChoice(ConflictChoice::Cancel), "Archive");

    let result = service.unarchive_item(&item(&repo, "Archive/Notes/todo.md"));

    assert!(result.success);
    assert_eq!(result.message, "todo.md unarchived successfully");
    assert_eq!(repo.file_contents("Notes/todo.md"), Some(b"buy milk".to_vec()));
    assert!(!repo.exists("Archive/Notes/todo.md"));
}

#[test]
fn archive_rejects_already_archived_item() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Archive/old.md", "x");
    let service = ArchiveService::new(&repo, FixedChoice(ConflictChoice::Replace), "Archive");

    let result = service.archive_item(&item(&repo, "Archive/old.md"));

    assert!(!result.success);
    assert_eq!(result.failure, Some(ArchiveFailure::AlreadyArchived));
    assert_eq!(result.message, "old.md is already archived");
    assert!(repo.exists("Archive/old.md"));
}

#[test]
fn unarchive_rejects_live_item() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Notes/todo.md", "x");
    let service = ArchiveService::new(&repo, FixedChoice(ConflictChoice::Replace), "Archive");

    let result = service.unarchive_item(&item(&repo, "Notes/todo.md"));

    assert_eq!(result.failure, Some(ArchiveFailure::NotArchived));
    assert_eq!(result.message, "todo.md is not archived");
}

#[test]
fn archive_folder_onto_existing_folder_merges_without_prompt() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Projects/same.md", "same");
    repo.add_file("Projects/changed.md", "new");
    repo.add_file("Projects/unique.md", "unique");
    repo.add_file("Archive/Projects/same.md", "same");
    repo.add_file("Archive/Projects/changed.md", "old");

    let prompts = RefCell::new(Vec::new());
    let resolver = |prompt: &ConflictPrompt| {
        prompts.borrow_mut().push(prompt.clone());
        ConflictChoice::Cancel
    };
    let service = ArchiveService::new(&repo, resolver, "Archive");

    let result = service.archive_item(&item(&repo, "Projects"));

    assert!(result.success, "{}", result.message);
    assert_eq!(
        result.message,
        "Projects merged: 2 files processed (1 replaced, 1 skipped)"
    );
    assert!(prompts.borrow().is_empty());
    assert!(!repo.exists("Projects"));
    assert_eq!(
        repo.file_contents("Archive/Projects/changed.md"),
        Some(b"new".to_vec())
    );
    assert_eq!(
        repo.file_contents("Archive/Projects/unique.md"),
        Some(b"unique".to_vec())
    );
}

#[test]
fn partial_merge_failure_keeps_source_and_reports_names() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Projects/locked.md", "new");
    repo.add_file("Projects/ok.md", "ok");
    repo.add_file("Archive/Projects/locked.md", "old");
    repo.inject_failure(VaultOp::Trash, "Archive/Projects/locked.md");
    let service = ArchiveService::new(&repo, FixedChoice(ConflictChoice::Cancel), "Archive");

    let result = service.archive_item(&item(&repo, "Projects"));

    assert!(!result.success);
    assert_eq!(
        result.failure,
        Some(ArchiveFailure::PartialMergeFailure {
            failed_items: vec!["locked.md".to_string()]
        })
    );
    assert!(result.message.contains("Failed: locked.md"));
    assert!(result.message.contains("Source folder Projects was kept"));
    assert!(repo.exists("Projects/locked.md"));
    assert!(repo.exists("Archive/Projects/ok.md"));
}

#[test]
fn archive_file_collision_prompts_with_three_choices() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Notes/todo.md", "new");
    repo.add_file("Archive/Notes/todo.md", "old");

    let prompts = RefCell::new(Vec::new());
    let resolver = |prompt: &ConflictPrompt| {
        prompts.borrow_mut().push(prompt.clone());
        ConflictChoice::Cancel
    };
    let service = ArchiveService::new(&repo, resolver, "Archive");

    let result = service.archive_item(&item(&repo, "Notes/todo.md"));

    assert_eq!(result.failure, Some(ArchiveFailure::OperationCancelled));
    assert_eq!(result.message, "Operation cancelled");
    let prompts = prompts.borrow();
    assert_eq!(prompts.len(), 1);
    assert_eq!(
        prompts[0].choices,
        vec![
            ConflictChoice::Replace,
            ConflictChoice::Rename,
            ConflictChoice::Cancel
        ]
    );
    assert_eq!(repo.file_contents("Notes/todo.md"), Some(b"new".to_vec()));
    assert_eq!(
        repo.file_contents("Archive/Notes/todo.md"),
        Some(b"old".to_vec())
    );
}

#[test]
fn archive_file_collision_replace_trashes_existing() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Notes/todo.md", "new");
    repo.add_file("Archive/Notes/todo.md", "old");
    let service = ArchiveService::new(&repo, FixedChoice(ConflictChoice::Replace), "Archive");

    let result = service.archive_item(&item(&repo, "Notes/todo.md"));

    assert!(result.success);
    assert_eq!(
        repo.file_contents("Archive/Notes/todo.md"),
        Some(b"new".to_vec())
    );
    assert_eq!(repo.trashed()[0].contents, Some(b"old".to_vec()));
}

#[test]
fn archive_file_collision_rename_keeps_both() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Notes/todo.md", "new");
    repo.add_file("Archive/Notes/todo.md", "old");
    let service = ArchiveService::new(&repo, FixedChoice(ConflictChoice::Rename), "Archive");

    let result = service.archive_item(&item(&repo, "Notes/todo.md"));

    assert!(result.success);
    assert!(result.message.starts_with("todo.md archived as todo-"));
    let renamed: Vec<String> = repo
        .paths()
        .into_iter()
        .filter(|path| path.starts_with("Archive/Notes/todo-") && path.ends_with(".md"))
        .collect();
    assert_eq!(renamed.len(), 1);
    assert_eq!(repo.file_contents(&renamed[0]), Some(b"new".to_vec()));
    assert_eq!(
        repo.file_contents("Archive/Notes/todo.md"),
        Some(b"old".to_vec())
    );
}

#[test]
fn unarchive_collision_offers_replace_or_cancel_only() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Archive/Notes/todo.md", "archived");
    repo.add_file("Notes/todo.md", "live");

    let prompts = RefCell::new(Vec::new());
    let resolver = |prompt: &ConflictPrompt| {
        prompts.borrow_mut().push(prompt.clone());
        ConflictChoice::Rename
    };
    let service = ArchiveService::new(&repo, resolver, "Archive");

    let result = service.unarchive_item(&item(&repo, "Archive/Notes/todo.md"));

    assert_eq!(result.failure, Some(ArchiveFailure::OperationCancelled));
    assert_eq!(
        prompts.borrow()[0].choices,
        vec![ConflictChoice::Replace, ConflictChoice::Cancel]
    );
    assert_eq!(repo.file_contents("Notes/todo.md"), Some(b"live".to_vec()));
}

#[test]
fn unarchive_collision_replace_restores_archived_copy() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Archive/Notes/todo.md", "archived");
    repo.add_file("Notes/todo.md", "live");
    let service = ArchiveService::new(&repo, FixedChoice(ConflictChoice::Replace), "Archive");

    let result = service.unarchive_item(&item(&repo, "Archive/Notes/todo.md"));

    assert!(result.success);
    assert_eq!(
        repo.file_contents("Notes/todo.md"),
        Some(b"archived".to_vec())
    );
    assert_eq!(repo.trashed()[0].contents, Some(b"live".to_vec()));
}

#[test]
fn unarchive_recreates_missing_parent_folders() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Archive/Deep/Nested/note.md", "n");
    let service = ArchiveService::new(&repo, FixedChoice(ConflictChoice::Cancel), "Archive");

    let result = service.unarchive_item(&item(&repo, "Archive/Deep/Nested/note.md"));

    assert!(result.success);
    assert!(repo.get_item("Deep/Nested").is_some_and(|item| item.is_folder()));
    assert_eq!(repo.file_contents("Deep/Nested/note.md"), Some(b"n".to_vec()));
}

#[test]
fn move_failure_is_reported_with_underlying_description() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Notes/todo.md", "x");
    repo.inject_failure(VaultOp::Move, "Notes/todo.md");
    let service = ArchiveService::new(&repo, FixedChoice(ConflictChoice::Cancel), "Archive");

    let result = service.archive_item(&item(&repo, "Notes/todo.md"));

    assert!(!result.success);
    assert!(matches!(result.failure, Some(ArchiveFailure::IoFailure(_))));
    assert!(result.message.starts_with("Unable to archive todo.md:"));
    assert!(result.message.contains("injected failure"));
    assert!(repo.exists("Notes/todo.md"));
}

#[test]
fn folder_containing_archive_folder_is_refused() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Work/Archive/old.md", "x");
    repo.add_file("Work/current.md", "y");
    let service = ArchiveService::new(&repo, FixedChoice(ConflictChoice::Replace), "Work/Archive");

    let result = service.archive_item(&item(&repo, "Work"));

    assert!(!result.success);
    assert!(repo.exists("Work/current.md"));
}

#[test]
fn unarchive_onto_an_ancestor_of_the_item_leaves_vault_untouched() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Archive/keep.md", "keep");
    repo.add_file("Archive/Archive/x.md", "x");
    let before = repo.paths();
    let service = ArchiveService::new(&repo, FixedChoice(ConflictChoice::Replace), "Archive");

    let result = service.unarchive_item(&item(&repo, "Archive/Archive"));

    assert!(!result.success);
    assert!(matches!(result.failure, Some(ArchiveFailure::IoFailure(_))));
    assert!(repo.trashed().is_empty());
    assert_eq!(repo.paths(), before);
    assert_eq!(repo.file_contents("Archive/keep.md"), Some(b"keep".to_vec()));
}

#[test]
fn batch_archive_counts_eligible_successes_in_order() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("a.md", "a");
    repo.add_file("Archive/b.md", "b");
    repo.add_file("Notes/c.md", "c");
    let service = ArchiveService::new(&repo, FixedChoice(ConflictChoice::Cancel), "Archive");

    let selection = vec![
        item(&repo, "a.md"),
        item(&repo, "Archive/b.md"),
        item(&repo, "Notes/c.md"),
    ];
    let eligible = eligible_items(ArchiveCommand::MoveToArchive, &selection, "Archive");
    let outcome = service.archive_items(&eligible);

    assert_eq!(outcome.total, 2);
    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.message, "2 of 2 items archived");
    let order: Vec<_> = outcome.results.iter().map(|(path, _)| path.as_str()).collect();
    assert_eq!(order, vec!["a.md", "Notes/c.md"]);
    assert!(repo.exists("Archive/a.md"));
    assert!(repo.exists("Archive/Notes/c.md"));
}

#[test]
fn batch_continues_after_individual_failure() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Archive/a.md", "a");
    repo.add_file("Archive/b.md", "b");
    repo.add_file("b.md", "live");
    let service = ArchiveService::new(&repo, FixedChoice(ConflictChoice::Cancel), "Archive");

    let outcome = service.unarchive_items(&[
        item(&repo, "Archive/b.md"),
        item(&repo, "Archive/a.md"),
    ]);

    assert_eq!(outcome.succeeded, 1);
    assert_eq!(outcome.message, "1 of 2 items unarchived");
    assert_eq!(outcome.failed().count(), 1);
    assert!(repo.exists("a.md"));
    assert!(repo.exists("Archive/b.md"));
}

use vault_archive_core::{MemoryVaultRepository, MergeService, VaultItem, VaultOp, VaultRepository};

fn folder(repo: &MemoryVaultRepository, path: &str) -> VaultItem {
    repo.get_item(path).expect("folder should exist")
}

#[test]
fn identical_file_is_skipped_and_source_copy_deleted() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Projects/plan.md", "same");
    repo.add_file("Archive/Projects/plan.md", "same");

    let merger = MergeService::new(&repo);
    let source = folder(&repo, "Projects");
    let stats = merger.merge_folder(&source, "Archive/Projects");

    assert_eq!(stats.files_skipped, 1);
    assert_eq!(stats.files_processed(), 0);
    assert!(!repo.exists("Projects/plan.md"));
    assert_eq!(
        repo.file_contents("Archive/Projects/plan.md"),
        Some(b"same".to_vec())
    );
    assert!(repo.trashed().is_empty());
}

#[test]
fn differing_file_replaces_destination_and_trashes_old_copy() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Projects/plan.md", "new");
    repo.add_file("Archive/Projects/plan.md", "old");

    let merger = MergeService::new(&repo);
    let stats = merger.merge_folder(&folder(&repo, "Projects"), "Archive/Projects");

    assert_eq!(stats.files_replaced, 1);
    assert_eq!(
        repo.file_contents("Archive/Projects/plan.md"),
        Some(b"new".to_vec())
    );
    let trashed = repo.trashed();
    assert_eq!(trashed.len(), 1);
    assert_eq!(trashed[0].path, "Archive/Projects/plan.md");
    assert_eq!(trashed[0].contents, Some(b"old".to_vec()));
}

#[test]
fn nested_folders_are_created_recursed_and_cleaned_up() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Projects/Alpha/plan.md", "plan");
    repo.add_file("Projects/Beta/Deep/notes.md", "notes");
    repo.add_file("Archive/Projects/Beta/existing.md", "keep");

    let merger = MergeService::new(&repo);
    let source = folder(&repo, "Projects");
    let stats = merger.merge_folder(&source, "Archive/Projects");

    assert_eq!(stats.files_added, 2);
    assert_eq!(stats.folders_created, 2);
    assert!(stats.failed_items.is_empty());
    assert_eq!(
        repo.file_contents("Archive/Projects/Alpha/plan.md"),
        Some(b"plan".to_vec())
    );
    assert_eq!(
        repo.file_contents("Archive/Projects/Beta/Deep/notes.md"),
        Some(b"notes".to_vec())
    );
    assert_eq!(
        repo.file_contents("Archive/Projects/Beta/existing.md"),
        Some(b"keep".to_vec())
    );

    assert!(!repo.exists("Projects/Alpha"));
    assert!(!repo.exists("Projects/Beta"));
    assert!(merger.remove_if_empty(&source));
    assert!(!repo.exists("Projects"));
}

#[test]
fn failed_child_is_recorded_and_siblings_continue() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Projects/broken.md", "new");
    repo.add_file("Projects/fresh.md", "fresh");
    repo.add_file("Archive/Projects/broken.md", "old");
    repo.inject_failure(VaultOp::Read, "Projects/broken.md");

    let merger = MergeService::new(&repo);
    let source = folder(&repo, "Projects");
    let stats = merger.merge_folder(&source, "Archive/Projects");

    assert_eq!(stats.failed_items, vec!["broken.md".to_string()]);
    assert_eq!(stats.files_added, 1);
    assert_eq!(repo.file_contents("Projects/broken.md"), Some(b"new".to_vec()));
    assert_eq!(
        repo.file_contents("Archive/Projects/broken.md"),
        Some(b"old".to_vec())
    );
    assert!(!merger.remove_if_empty(&source));
    assert!(repo.exists("Projects"));
}

#[test]
fn failure_deep_in_tree_keeps_every_ancestor() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Projects/Sub/stuck.md", "x");
    repo.add_folder("Archive/Projects");
    repo.inject_failure(VaultOp::Move, "Projects/Sub/stuck.md");

    let merger = MergeService::new(&repo);
    let source = folder(&repo, "Projects");
    let stats = merger.merge_folder(&source, "Archive/Projects");

    assert_eq!(stats.failed_items, vec!["stuck.md".to_string()]);
    assert_eq!(stats.folders_created, 1);
    assert!(repo.exists("Projects/Sub/stuck.md"));
    assert!(!merger.remove_if_empty(&source));
}

#[test]
fn file_blocking_a_folder_slot_fails_that_folder() {
    let repo = MemoryVaultRepository::new();
    repo.add_file("Projects/Sub/a.md", "a");
    repo.add_file("Archive/Projects/Sub", "i am a file");

    let merger = MergeService::new(&repo);
    let stats = merger.merge_folder(&folder(&repo, "Projects"), "Archive/Projects");

    assert_eq!(stats.failed_items, vec!["Sub".to_string()]);
    assert!(repo.exists("Projects/Sub/a.md"));
}

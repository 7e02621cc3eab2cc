//! Integration tests for scaffold-common crate.

use scaffold_common::{filename_from_url, ChannelId, GuildId, TempWorkspace};
use std::fs;

fn create_test_workspace() -> (tempfile::TempDir, TempWorkspace) {
    let root = tempfile::tempdir().unwrap();
    let workspace = TempWorkspace::ensure(root.path()).unwrap();
    (root, workspace)
}

#[test]
fn test_guild_and_channel_display() {
    assert_eq!(format!("{}", GuildId(42)), "42");
    assert_eq!(format!("{}", ChannelId(100)), "100");
}

#[test]
fn test_download_target_lands_in_workspace() {
    let (_root, workspace) = create_test_workspace();
    let name = filename_from_url("https://cdn.example.com/files/photo.jpg?size=large").unwrap();
    let target = workspace.file_path(&name);

    assert_eq!(target.parent().unwrap(), workspace.path());
    assert_eq!(target.file_name().unwrap(), "photo.jpg");
}

#[tokio::test]
async fn test_repeated_clears_leave_workspace_in_place() {
    let (_root, workspace) = create_test_workspace();
    fs::write(workspace.file_path("a.txt"), b"a").unwrap();
    fs::create_dir(workspace.file_path("sub")).unwrap();
    fs::write(workspace.path().join("sub").join("b.txt"), b"b").unwrap();

    let first = workspace.clear().await;
    assert_eq!(first.removed, 2);

    for _ in 0..3 {
        let report = workspace.clear().await;
        assert_eq!(report.removed, 0);
        assert!(report.is_clean());
    }
    assert!(workspace.path().is_dir());
}

#[tokio::test]
async fn test_shared_guard_is_released_before_clear() {
    let (_root, workspace) = create_test_workspace();
    {
        let _guard = workspace.lock_shared().await;
        fs::write(workspace.file_path("download.bin"), b"payload").unwrap();
    }
    let report = workspace.clear().await;
    assert_eq!(report.removed, 1);
}

/*!
 * Local Host Tests
 * Full mount/edit/sync cycle against a real directory
 */

use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;

use sandbox_mount_bridge::{
    FileSystem, FilterOptions, LocalHost, MemFS, MountBridge, MountType, SyncResult,
};

#[tokio::test]
async fn test_local_directory_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::write(root.join("src/app.py"), "print('v1')\n").unwrap();
    std::fs::write(root.join("data.bin"), [0u8, 159, 146, 150]).unwrap();
    std::fs::write(root.join(".secret"), "token").unwrap();
    std::fs::write(root.join("notes.log"), "noise").unwrap();

    let root_str = root.to_str().unwrap();
    let mut bridge = MountBridge::new(LocalHost::new(), Arc::new(MemFS::new()));
    bridge
        .register(
            "project",
            root_str,
            MountType::Workspace,
            FilterOptions::default().with_exclude(r"\.log$").unwrap(),
        )
        .unwrap();

    let summary = bridge.mount("project").await.unwrap();
    assert!(summary.is_complete());
    assert_eq!(summary.loaded_files, 2);

    let stats = bridge.mount_cache_stats("project").unwrap();
    assert_eq!(stats.binary_files, 1);
    assert!(!bridge.sandbox().exists(Path::new("/project/.secret")));
    assert!(!bridge.sandbox().exists(Path::new("/project/notes.log")));

    // Edit both files inside the sandbox
    let fs = Arc::clone(bridge.sandbox());
    fs.write(Path::new("/project/src/app.py"), b"print('v2')\n")
        .unwrap();
    fs.write(Path::new("/project/data.bin"), &[0xff, 0x00, 0x7f])
        .unwrap();

    let results = bridge.sync_all_to_disk(Some("project")).await;
    assert_eq!(
        results,
        vec![
            SyncResult::synced("project/data.bin"),
            SyncResult::synced("project/src/app.py"),
        ]
    );

    assert_eq!(
        std::fs::read_to_string(root.join("src/app.py")).unwrap(),
        "print('v2')\n"
    );
    assert_eq!(std::fs::read(root.join("data.bin")).unwrap(), vec![0xff, 0x00, 0x7f]);

    bridge.unmount("project");
    assert!(!bridge.sandbox().exists(Path::new("/project")));
    // Host files are untouched by unmounting
    assert!(root.join("src/app.py").exists());
}

#[tokio::test]
async fn test_missing_local_directory_fails_mount() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    let mut bridge = MountBridge::new(LocalHost::new(), Arc::new(MemFS::new()));
    bridge
        .register(
            "gone",
            missing.to_str().unwrap(),
            MountType::Custom,
            FilterOptions::default(),
        )
        .unwrap();

    assert!(bridge.mount("gone").await.is_err());
    assert!(!bridge.mount_all().await);
}

/*!
 * Bridge Facade Tests
 * Registration, reads, writes, unmount and remount
 */

use pretty_assertions::assert_eq;
use std::path::Path;

use sandbox_mount_bridge::{
    BridgeError, FileSystem, FilterOptions, MountType, TransportContent, TransportEncoding,
};

use crate::common::{bridge_for, project_host, registered, HOST_ROOT};

#[tokio::test]
async fn test_reregistration_preserves_mounted_state() {
    let host = project_host();
    let mut bridge = registered(&host);
    bridge.mount("ws").await.unwrap();

    let options = FilterOptions::default().with_max_file_size(10);
    bridge
        .register("ws", "/host/elsewhere", MountType::Scripts, options.clone())
        .unwrap();

    let config = bridge.mount_point("ws").unwrap();
    assert!(config.mounted);
    assert_eq!(config.local_path, "/host/elsewhere");
    assert_eq!(config.mount_type, MountType::Scripts);
    assert_eq!(config.options, options);
    assert_eq!(bridge.mount_points().len(), 1);
}

#[test]
fn test_register_rejects_bad_names() {
    let host = project_host();
    let mut bridge = bridge_for(&host);

    for name in ["", "a/b", ".", "..", "a\\b"] {
        assert_eq!(
            bridge
                .register(name, HOST_ROOT, MountType::Custom, FilterOptions::default())
                .unwrap_err(),
            BridgeError::InvalidMountName(name.to_string())
        );
    }
    assert!(bridge.mount_points().is_empty());
}

#[tokio::test]
async fn test_parent_dir_name_cannot_alias_sandbox_root() {
    let host = project_host();
    host.insert_text("/host/evil", "ws/README.md", "clobbered");
    let mut bridge = registered(&host);

    assert!(bridge
        .register("..", "/host/evil", MountType::Custom, FilterOptions::default())
        .is_err());
    assert!(bridge.mount_all().await);

    assert_eq!(
        bridge.read_from_mount("ws", "README.md").unwrap(),
        TransportContent::text("# Demo\n")
    );
    assert_eq!(host.list_calls(), vec![HOST_ROOT.to_string()]);
}

#[tokio::test]
async fn test_unmount_clears_state() {
    let host = project_host();
    let mut bridge = registered(&host);
    bridge.mount("ws").await.unwrap();

    bridge.unmount("ws");

    let stats = bridge.mount_cache_stats("ws").unwrap();
    assert_eq!(stats.cached_files, 0);
    assert_eq!(stats.listed_entries, 0);
    assert!(!stats.mounted);
    assert!(bridge.cached_entries("ws").unwrap().is_empty());
    assert!(!bridge.sandbox().exists(Path::new("/ws")));

    // Registration survives
    assert!(bridge.mount_point("ws").is_some());
    assert_eq!(
        bridge.read_from_mount("ws", "README.md").unwrap_err(),
        BridgeError::MountNotMounted("ws".to_string())
    );
}

#[test]
fn test_unmount_unknown_is_a_no_op() {
    let host = project_host();
    let mut bridge = registered(&host);
    bridge.unmount("ghost");
    bridge.unmount_all();
    assert_eq!(bridge.mount_points().len(), 1);
}

#[tokio::test]
async fn test_remount_rereads_host() {
    let host = project_host();
    let mut bridge = registered(&host);
    bridge.mount("ws").await.unwrap();
    bridge.unmount("ws");

    host.insert_text(HOST_ROOT, "README.md", "# Updated on host\n");

    let summary = bridge.mount("ws").await.unwrap();
    assert!(!summary.already_mounted);
    assert_eq!(host.list_calls().len(), 2);
    assert_eq!(
        bridge.read_from_mount("ws", "README.md").unwrap(),
        TransportContent::text("# Updated on host\n")
    );
}

#[tokio::test]
async fn test_read_from_mount_uses_cached_representation() {
    let host = project_host();
    let mut bridge = registered(&host);
    bridge.mount("ws").await.unwrap();

    let logo = bridge.read_from_mount("ws", "assets/logo.png").unwrap();
    assert!(logo.is_binary());
    assert_eq!(logo, host.file(HOST_ROOT, "assets/logo.png").unwrap());

    let main = bridge.read_from_mount("ws", "src/main.py").unwrap();
    assert_eq!(main, TransportContent::text("print('hi')\n"));

    assert_eq!(
        bridge.read_from_mount("ws", "missing.txt").unwrap_err(),
        BridgeError::SandboxFileMissing("ws/missing.txt".to_string())
    );
}

#[tokio::test]
async fn test_write_to_mount_updates_cache_without_syncing() {
    let host = project_host();
    let mut bridge = registered(&host);
    bridge.mount("ws").await.unwrap();
    let listed = bridge.cached_entries("ws").unwrap().len();

    bridge
        .write_to_mount("ws", "out/data.bin", "AAEC", Some(TransportEncoding::Base64))
        .unwrap();

    assert_eq!(
        bridge.sandbox().read(Path::new("/ws/out/data.bin")).unwrap(),
        vec![0, 1, 2]
    );
    let entries = bridge.cached_entries("ws").unwrap();
    assert_eq!(entries.len(), listed + 1);
    assert_eq!(entries[listed].path, "out/data.bin");
    assert_eq!(entries[listed].size, Some(3));

    assert!(host.writes().is_empty());
    assert!(bridge.sync_all_to_disk(Some("ws")).await.is_empty());

    let stats = bridge.mount_cache_stats("ws").unwrap();
    assert_eq!(stats.binary_files, 2);
}

#[tokio::test]
async fn test_write_to_mount_rejections() {
    let host = project_host();
    let mut bridge = registered(&host);

    assert_eq!(
        bridge.write_to_mount("ws", "a.txt", "x", None).unwrap_err(),
        BridgeError::MountNotMounted("ws".to_string())
    );

    bridge.mount("ws").await.unwrap();
    assert!(matches!(
        bridge.write_to_mount("ws", "a.bin", "!!", Some(TransportEncoding::Base64)),
        Err(BridgeError::InvalidTransport { .. })
    ));
    assert!(matches!(
        bridge.write_to_mount("ws", "../escape.txt", "x", None),
        Err(BridgeError::InvalidPath(_))
    ));
    assert!(!bridge.sandbox().exists(Path::new("/escape.txt")));

    for path in ["README.md/", "docs//a.txt"] {
        assert!(matches!(
            bridge.write_to_mount("ws", path, "x", None),
            Err(BridgeError::InvalidPath(_))
        ));
    }
    assert_eq!(
        bridge.read_from_mount("ws", "README.md").unwrap(),
        TransportContent::text("# Demo\n")
    );
}

#[tokio::test]
async fn test_cache_stats_in_registration_order() {
    let host = project_host();
    host.insert_text("/host/scripts", "run.py", "print(1)");

    let mut bridge = registered(&host);
    bridge
        .register("scripts", "/host/scripts", MountType::Scripts, FilterOptions::default())
        .unwrap();
    bridge.mount("scripts").await.unwrap();

    let stats = bridge.cache_stats();
    let names: Vec<&str> = stats.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["ws", "scripts"]);
    assert!(!stats[0].mounted);
    assert!(stats[1].mounted);
    assert_eq!(stats[1].cached_bytes, 8);
    assert!(bridge.mount_cache_stats("ghost").is_none());
}

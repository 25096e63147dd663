/*!
 * Mount Loader Tests
 * Mounting, idempotency, filtering and per-file failures
 */

use pretty_assertions::assert_eq;
use std::path::Path;

use sandbox_mount_bridge::{
    BridgeError, FileSystem, FilterOptions, MemoryHost, MountType, TransportContent,
    WorkspaceEntry,
};

use crate::common::{bridge_for, project_host, registered, HOST_ROOT};

#[tokio::test]
async fn test_mount_loads_files_into_sandbox() {
    let host = project_host();
    let mut bridge = registered(&host);

    let summary = bridge.mount("ws").await.unwrap();
    assert!(summary.is_complete());
    assert!(!summary.already_mounted);
    assert_eq!(summary.loaded_files, 3);

    let fs = bridge.sandbox();
    assert_eq!(fs.read(Path::new("/ws/README.md")).unwrap(), b"# Demo\n");
    assert_eq!(
        fs.read(Path::new("/ws/src/main.py")).unwrap(),
        b"print('hi')\n"
    );
    assert_eq!(
        fs.read(Path::new("/ws/assets/logo.png")).unwrap(),
        vec![0x89, b'P', b'N', b'G', 0x00, 0xff]
    );
    // Hidden files are skipped by default
    assert!(!fs.exists(Path::new("/ws/.env")));

    let config = bridge.mount_point("ws").unwrap();
    assert!(config.mounted);
    assert_eq!(config.mount_path, "/ws");

    let stats = bridge.mount_cache_stats("ws").unwrap();
    assert_eq!(stats.cached_files, 3);
    assert_eq!(stats.binary_files, 1);
    assert_eq!(stats.text_files, 2);
}

#[tokio::test]
async fn test_mount_is_idempotent() {
    let host = project_host();
    let mut bridge = registered(&host);

    bridge.mount("ws").await.unwrap();
    let calls = host.call_count();

    let summary = bridge.mount("ws").await.unwrap();
    assert!(summary.already_mounted);
    assert_eq!(summary.loaded_files, 0);
    assert_eq!(host.call_count(), calls);
    assert_eq!(host.list_calls().len(), 1);
}

#[tokio::test]
async fn test_mount_unknown_name() {
    let host = project_host();
    let mut bridge = bridge_for(&host);

    assert_eq!(
        bridge.mount("nope").await.unwrap_err(),
        BridgeError::MountNotRegistered("nope".to_string())
    );
    assert_eq!(host.call_count(), 0);
}

#[tokio::test]
async fn test_listing_failure_leaves_mount_unmounted() {
    let host = project_host();
    host.fail_listing(HOST_ROOT);
    let mut bridge = registered(&host);

    let err = bridge.mount("ws").await.unwrap_err();
    assert!(matches!(err, BridgeError::HostListingFailure { ref path, .. } if path == HOST_ROOT));
    assert!(!bridge.mount_point("ws").unwrap().mounted);
    assert!(host.read_calls().is_empty());
}

#[tokio::test]
async fn test_per_file_failures_are_skipped() {
    let host = project_host();
    host.fail_read("src/main.py");
    host.insert_file(HOST_ROOT, "broken.bin", TransportContent::base64("%%%not-base64"));
    let mut bridge = registered(&host);

    let summary = bridge.mount("ws").await.unwrap();
    assert!(!summary.is_complete());
    assert_eq!(summary.loaded_files, 2);

    let skipped: Vec<&str> = summary.skipped.iter().map(|s| s.path.as_str()).collect();
    assert_eq!(skipped, vec!["src/main.py", "broken.bin"]);
    assert!(matches!(
        summary.skipped[0].reason,
        BridgeError::HostReadFailure { .. }
    ));
    assert!(matches!(
        summary.skipped[1].reason,
        BridgeError::InvalidTransport { .. }
    ));

    // Mount still completes and skipped files stay out of the cache
    assert!(bridge.mount_point("ws").unwrap().mounted);
    assert_eq!(bridge.mount_cache_stats("ws").unwrap().cached_files, 2);
    assert!(!bridge.sandbox().exists(Path::new("/ws/src/main.py")));
    assert!(bridge.sandbox().exists(Path::new("/ws/src")));
}

#[tokio::test]
async fn test_filter_options_shape_the_mount() {
    let host = MemoryHost::new();
    host.insert_text(HOST_ROOT, "a.txt", "hello");
    host.set_listing(
        HOST_ROOT,
        vec![
            WorkspaceEntry::file("a.txt", 5),
            WorkspaceEntry::file(".hidden", 5),
            WorkspaceEntry::file("big.bin", 1_000_000_000),
            WorkspaceEntry::directory("docs/"),
        ],
    );

    let mut bridge = bridge_for(&host);
    bridge
        .register(
            "ws",
            HOST_ROOT,
            MountType::Workspace,
            FilterOptions::default().with_max_file_size(1000),
        )
        .unwrap();

    let summary = bridge.mount("ws").await.unwrap();
    assert!(summary.is_complete());

    let kept: Vec<&str> = bridge
        .cached_entries("ws")
        .unwrap()
        .iter()
        .map(|e| e.path.as_str())
        .collect();
    assert_eq!(kept, vec!["a.txt", "docs/"]);
    assert!(bridge.sandbox().exists(Path::new("/ws/docs")));
    assert_eq!(
        host.read_calls(),
        vec![(HOST_ROOT.to_string(), "a.txt".to_string())]
    );
}

#[tokio::test]
async fn test_mount_all_continues_past_failures() {
    let host = project_host();
    host.insert_text("/host/config", "settings.json", "{}");
    host.fail_listing("/host/broken");

    let mut bridge = bridge_for(&host);
    bridge
        .register("broken", "/host/broken", MountType::Custom, FilterOptions::default())
        .unwrap();
    bridge
        .register("ws", HOST_ROOT, MountType::Workspace, FilterOptions::default())
        .unwrap();
    bridge
        .register("config", "/host/config", MountType::Config, FilterOptions::default())
        .unwrap();

    assert!(!bridge.mount_all().await);
    assert_eq!(
        host.list_calls(),
        vec![
            "/host/broken".to_string(),
            HOST_ROOT.to_string(),
            "/host/config".to_string()
        ]
    );
    assert!(!bridge.mount_point("broken").unwrap().mounted);
    assert!(bridge.mount_point("ws").unwrap().mounted);
    assert!(bridge.mount_point("config").unwrap().mounted);
}

#[tokio::test]
async fn test_mount_all_success() {
    let host = project_host();
    let mut bridge = registered(&host);
    assert!(bridge.mount_all().await);
}

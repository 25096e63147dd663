/*!
 * Sync Engine Tests
 * Change detection, encoding-aware write-back and failure reporting
 */

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::path::Path;

use sandbox_mount_bridge::bridge::encoding::encode_base64;
use sandbox_mount_bridge::host::WriteCall;
use sandbox_mount_bridge::{
    BridgeError, FileSystem, MemoryHost, SyncResult, TransportEncoding, WorkspaceEntry,
};

use crate::common::{project_host, registered, HOST_ROOT};

#[tokio::test]
async fn test_end_to_end_scenario() {
    let host = MemoryHost::new();
    host.insert_text(HOST_ROOT, "a.txt", "hello");
    host.set_listing(HOST_ROOT, vec![WorkspaceEntry::file("a.txt", 5)]);

    let mut bridge = registered(&host);
    assert!(bridge.mount("ws").await.unwrap().is_complete());
    assert_eq!(
        bridge.read_from_mount("ws", "a.txt").unwrap().content,
        "hello"
    );

    bridge
        .sandbox()
        .write(Path::new("/ws/a.txt"), b"hello!")
        .unwrap();

    let results = bridge.sync_all_to_disk(Some("ws")).await;
    assert_eq!(results, vec![SyncResult::synced("ws/a.txt")]);
    assert_eq!(
        host.writes(),
        vec![WriteCall {
            root: HOST_ROOT.to_string(),
            relative_path: "a.txt".to_string(),
            content: "hello!".to_string(),
            encoding: None,
        }]
    );

    // Baseline was reset, so a second pass writes nothing
    assert!(bridge.sync_all_to_disk(Some("ws")).await.is_empty());
    assert_eq!(host.writes().len(), 1);
}

#[tokio::test]
async fn test_selective_sync_writes_only_changed_files() {
    let host = project_host();
    let mut bridge = registered(&host);
    bridge.mount("ws").await.unwrap();

    bridge
        .sandbox()
        .write(Path::new("/ws/src/main.py"), b"print('changed')\n")
        .unwrap();

    let results = bridge.sync_all_to_disk(None).await;
    assert_eq!(results, vec![SyncResult::synced("ws/src/main.py")]);

    let writes = host.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].relative_path, "src/main.py");
    assert_eq!(
        host.file(HOST_ROOT, "src/main.py").unwrap().content,
        "print('changed')\n"
    );
}

#[tokio::test]
async fn test_text_round_trip_through_write_to_mount() {
    let host = project_host();
    let mut bridge = registered(&host);
    bridge.mount("ws").await.unwrap();

    let text = "naïve café\nline two\n";
    bridge.write_to_mount("ws", "notes/today.md", text, None).unwrap();

    let result = bridge.sync_file_to_disk("/ws/notes/today.md").await.unwrap();
    assert!(result.success);

    let last = host.writes().pop().unwrap();
    assert_eq!(last.content, text);
    assert_eq!(last.encoding, None);
}

#[tokio::test]
async fn test_binary_file_syncs_as_base64() {
    let host = project_host();
    let mut bridge = registered(&host);
    bridge.mount("ws").await.unwrap();

    let updated = [0u8, 1, 2, 0xfe, 0xff];
    bridge
        .sandbox()
        .write(Path::new("/ws/assets/logo.png"), &updated)
        .unwrap();

    let results = bridge.sync_all_to_disk(Some("ws")).await;
    assert_eq!(results, vec![SyncResult::synced("ws/assets/logo.png")]);

    let write = host.writes().pop().unwrap();
    assert_eq!(write.encoding, Some(TransportEncoding::Base64));
    assert_eq!(write.content, encode_base64(&updated));
    assert_eq!(host.file_bytes(HOST_ROOT, "assets/logo.png").unwrap(), updated);
}

#[tokio::test]
async fn test_host_write_failure_keeps_baseline() {
    let host = project_host();
    host.fail_write("README.md");
    let mut bridge = registered(&host);
    bridge.mount("ws").await.unwrap();

    bridge
        .sandbox()
        .write(Path::new("/ws/README.md"), b"# Edited\n")
        .unwrap();

    let results = bridge.sync_all_to_disk(Some("ws")).await;
    assert_eq!(results.len(), 1);
    assert!(!results[0].success);
    assert!(matches!(
        results[0].error,
        Some(BridgeError::HostWriteFailure { .. })
    ));

    // Still diverged, so the next pass retries it
    let retry = bridge.sync_all_to_disk(Some("ws")).await;
    assert_eq!(retry.len(), 1);
    assert_eq!(host.writes().len(), 2);
}

#[tokio::test]
async fn test_missing_sandbox_file_is_reported_and_skipped() {
    let host = project_host();
    let mut bridge = registered(&host);
    bridge.mount("ws").await.unwrap();

    bridge.sandbox().delete(Path::new("/ws/README.md")).unwrap();
    bridge
        .sandbox()
        .write(Path::new("/ws/src/main.py"), b"print('still here')\n")
        .unwrap();

    let results = bridge.sync_all_to_disk(Some("ws")).await;
    assert_eq!(
        results,
        vec![
            SyncResult::failed(
                "ws/README.md",
                BridgeError::SandboxFileMissing("ws/README.md".to_string())
            ),
            SyncResult::synced("ws/src/main.py"),
        ]
    );
}

#[tokio::test]
async fn test_text_file_turned_binary_is_an_encoding_mismatch() {
    let host = project_host();
    let mut bridge = registered(&host);
    bridge.mount("ws").await.unwrap();

    bridge
        .sandbox()
        .write(Path::new("/ws/README.md"), &[0xc3, 0x28])
        .unwrap();

    let result = bridge.sync_file_to_disk("/ws/README.md").await.unwrap();
    assert_eq!(
        result.error,
        Some(BridgeError::EncodingMismatch("ws/README.md".to_string()))
    );
    assert!(host.writes().is_empty());
}

#[tokio::test]
async fn test_sync_targets_that_are_not_mounted() {
    let host = project_host();
    let mut bridge = registered(&host);

    let results = bridge.sync_all_to_disk(Some("ws")).await;
    assert_eq!(
        results,
        vec![SyncResult::failed(
            "ws",
            BridgeError::MountNotMounted("ws".to_string())
        )]
    );

    let results = bridge.sync_all_to_disk(Some("ghost")).await;
    assert_eq!(
        results[0].error,
        Some(BridgeError::MountNotRegistered("ghost".to_string()))
    );

    assert!(bridge.sync_all_to_disk(None).await.is_empty());
    assert_eq!(host.call_count(), 0);
}

#[tokio::test]
async fn test_sync_file_rejects_bad_paths() {
    let host = project_host();
    let mut bridge = registered(&host);

    assert!(matches!(
        bridge.sync_file_to_disk("/ws").await,
        Err(BridgeError::InvalidPath(_))
    ));
    assert_eq!(
        bridge.sync_file_to_disk("/ws/README.md").await.unwrap_err(),
        BridgeError::MountNotMounted("ws".to_string())
    );
    assert_eq!(
        bridge.sync_file_to_disk("/other/a.txt").await.unwrap_err(),
        BridgeError::MountNotRegistered("other".to_string())
    );
}

#[tokio::test]
async fn test_sync_file_rejects_empty_segments() {
    let host = project_host();
    let mut bridge = registered(&host);
    bridge.mount("ws").await.unwrap();

    for path in ["/ws/README.md/", "/ws/src//main.py"] {
        assert_eq!(
            bridge.sync_file_to_disk(path).await.unwrap_err(),
            BridgeError::InvalidPath(path.to_string())
        );
    }
    assert!(host.writes().is_empty());
}

fn block_on<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_binary_round_trip_is_exact(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let transport = encode_base64(&bytes);
        let host = MemoryHost::new();
        host.insert_binary(HOST_ROOT, "blob.bin", &bytes);
        let mut bridge = registered(&host);

        let writes = block_on(async {
            bridge.mount("ws").await.unwrap();
            bridge.sync_file_to_disk("/ws/blob.bin").await.unwrap();
            host.writes()
        });

        prop_assert_eq!(bridge.sandbox().read(Path::new("/ws/blob.bin")).unwrap(), bytes);
        prop_assert_eq!(writes.len(), 1);
        prop_assert_eq!(&writes[0].content, &transport);
        prop_assert_eq!(writes[0].encoding, Some(TransportEncoding::Base64));
    }

    #[test]
    fn prop_text_round_trip_is_exact(text in "\\PC{0,200}") {
        let host = MemoryHost::new();
        host.add_root(HOST_ROOT);
        let mut bridge = registered(&host);

        let writes = block_on(async {
            bridge.mount("ws").await.unwrap();
            bridge.write_to_mount("ws", "s.txt", &text, None).unwrap();
            bridge.sync_file_to_disk("/ws/s.txt").await.unwrap();
            host.writes()
        });

        prop_assert_eq!(writes.len(), 1);
        prop_assert_eq!(&writes[0].content, &text);
        prop_assert_eq!(writes[0].encoding, None);
    }
}

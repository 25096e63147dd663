/*!
 * Sync Engine
 * Change detection against mount snapshots and encoding-aware write-back
 */

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use super::cache::CachedContent;
use super::encoding::encode_base64;
use super::paths::{from_sandbox_path, mount_path_for, result_key, to_sandbox_path};
use super::MountBridge;
use crate::core::{BridgeError, BridgeResult};
use crate::host::HostStorage;
use crate::monitoring::span_bridge_op;
use crate::vfs::{FileSystem, VfsError};

/// Outcome of syncing one file
///
/// `path` is "<mount>/<relative path>", or just the mount name when the
/// whole target was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub path: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<BridgeError>,
}

impl SyncResult {
    pub fn synced(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(path: impl Into<String>, error: BridgeError) -> Self {
        Self {
            path: path.into(),
            success: false,
            error: Some(error),
        }
    }
}

impl<H: HostStorage, F: FileSystem> MountBridge<H, F> {
    /// Push one sandbox file back to the host
    ///
    /// Returns `Err` when the path does not address a mounted point. File-level
    /// failures come back as an unsuccessful `SyncResult`; a failed host write
    /// leaves the snapshot untouched so the next batch sync retries it.
    #[instrument(level = "debug", skip(self))]
    pub async fn sync_file_to_disk(&mut self, sandbox_path: &str) -> BridgeResult<SyncResult> {
        let (name, relative_path) = from_sandbox_path(sandbox_path)?;
        let config = self.registry.require_mounted(&name)?.clone();
        let key = result_key(&name, &relative_path);

        let binary = self
            .cached(&name, &relative_path)
            .map(|entry| entry.content.is_binary())
            .unwrap_or(false);
        let path = to_sandbox_path(&config.mount_path, &relative_path);

        let snapshot = if binary {
            match self.read_sandbox(&config.mount_path, &relative_path, &key) {
                Ok(bytes) => CachedContent::Binary {
                    transport: encode_base64(&bytes),
                    bytes,
                },
                Err(e) => return Ok(SyncResult::failed(key, e)),
            }
        } else {
            match self.sandbox.read_to_string(Path::new(&path)) {
                Ok(text) => CachedContent::Text(text),
                Err(VfsError::InvalidUtf8(_)) => {
                    return Ok(SyncResult::failed(
                        key.clone(),
                        BridgeError::EncodingMismatch(key),
                    ))
                }
                Err(e) if e.is_not_found() => {
                    return Ok(SyncResult::failed(
                        key.clone(),
                        BridgeError::SandboxFileMissing(key),
                    ))
                }
                Err(e) => return Ok(SyncResult::failed(key, e.into())),
            }
        };

        let transport = snapshot.to_transport();
        let response = self
            .host
            .write_file(
                &config.local_path,
                &relative_path,
                &transport.content,
                snapshot.encoding(),
            )
            .await;

        if let Err(reason) = response.into_result() {
            warn!(path = %key, reason = %reason, "Host write failed");
            return Ok(SyncResult::failed(
                key.clone(),
                BridgeError::HostWriteFailure { path: key, reason },
            ));
        }

        self.cache_mut(&name).insert(&relative_path, snapshot);
        debug!(path = %key, binary, "Synced file to host");
        Ok(SyncResult::synced(key))
    }

    /// Push every changed file of one mount, or of all mounted points
    ///
    /// Only files whose sandbox bytes differ from their snapshot are written.
    /// Cached paths are visited in sorted order. An unknown or unmounted
    /// target yields a single failed result and no host I/O.
    pub async fn sync_all_to_disk(&mut self, mount_name: Option<&str>) -> Vec<SyncResult> {
        let targets: Vec<String> = match mount_name {
            Some(name) => match self.registry.require_mounted(name) {
                Ok(_) => vec![name.to_string()],
                Err(e) => {
                    debug!(mount = %name, error = %e, "Sync target rejected");
                    return vec![SyncResult::failed(name, e)];
                }
            },
            None => self
                .registry
                .list()
                .into_iter()
                .filter(|config| config.mounted)
                .map(|config| config.name.clone())
                .collect(),
        };

        let mut results = Vec::new();
        for name in targets {
            let span = span_bridge_op("sync_all", &name);
            let mount_path = mount_path_for(&name);
            let paths = self
                .caches
                .get(&name)
                .map(|cache| cache.paths())
                .unwrap_or_default();

            let before = results.len();
            for relative_path in &paths {
                let key = result_key(&name, relative_path);

                let current = match self.read_sandbox(&mount_path, relative_path, &key) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!(path = %key, error = %e, "Cannot compare file against snapshot");
                        results.push(SyncResult::failed(key, e));
                        continue;
                    }
                };

                let unchanged = self
                    .cached(&name, relative_path)
                    .map(|entry| entry.content.matches(&current))
                    .unwrap_or(false);
                if unchanged {
                    continue;
                }

                let sandbox_path = to_sandbox_path(&mount_path, relative_path);
                match self.sync_file_to_disk(&sandbox_path).await {
                    Ok(result) => results.push(result),
                    Err(e) => results.push(SyncResult::failed(key, e)),
                }
            }

            let batch = &results[before..];
            let failed = batch.iter().filter(|r| !r.success).count();
            span.record_items(batch.len(), failed);
            info!(
                mount = %name,
                checked = paths.len(),
                synced = batch.len() - failed,
                failed,
                "Mount synced"
            );
        }
        results
    }
}

/*!
 * Mount Loader
 * Host listing -> filter -> sandbox tree -> per-file load and snapshot
 */

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use super::cache::CachedContent;
use super::paths::{result_key, to_sandbox_path, validate_relative};
use super::registry::MountPointConfig;
use super::MountBridge;
use crate::core::{BridgeError, BridgeResult};
use crate::host::HostStorage;
use crate::monitoring::span_bridge_op;
use crate::vfs::FileSystem;

/// A host file left out of a mount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: BridgeError,
}

/// Outcome of one mount attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountSummary {
    pub name: String,
    pub created_dirs: usize,
    pub loaded_files: usize,
    pub skipped: Vec<SkippedFile>,
    pub already_mounted: bool,
}

impl MountSummary {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn already_mounted(name: &str) -> Self {
        Self {
            already_mounted: true,
            ..Self::new(name)
        }
    }

    /// True when no listed file had to be skipped
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl<H: HostStorage, F: FileSystem> MountBridge<H, F> {
    /// Mount a registered point
    ///
    /// A second call on a mounted point does no host I/O. Only a failed host
    /// listing fails the mount; files that cannot be read, decoded or written
    /// are skipped and reported in the summary.
    #[instrument(skip(self), fields(trace_id))]
    pub async fn mount(&mut self, name: &str) -> BridgeResult<MountSummary> {
        let config = self.registry.require(name)?.clone();
        if config.mounted {
            debug!(mount = %name, "Already mounted");
            return Ok(MountSummary::already_mounted(name));
        }

        let span = span_bridge_op("mount", name);
        tracing::Span::current().record("trace_id", span.trace_id());
        let mut summary = MountSummary::new(name);

        if self.ensure_sandbox_dir(&config.mount_path)? {
            summary.created_dirs += 1;
        }

        let listing = match self.host.list_files(&config.local_path).await.into_result() {
            Ok(files) => files,
            Err(reason) => {
                span.record_error(&reason);
                error!(mount = %name, local_path = %config.local_path, reason = %reason, "Host listing failed");
                return Err(BridgeError::HostListingFailure {
                    path: config.local_path.clone(),
                    reason,
                });
            }
        };

        let listed = listing.len();
        let entries = config.options.apply(listing);
        debug!(mount = %name, listed, kept = entries.len(), "Filtered host listing");
        self.cache_mut(name).set_entries(entries.clone());

        for entry in &entries {
            if let Err(e) = validate_relative(&entry.path) {
                warn!(mount = %name, path = %entry.path, "Skipping entry with invalid path");
                summary.skipped.push(SkippedFile {
                    path: entry.path.clone(),
                    reason: e,
                });
                continue;
            }

            if entry.is_dir() {
                match self.ensure_sandbox_dir(&to_sandbox_path(&config.mount_path, &entry.path)) {
                    Ok(true) => summary.created_dirs += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!(mount = %name, path = %entry.path, error = %e, "Failed to create sandbox directory");
                        summary.skipped.push(SkippedFile {
                            path: entry.path.clone(),
                            reason: e,
                        });
                    }
                }
                continue;
            }

            match self.load_file(&config, &entry.path).await {
                Ok((content, created_parent)) => {
                    if created_parent {
                        summary.created_dirs += 1;
                    }
                    self.cache_mut(name).insert(&entry.path, content);
                    summary.loaded_files += 1;
                }
                Err(e) => {
                    warn!(mount = %name, path = %entry.path, error = %e, "Skipping file");
                    summary.skipped.push(SkippedFile {
                        path: entry.path.clone(),
                        reason: e,
                    });
                }
            }
        }

        self.registry.set_mounted(name, true);
        span.record_items(summary.loaded_files, summary.skipped.len());

        info!(
            mount = %name,
            mount_path = %config.mount_path,
            loaded = summary.loaded_files,
            skipped = summary.skipped.len(),
            dirs = summary.created_dirs,
            "Mount point mounted"
        );
        Ok(summary)
    }

    /// Mount every registered point in registration order
    ///
    /// Returns true only if every mount succeeded; a failure does not stop the
    /// remaining mounts.
    pub async fn mount_all(&mut self) -> bool {
        let mut all_mounted = true;

        for name in self.registry.names() {
            if let Err(e) = self.mount(&name).await {
                error!(mount = %name, error = %e, "Mount failed");
                all_mounted = false;
            }
        }
        all_mounted
    }

    /// Read one host file and write it into the sandbox
    async fn load_file(
        &self,
        config: &MountPointConfig,
        relative_path: &str,
    ) -> BridgeResult<(CachedContent, bool)> {
        let key = result_key(&config.name, relative_path);

        let transport = self
            .host
            .read_file(&config.local_path, relative_path)
            .await
            .into_result()
            .map_err(|reason| BridgeError::HostReadFailure {
                path: key.clone(),
                reason,
            })?;

        let content = CachedContent::from_transport(&transport, &key)?;
        let created_parent =
            self.write_sandbox(&config.mount_path, relative_path, content.sandbox_bytes())?;
        Ok((content, created_parent))
    }
}

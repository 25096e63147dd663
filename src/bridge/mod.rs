/*!
 * Mount Bridge
 * Host directories overlaid onto the sandbox filesystem with change-tracked write-back
 *
 * Flow:
 * - register: record a named host directory and its filter options
 * - mount: list host files, filter, load them into the sandbox, snapshot them
 * - sync: push sandbox files that diverged from their snapshot back to the host
 * - unmount: drop snapshots and the sandbox subtree, keep the registration
 */

pub mod cache;
pub mod encoding;
pub mod filter;
pub mod paths;
pub mod registry;

mod loader;
mod sync;

pub use cache::{CachedContent, FileCacheEntry, MountCache, MountCacheStats};
pub use encoding::{TransportContent, TransportEncoding};
pub use filter::{FilterOptions, Pattern};
pub use loader::{MountSummary, SkippedFile};
pub use registry::{MountPointConfig, MountRegistry, MountType};
pub use sync::SyncResult;

use ahash::RandomState;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::{BridgeError, BridgeResult};
use crate::host::{HostStorage, WorkspaceEntry};
use crate::monitoring::span_bridge_op;
use crate::vfs::FileSystem;
use paths::{relative_parent, result_key, to_sandbox_path, validate_file_path};

/// Multi-mount bridge between a host file service and the sandbox filesystem
///
/// Owns the registry and per-mount caches. The sandbox is shared with the
/// interpreter through an `Arc`; every mutating bridge operation takes
/// `&mut self`, so bridge state needs no locking.
pub struct MountBridge<H: HostStorage, F: FileSystem> {
    registry: MountRegistry,
    caches: HashMap<String, MountCache, RandomState>,
    host: H,
    sandbox: Arc<F>,
}

impl<H: HostStorage, F: FileSystem> MountBridge<H, F> {
    pub fn new(host: H, sandbox: Arc<F>) -> Self {
        info!(sandbox = sandbox.name(), "Mount bridge initialized");
        Self {
            registry: MountRegistry::new(),
            caches: HashMap::default(),
            host,
            sandbox,
        }
    }

    /// Register or update a mount point
    ///
    /// Safe to call repeatedly; an existing point keeps its mounted state.
    pub fn register(
        &mut self,
        name: &str,
        local_path: &str,
        mount_type: MountType,
        options: FilterOptions,
    ) -> BridgeResult<()> {
        let created = self
            .registry
            .register(name, local_path, mount_type, options)?;
        self.caches.entry(name.to_string()).or_default();

        if created {
            info!(mount = %name, local_path = %local_path, mount_type = %mount_type, "Mount point registered");
        } else {
            debug!(mount = %name, local_path = %local_path, "Mount point updated");
        }
        Ok(())
    }

    pub fn mount_point(&self, name: &str) -> Option<&MountPointConfig> {
        self.registry.get(name)
    }

    /// All mount points in registration order
    pub fn mount_points(&self) -> Vec<&MountPointConfig> {
        self.registry.list()
    }

    /// Read a mounted file in its transport form
    ///
    /// Files snapshotted as binary come back as base64; everything else as
    /// UTF-8 text, falling back to base64 for uncached non-UTF-8 files.
    pub fn read_from_mount(&self, name: &str, relative_path: &str) -> BridgeResult<TransportContent> {
        let config = self.registry.require_mounted(name)?;
        validate_file_path(relative_path)?;

        let key = result_key(name, relative_path);
        let bytes = self.read_sandbox(&config.mount_path, relative_path, &key)?;

        match self.cached(name, relative_path).map(|e| &e.content) {
            Some(CachedContent::Binary { .. }) => {
                Ok(TransportContent::base64(encoding::encode_base64(&bytes)))
            }
            Some(CachedContent::Text(_)) => String::from_utf8(bytes)
                .map(TransportContent::text)
                .map_err(|_| BridgeError::EncodingMismatch(key)),
            None => Ok(TransportContent::from_bytes(bytes)),
        }
    }

    /// Write content into a mounted point without syncing it to the host
    ///
    /// The snapshot is updated to the new content, so a later batch sync
    /// treats the file as unchanged.
    pub fn write_to_mount(
        &mut self,
        name: &str,
        relative_path: &str,
        content: &str,
        encoding: Option<TransportEncoding>,
    ) -> BridgeResult<()> {
        let mount_path = self.registry.require_mounted(name)?.mount_path.clone();
        validate_file_path(relative_path)?;

        let key = result_key(name, relative_path);
        let transport = TransportContent {
            content: content.to_string(),
            encoding,
        };
        let cached = CachedContent::from_transport(&transport, &key)?;
        self.write_sandbox(&mount_path, relative_path, cached.sandbox_bytes())?;

        let size = cached.sandbox_bytes().len() as u64;
        let cache = self.cache_mut(name);
        cache.insert(relative_path, cached);
        cache.record_entry(WorkspaceEntry::file(relative_path, size));

        debug!(mount = %name, path = %relative_path, size, "Wrote file to mount");
        Ok(())
    }

    /// Unmount a point: clear its cache and remove its sandbox subtree
    ///
    /// Unknown names are ignored. The registration survives so the point can
    /// be mounted again.
    pub fn unmount(&mut self, name: &str) {
        let Some(config) = self.registry.get(name) else {
            debug!(mount = %name, "Unmount of unknown mount point ignored");
            return;
        };
        let mount_path = config.mount_path.clone();
        let span = span_bridge_op("unmount", name);

        let cleared = match self.caches.get_mut(name) {
            Some(cache) => {
                let count = cache.len();
                cache.clear();
                count
            }
            None => 0,
        };
        self.registry.set_mounted(name, false);

        let root = Path::new(&mount_path);
        if self.sandbox.exists(root) {
            if let Err(e) = self.sandbox.remove_dir_all(root) {
                span.record_error(&e.to_string());
                warn!(mount = %name, error = %e, "Failed to remove sandbox subtree");
            }
        }

        span.record_items(cleared, 0);
        info!(mount = %name, cleared_files = cleared, "Mount point unmounted");
    }

    /// Unmount every registered point
    pub fn unmount_all(&mut self) {
        for name in self.registry.names() {
            self.unmount(&name);
        }
    }

    /// Cache statistics for every mount point in registration order
    pub fn cache_stats(&self) -> Vec<MountCacheStats> {
        self.registry
            .list()
            .into_iter()
            .filter_map(|config| self.mount_cache_stats(&config.name))
            .collect()
    }

    pub fn mount_cache_stats(&self, name: &str) -> Option<MountCacheStats> {
        let config = self.registry.get(name)?;
        let stats = match self.caches.get(name) {
            Some(cache) => cache.stats(name, config.mounted),
            None => MountCache::new().stats(name, config.mounted),
        };
        Some(stats)
    }

    /// Filtered host listing recorded by the last mount (plus later writes)
    pub fn cached_entries(&self, name: &str) -> Option<&[WorkspaceEntry]> {
        self.caches.get(name).map(|cache| cache.entries())
    }

    /// Shared sandbox filesystem
    pub fn sandbox(&self) -> &Arc<F> {
        &self.sandbox
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    // Internal helpers shared by the loader and sync engine

    fn cached(&self, name: &str, relative_path: &str) -> Option<&FileCacheEntry> {
        self.caches.get(name)?.get(relative_path)
    }

    fn cache_mut(&mut self, name: &str) -> &mut MountCache {
        self.caches.entry(name.to_string()).or_default()
    }

    /// Create a sandbox directory tree unless it already exists; true if created
    fn ensure_sandbox_dir(&self, path: &str) -> BridgeResult<bool> {
        let path = Path::new(path);
        if self.sandbox.exists(path) {
            return Ok(false);
        }
        self.sandbox.create_dir(path)?;
        Ok(true)
    }

    /// Write a file under a mount, creating its parent first; true if the parent was created
    fn write_sandbox(&self, mount_path: &str, relative_path: &str, bytes: &[u8]) -> BridgeResult<bool> {
        let parent = match relative_parent(relative_path) {
            Some(parent) => to_sandbox_path(mount_path, parent),
            None => mount_path.to_string(),
        };
        let created = self.ensure_sandbox_dir(&parent)?;

        self.sandbox
            .write(Path::new(&to_sandbox_path(mount_path, relative_path)), bytes)?;
        Ok(created)
    }

    /// Read a file under a mount, reporting absence as `SandboxFileMissing`
    fn read_sandbox(&self, mount_path: &str, relative_path: &str, key: &str) -> BridgeResult<Vec<u8>> {
        let path = to_sandbox_path(mount_path, relative_path);
        self.sandbox.read(Path::new(&path)).map_err(|e| {
            if e.is_not_found() {
                BridgeError::SandboxFileMissing(key.to_string())
            } else {
                BridgeError::Sandbox(e)
            }
        })
    }
}

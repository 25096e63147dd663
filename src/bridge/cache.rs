/*!
 * Mount Cache
 * Last-known host snapshot of every bridged file, used only for change detection
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::SystemTime;

use super::encoding::{TransportContent, TransportEncoding};
use crate::core::BridgeResult;
use crate::host::WorkspaceEntry;

/// Snapshot content, tagged by how it travels to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedContent {
    /// UTF-8 text, stored in the sandbox verbatim
    Text(String),
    /// Raw bytes as stored in the sandbox plus the transport string they came from
    Binary { bytes: Vec<u8>, transport: String },
}

impl CachedContent {
    /// Build from transport form, decoding base64 once
    ///
    /// `path` is only used for error context.
    pub fn from_transport(content: &TransportContent, path: &str) -> BridgeResult<Self> {
        if content.is_binary() {
            Ok(CachedContent::Binary {
                bytes: content.to_bytes(path)?,
                transport: content.content.clone(),
            })
        } else {
            Ok(CachedContent::Text(content.content.clone()))
        }
    }

    /// Encoding tag sent to the host on write-back (`None` for text)
    pub fn encoding(&self) -> Option<TransportEncoding> {
        match self {
            CachedContent::Text(_) => None,
            CachedContent::Binary { .. } => Some(TransportEncoding::Base64),
        }
    }

    #[inline]
    pub fn is_binary(&self) -> bool {
        matches!(self, CachedContent::Binary { .. })
    }

    /// Bytes the sandbox holds for this snapshot
    pub fn sandbox_bytes(&self) -> &[u8] {
        match self {
            CachedContent::Text(text) => text.as_bytes(),
            CachedContent::Binary { bytes, .. } => bytes,
        }
    }

    /// Transport form of the snapshot
    pub fn to_transport(&self) -> TransportContent {
        match self {
            CachedContent::Text(text) => TransportContent::text(text.clone()),
            CachedContent::Binary { transport, .. } => TransportContent::base64(transport.clone()),
        }
    }

    /// Whether the sandbox bytes still match this snapshot
    #[inline]
    pub fn matches(&self, sandbox_bytes: &[u8]) -> bool {
        self.sandbox_bytes() == sandbox_bytes
    }
}

/// One cached file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCacheEntry {
    pub content: CachedContent,
    pub captured_at: SystemTime,
}

impl FileCacheEntry {
    pub fn new(content: CachedContent) -> Self {
        Self {
            content,
            captured_at: SystemTime::now(),
        }
    }
}

/// Cache statistics for one mount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountCacheStats {
    pub name: String,
    pub mounted: bool,
    pub cached_files: usize,
    pub text_files: usize,
    pub binary_files: usize,
    pub cached_bytes: u64,
    pub listed_entries: usize,
}

/// Per-mount file cache and entry list
///
/// Files are keyed by relative path and iterate in sorted order.
#[derive(Debug, Default)]
pub struct MountCache {
    files: BTreeMap<String, FileCacheEntry>,
    entries: Vec<WorkspaceEntry>,
}

impl MountCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, relative_path: &str) -> Option<&FileCacheEntry> {
        self.files.get(relative_path)
    }

    /// Insert or replace a snapshot with a fresh timestamp
    pub fn insert(&mut self, relative_path: &str, content: CachedContent) {
        self.files
            .insert(relative_path.to_string(), FileCacheEntry::new(content));
    }

    /// Cached relative paths in sorted order
    pub fn paths(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Filtered host listing from the last mount
    pub fn entries(&self) -> &[WorkspaceEntry] {
        &self.entries
    }

    pub fn set_entries(&mut self, entries: Vec<WorkspaceEntry>) {
        self.entries = entries;
    }

    /// Append a file entry unless the path is already listed
    pub fn record_entry(&mut self, entry: WorkspaceEntry) {
        match self.entries.iter_mut().find(|e| e.path == entry.path) {
            Some(existing) => existing.size = entry.size,
            None => self.entries.push(entry),
        }
    }

    /// Drop every snapshot and the entry list
    pub fn clear(&mut self) {
        self.files.clear();
        self.entries.clear();
    }

    pub fn stats(&self, name: &str, mounted: bool) -> MountCacheStats {
        let binary_files = self
            .files
            .values()
            .filter(|e| e.content.is_binary())
            .count();

        MountCacheStats {
            name: name.to_string(),
            mounted,
            cached_files: self.files.len(),
            text_files: self.files.len() - binary_files,
            binary_files,
            cached_bytes: self
                .files
                .values()
                .map(|e| e.content.sandbox_bytes().len() as u64)
                .sum(),
            listed_entries: self.entries.len(),
        }
    }
}

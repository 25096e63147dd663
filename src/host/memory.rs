/*!
 * In-Memory Host Backend
 * Scriptable host file service for tests and demos; records every call
 */

use ahash::RandomState;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::types::*;
use super::HostStorage;
use crate::bridge::encoding::{decode_base64, TransportContent, TransportEncoding};

/// A write request as the host received it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteCall {
    pub root: String,
    pub relative_path: String,
    pub content: String,
    pub encoding: Option<TransportEncoding>,
}

#[derive(Debug, Default)]
struct HostState {
    listings: HashMap<String, Vec<WorkspaceEntry>, RandomState>,
    contents: HashMap<(String, String), TransportContent, RandomState>,
    failing_listings: HashSet<String, RandomState>,
    failing_reads: HashSet<String, RandomState>,
    failing_writes: HashSet<String, RandomState>,
    list_calls: Vec<String>,
    read_calls: Vec<(String, String)>,
    writes: Vec<WriteCall>,
}

impl HostState {
    /// Add a listing entry for `path`, with directory entries for missing parents
    fn ensure_listed(&mut self, root: &str, entry: WorkspaceEntry) {
        let listing = self.listings.entry(root.to_string()).or_default();

        let mut prefix = String::new();
        let segments: Vec<&str> = entry.path.split('/').collect();
        for segment in &segments[..segments.len().saturating_sub(1)] {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            if !listing.iter().any(|e| e.path == prefix) {
                listing.push(WorkspaceEntry::directory(prefix.clone()));
            }
        }

        match listing.iter_mut().find(|e| e.path == entry.path) {
            Some(existing) => *existing = entry,
            None => listing.push(entry),
        }
    }
}

/// In-memory host file service
///
/// Clones share state, so a test can keep a handle after moving one into a bridge.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    state: Arc<RwLock<HostState>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an (initially empty) host directory
    pub fn add_root(&self, root: &str) {
        self.state.write().listings.entry(root.to_string()).or_default();
    }

    /// Store a file and list it under `root`
    pub fn insert_file(&self, root: &str, relative_path: &str, content: TransportContent) {
        let size = content
            .to_bytes(relative_path)
            .map(|b| b.len() as u64)
            .unwrap_or(content.content.len() as u64);

        let mut state = self.state.write();
        state.ensure_listed(root, WorkspaceEntry::file(relative_path, size));
        state
            .contents
            .insert((root.to_string(), relative_path.to_string()), content);
    }

    /// Store a plain text file
    pub fn insert_text(&self, root: &str, relative_path: &str, text: &str) {
        self.insert_file(root, relative_path, TransportContent::text(text));
    }

    /// Store a binary file, kept in base64 transport form
    pub fn insert_binary(&self, root: &str, relative_path: &str, bytes: &[u8]) {
        self.insert_file(
            root,
            relative_path,
            TransportContent::base64(crate::bridge::encoding::encode_base64(bytes)),
        );
    }

    /// Replace the listing for `root` verbatim (entries need not have content)
    pub fn set_listing(&self, root: &str, entries: Vec<WorkspaceEntry>) {
        self.state.write().listings.insert(root.to_string(), entries);
    }

    /// Make listing `root` fail
    pub fn fail_listing(&self, root: &str) {
        self.state.write().failing_listings.insert(root.to_string());
    }

    /// Make reads of `relative_path` fail under any root
    pub fn fail_read(&self, relative_path: &str) {
        self.state
            .write()
            .failing_reads
            .insert(relative_path.to_string());
    }

    /// Make writes of `relative_path` fail under any root
    pub fn fail_write(&self, relative_path: &str) {
        self.state
            .write()
            .failing_writes
            .insert(relative_path.to_string());
    }

    /// Current host content of a file
    pub fn file(&self, root: &str, relative_path: &str) -> Option<TransportContent> {
        self.state
            .read()
            .contents
            .get(&(root.to_string(), relative_path.to_string()))
            .cloned()
    }

    /// Current host content decoded to bytes
    pub fn file_bytes(&self, root: &str, relative_path: &str) -> Option<Vec<u8>> {
        self.file(root, relative_path)
            .and_then(|content| content.to_bytes(relative_path).ok())
    }

    /// Roots passed to `list_files`, in call order
    pub fn list_calls(&self) -> Vec<String> {
        self.state.read().list_calls.clone()
    }

    /// `(root, relative_path)` pairs passed to `read_file`, in call order
    pub fn read_calls(&self) -> Vec<(String, String)> {
        self.state.read().read_calls.clone()
    }

    /// Write requests, in call order (including failed ones)
    pub fn writes(&self) -> Vec<WriteCall> {
        self.state.read().writes.clone()
    }

    /// Total number of host calls of any kind
    pub fn call_count(&self) -> usize {
        let state = self.state.read();
        state.list_calls.len() + state.read_calls.len() + state.writes.len()
    }
}

impl HostStorage for MemoryHost {
    async fn list_files(&self, root: &str) -> ListFilesResponse {
        let mut state = self.state.write();
        state.list_calls.push(root.to_string());

        if state.failing_listings.contains(root) {
            return ListFilesResponse::failed(format!("EACCES: permission denied, scandir '{}'", root));
        }
        match state.listings.get(root) {
            Some(entries) => ListFilesResponse::ok(entries.clone()),
            None => ListFilesResponse::failed(format!("ENOENT: no such directory '{}'", root)),
        }
    }

    async fn read_file(&self, root: &str, relative_path: &str) -> ReadFileResponse {
        let mut state = self.state.write();
        state
            .read_calls
            .push((root.to_string(), relative_path.to_string()));

        if state.failing_reads.contains(relative_path) {
            return ReadFileResponse::failed(format!("EIO: i/o error, read '{}'", relative_path));
        }
        match state
            .contents
            .get(&(root.to_string(), relative_path.to_string()))
        {
            Some(content) => ReadFileResponse::ok(content.clone()),
            None => ReadFileResponse::failed(format!("ENOENT: no such file '{}'", relative_path)),
        }
    }

    async fn write_file(
        &self,
        root: &str,
        relative_path: &str,
        content: &str,
        encoding: Option<TransportEncoding>,
    ) -> WriteFileResponse {
        let mut state = self.state.write();
        state.writes.push(WriteCall {
            root: root.to_string(),
            relative_path: relative_path.to_string(),
            content: content.to_string(),
            encoding,
        });

        if state.failing_writes.contains(relative_path) {
            return WriteFileResponse::failed(format!("ENOSPC: no space left, write '{}'", relative_path));
        }

        let size = match encoding {
            Some(TransportEncoding::Base64) => match decode_base64(content) {
                Ok(bytes) => bytes.len() as u64,
                Err(e) => return WriteFileResponse::failed(format!("invalid base64: {}", e)),
            },
            _ => content.len() as u64,
        };

        state.ensure_listed(root, WorkspaceEntry::file(relative_path, size));
        state.contents.insert(
            (root.to_string(), relative_path.to_string()),
            TransportContent {
                content: content.to_string(),
                encoding,
            },
        );
        WriteFileResponse::ok()
    }
}

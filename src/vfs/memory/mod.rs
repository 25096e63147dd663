/*!
 * In-Memory Filesystem Backend
 * Volatile sandbox filesystem the interpreter executes against
 */

mod dir_ops;
mod file_ops;
mod metadata_ops;
mod node;

use ahash::RandomState;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::types::*;
use node::Node;

/// In-memory filesystem implementation
///
/// Cloning is cheap and yields a handle onto the same node table, so the
/// bridge and the interpreter can each hold one.
#[derive(Debug, Clone)]
pub struct MemFS {
    pub(super) nodes: Arc<DashMap<PathBuf, Node, RandomState>>,
    pub(super) max_size: Option<usize>,
    pub(super) current_size: Arc<AtomicUsize>,
}

impl MemFS {
    /// Create new in-memory filesystem
    pub fn new() -> Self {
        let nodes = DashMap::with_hasher(RandomState::new());

        // Create root directory
        nodes.insert(PathBuf::from("/"), Node::empty_dir());

        Self {
            nodes: Arc::new(nodes),
            max_size: None,
            current_size: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create with size limit
    pub fn with_capacity(max_size: usize) -> Self {
        let mut fs = Self::new();
        fs.max_size = Some(max_size);
        fs
    }

    /// Total bytes currently stored in files
    pub fn used_bytes(&self) -> usize {
        self.current_size.load(Ordering::SeqCst)
    }

    /// Normalize path (make absolute and clean)
    pub(super) fn normalize(&self, path: &Path) -> PathBuf {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new("/").join(path)
        };

        // Handles ., .., and repeated separators
        PathBuf::from(path_clean::clean(&path))
    }

    /// Check if space is available and reserve it atomically
    pub(super) fn check_and_reserve_space(&self, additional: usize) -> VfsResult<()> {
        if let Some(max) = self.max_size {
            loop {
                let current = self.current_size.load(Ordering::SeqCst);
                if current + additional > max {
                    return Err(VfsError::OutOfSpace);
                }
                if self
                    .current_size
                    .compare_exchange(
                        current,
                        current + additional,
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                    )
                    .is_ok()
                {
                    break;
                }
            }
        } else {
            self.current_size.fetch_add(additional, Ordering::SeqCst);
        }
        Ok(())
    }

    /// Release space (file shrunk, deleted, or reservation rolled back)
    pub(super) fn release_space(&self, amount: usize) {
        self.current_size.fetch_sub(amount, Ordering::SeqCst);
    }

    /// Get parent directory path
    pub(super) fn parent_path(&self, path: &Path) -> Option<PathBuf> {
        path.parent().map(|p| p.to_path_buf())
    }

    /// Get file name from path
    pub(super) fn file_name(&self, path: &Path) -> VfsResult<String> {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| VfsError::InvalidPath(format!("invalid path: {}", path.display())))
    }

    /// Ensure parent directory exists
    pub(super) fn ensure_parent(&self, path: &Path) -> VfsResult<()> {
        if let Some(parent) = self.parent_path(path) {
            match self.nodes.get(&parent) {
                None => {
                    return Err(VfsError::NotFound(format!(
                        "parent directory not found: {}",
                        parent.display()
                    )))
                }
                Some(node) if !node.is_dir() => {
                    return Err(VfsError::NotADirectory(parent.display().to_string()))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Add child to parent directory
    pub(super) fn add_child(
        &self,
        parent_path: &Path,
        child_name: &str,
        child_path: &Path,
    ) -> VfsResult<()> {
        if let Some(mut node) = self.nodes.get_mut(parent_path) {
            if let Node::Directory { children, .. } = node.value_mut() {
                children.insert(child_name.to_string(), child_path.to_path_buf());
                return Ok(());
            }
        }
        Err(VfsError::NotADirectory(parent_path.display().to_string()))
    }

    /// Remove child from parent directory
    pub(super) fn remove_child(&self, parent_path: &Path, child_name: &str) -> VfsResult<()> {
        if let Some(mut node) = self.nodes.get_mut(parent_path) {
            if let Node::Directory { children, .. } = node.value_mut() {
                children.remove(child_name);
                return Ok(());
            }
        }
        Err(VfsError::NotADirectory(parent_path.display().to_string()))
    }
}

impl Default for MemFS {
    fn default() -> Self {
        Self::new()
    }
}

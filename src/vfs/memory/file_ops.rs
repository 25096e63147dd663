/*!
 * File Operations Implementation
 * FileSystem trait methods for file I/O
 */

use std::path::Path;
use std::time::SystemTime;

use super::super::types::*;
use super::node::Node;
use super::MemFS;

impl MemFS {
    pub(super) fn read_impl(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let path = self.normalize(path);

        match self.nodes.get(&path).as_deref() {
            Some(Node::File { data, .. }) => Ok(data.clone()),
            Some(Node::Directory { .. }) => Err(VfsError::IsADirectory(path.display().to_string())),
            None => Err(VfsError::NotFound(path.display().to_string())),
        }
    }

    pub(super) fn write_impl(&self, path: &Path, data: &[u8]) -> VfsResult<()> {
        let path = self.normalize(path);
        self.ensure_parent(&path)?;

        // Existing file keeps its creation time; directories can't be overwritten
        let existing = match self.nodes.get(&path).as_deref() {
            Some(Node::File { data: old, created, .. }) => Some((old.len(), *created)),
            Some(Node::Directory { .. }) => {
                return Err(VfsError::IsADirectory(path.display().to_string()))
            }
            None => None,
        };
        let old_size = existing.map(|(len, _)| len).unwrap_or(0);

        if data.len() > old_size {
            self.check_and_reserve_space(data.len() - old_size)?;
        }

        if existing.is_none() {
            if let Some(parent) = self.parent_path(&path) {
                let file_name = self.file_name(&path)?;
                if let Err(e) = self.add_child(&parent, &file_name, &path) {
                    self.release_space(data.len());
                    return Err(e);
                }
            }
        }

        let now = SystemTime::now();
        self.nodes.insert(
            path,
            Node::File {
                data: data.to_vec(),
                modified: now,
                created: existing.map(|(_, created)| created).unwrap_or(now),
            },
        );

        if old_size > data.len() {
            self.release_space(old_size - data.len());
        }

        Ok(())
    }

    pub(super) fn delete_impl(&self, path: &Path) -> VfsResult<()> {
        let path = self.normalize(path);

        let size = match self.nodes.get(&path).as_deref() {
            Some(Node::File { data, .. }) => data.len(),
            Some(Node::Directory { .. }) => {
                return Err(VfsError::IsADirectory(path.display().to_string()))
            }
            None => return Err(VfsError::NotFound(path.display().to_string())),
        };

        self.nodes.remove(&path);
        if let Some(parent) = self.parent_path(&path) {
            let file_name = self.file_name(&path)?;
            self.remove_child(&parent, &file_name)?;
        }
        self.release_space(size);
        Ok(())
    }
}

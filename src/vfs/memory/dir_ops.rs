/*!
 * Directory Operations Implementation
 * FileSystem trait methods for directory management
 */

use std::path::{Path, PathBuf};

use super::super::types::*;
use super::node::Node;
use super::MemFS;

impl MemFS {
    pub(super) fn list_dir_impl(&self, path: &Path) -> VfsResult<Vec<Entry>> {
        let path = self.normalize(path);

        let children = match self.nodes.get(&path).as_deref() {
            Some(Node::Directory { children, .. }) => children.clone(),
            Some(Node::File { .. }) => {
                return Err(VfsError::NotADirectory(path.display().to_string()))
            }
            None => return Err(VfsError::NotFound(path.display().to_string())),
        };

        let mut entries: Vec<Entry> = children
            .into_iter()
            .filter_map(|(name, child_path)| {
                self.nodes
                    .get(&child_path)
                    .map(|node| Entry::new_unchecked(name, node.file_type()))
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    pub(super) fn create_dir_impl(&self, path: &Path) -> VfsResult<()> {
        let path = self.normalize(path);

        // Create each missing ancestor in turn
        let mut current = PathBuf::from("/");
        for component in path.components().skip(1) {
            current.push(component);

            if let Some(node) = self.nodes.get(&current) {
                if !node.is_dir() {
                    return Err(VfsError::NotADirectory(current.display().to_string()));
                }
                continue;
            }

            let parent = current
                .parent()
                .ok_or_else(|| VfsError::InvalidPath("path has no parent".to_string()))?
                .to_path_buf();
            let name = self.file_name(&current)?;

            self.nodes.insert(current.clone(), Node::empty_dir());
            self.add_child(&parent, &name, &current)?;
        }

        Ok(())
    }

    pub(super) fn remove_dir_impl(&self, path: &Path) -> VfsResult<()> {
        let path = self.normalize(path);

        match self.nodes.get(&path).as_deref() {
            Some(Node::Directory { children, .. }) if !children.is_empty() => {
                return Err(VfsError::InvalidArgument(format!(
                    "directory not empty: {}",
                    path.display()
                )))
            }
            Some(Node::Directory { .. }) => {}
            Some(Node::File { .. }) => {
                return Err(VfsError::NotADirectory(path.display().to_string()))
            }
            None => return Err(VfsError::NotFound(path.display().to_string())),
        }

        self.nodes.remove(&path);
        if let Some(parent) = self.parent_path(&path) {
            let dir_name = self.file_name(&path)?;
            self.remove_child(&parent, &dir_name)?;
        }
        Ok(())
    }

    pub(super) fn remove_dir_all_impl(&self, path: &Path) -> VfsResult<()> {
        let path = self.normalize(path);
        if path == Path::new("/") {
            return Err(VfsError::InvalidArgument("cannot remove root".to_string()));
        }
        if !self.nodes.contains_key(&path) {
            return Err(VfsError::NotFound(path.display().to_string()));
        }

        // Collect all paths to remove
        let mut to_remove = Vec::new();
        let mut to_visit = vec![path.clone()];

        while let Some(current) = to_visit.pop() {
            if let Some(entry) = self.nodes.get(&current) {
                if let Node::Directory { children, .. } = entry.value() {
                    to_visit.extend(children.values().cloned());
                }
            }
            to_remove.push(current);
        }

        let mut total_size = 0;
        for path_to_remove in to_remove.into_iter().rev() {
            if let Some((_, node)) = self.nodes.remove(&path_to_remove) {
                total_size += node.size();
            }
        }

        if let Some(parent) = self.parent_path(&path) {
            let dir_name = self.file_name(&path)?;
            self.remove_child(&parent, &dir_name)?;
        }

        self.release_space(total_size);
        Ok(())
    }
}

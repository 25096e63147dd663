/*!
 * Metadata Operations Implementation
 * FileSystem trait wiring for MemFS
 */

use std::path::Path;

use super::super::traits::FileSystem;
use super::super::types::*;
use super::MemFS;

impl FileSystem for MemFS {
    fn read(&self, path: &Path) -> VfsResult<Vec<u8>> {
        self.read_impl(path)
    }

    fn write(&self, path: &Path, data: &[u8]) -> VfsResult<()> {
        self.write_impl(path, data)
    }

    fn delete(&self, path: &Path) -> VfsResult<()> {
        self.delete_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        let path = self.normalize(path);
        self.nodes.contains_key(&path)
    }

    fn metadata(&self, path: &Path) -> VfsResult<Metadata> {
        let path = self.normalize(path);

        match self.nodes.get(&path) {
            Some(node) => Ok(Metadata {
                file_type: node.file_type(),
                size: node.size() as u64,
                modified: node.modified(),
                created: node.created(),
            }),
            None => Err(VfsError::NotFound(path.display().to_string())),
        }
    }

    fn list_dir(&self, path: &Path) -> VfsResult<Vec<Entry>> {
        self.list_dir_impl(path)
    }

    fn create_dir(&self, path: &Path) -> VfsResult<()> {
        self.create_dir_impl(path)
    }

    fn remove_dir(&self, path: &Path) -> VfsResult<()> {
        self.remove_dir_impl(path)
    }

    fn remove_dir_all(&self, path: &Path) -> VfsResult<()> {
        self.remove_dir_all_impl(path)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

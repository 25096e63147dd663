/*!
 * VFS Traits
 * Core sandbox filesystem abstraction
 */

use std::path::Path;

use super::types::*;

/// Sandbox filesystem trait
///
/// The bridge and the interpreter share one implementation of this trait.
/// Operations are synchronous and in-process; paths are absolute sandbox paths.
pub trait FileSystem: Send + Sync {
    /// Read entire file contents
    fn read(&self, path: &Path) -> VfsResult<Vec<u8>>;

    /// Read entire file contents as UTF-8 text
    fn read_to_string(&self, path: &Path) -> VfsResult<String> {
        let data = self.read(path)?;
        String::from_utf8(data).map_err(|_| VfsError::InvalidUtf8(path.display().to_string()))
    }

    /// Write entire file contents (create or overwrite)
    fn write(&self, path: &Path, data: &[u8]) -> VfsResult<()>;

    /// Delete file
    fn delete(&self, path: &Path) -> VfsResult<()>;

    /// Check if file/directory exists
    fn exists(&self, path: &Path) -> bool;

    /// Get file metadata
    fn metadata(&self, path: &Path) -> VfsResult<Metadata>;

    /// List directory contents
    fn list_dir(&self, path: &Path) -> VfsResult<Vec<Entry>>;

    /// Create directory (including parents)
    fn create_dir(&self, path: &Path) -> VfsResult<()>;

    /// Remove directory (must be empty)
    fn remove_dir(&self, path: &Path) -> VfsResult<()>;

    /// Remove directory recursively
    fn remove_dir_all(&self, path: &Path) -> VfsResult<()>;

    /// Get filesystem name/type
    fn name(&self) -> &str;
}

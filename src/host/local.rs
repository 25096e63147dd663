/*!
 * Local Host Backend
 * Serves the host file contract from real directories via tokio::fs
 */

use ahash::RandomState;
use std::collections::{HashSet, VecDeque};
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::types::*;
use super::HostStorage;
use crate::bridge::encoding::{decode_base64, TransportContent, TransportEncoding};

/// Host file service backed by the local disk
///
/// Roots passed to the contract are directories on disk; relative paths can't
/// escape them.
#[derive(Debug, Clone, Default)]
pub struct LocalHost {
    follow_symlinks: bool,
}

impl LocalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also descend into symlinked directories and read symlinked files
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Resolve a relative path under root, dropping `..` that would escape it
    fn resolve(root: &Path, relative: &str) -> PathBuf {
        let mut components = Vec::with_capacity(8);

        for component in Path::new(relative).components() {
            match component {
                Component::Normal(name) => components.push(name),
                Component::ParentDir => {
                    components.pop();
                }
                _ => {}
            }
        }

        let mut result = root.to_path_buf();
        for component in components {
            result.push(component);
        }
        result
    }

    fn io_error(e: std::io::Error, context: impl std::fmt::Display) -> String {
        format!("{}: {}", context, e)
    }

    /// Breadth-first listing of `root`
    ///
    /// Each real directory is descended at most once, so symlink cycles and
    /// aliased directories terminate when links are followed.
    async fn walk(&self, root: &Path) -> Result<Vec<WorkspaceEntry>, String> {
        let canonical_root = tokio::fs::canonicalize(root)
            .await
            .map_err(|e| Self::io_error(e, format!("list {}", root.display())))?;

        let mut files = Vec::new();
        let mut visited: HashSet<PathBuf, RandomState> = HashSet::default();
        visited.insert(canonical_root);
        let mut pending = VecDeque::from([(root.to_path_buf(), String::new())]);

        while let Some((dir, prefix)) = pending.pop_front() {
            let mut reader = tokio::fs::read_dir(&dir)
                .await
                .map_err(|e| Self::io_error(e, format!("list {}", dir.display())))?;

            let mut children = Vec::new();
            while let Some(entry) = reader
                .next_entry()
                .await
                .map_err(|e| Self::io_error(e, format!("read entry in {}", dir.display())))?
            {
                children.push(entry);
            }
            children.sort_by_key(|entry| entry.file_name());

            for entry in children {
                let Ok(name) = entry.file_name().into_string() else {
                    debug!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                    continue;
                };

                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| Self::io_error(e, format!("stat {}", entry.path().display())))?;
                let is_link = file_type.is_symlink();
                if is_link && !self.follow_symlinks {
                    continue;
                }

                let metadata = match tokio::fs::metadata(entry.path()).await {
                    Ok(metadata) => metadata,
                    Err(e) if is_link => {
                        debug!(path = %entry.path().display(), error = %e, "Skipping dangling symlink");
                        continue;
                    }
                    Err(e) => return Err(Self::io_error(e, format!("stat {}", entry.path().display()))),
                };
                let path = if prefix.is_empty() {
                    name
                } else {
                    format!("{}/{}", prefix, name)
                };

                let listed = if metadata.is_dir() {
                    let canonical = tokio::fs::canonicalize(entry.path())
                        .await
                        .map_err(|e| Self::io_error(e, format!("resolve {}", entry.path().display())))?;
                    if !visited.insert(canonical) {
                        debug!(path = %path, "Skipping already listed directory");
                        continue;
                    }
                    pending.push_back((entry.path(), path.clone()));
                    WorkspaceEntry::directory(path)
                } else {
                    WorkspaceEntry::file(path, metadata.len())
                };

                files.push(match metadata.modified() {
                    Ok(at) => listed.modified(at),
                    Err(_) => listed,
                });
            }
        }

        Ok(files)
    }
}

impl HostStorage for LocalHost {
    async fn list_files(&self, root: &str) -> ListFilesResponse {
        match self.walk(Path::new(root)).await {
            Ok(files) => ListFilesResponse::ok(files),
            Err(e) => ListFilesResponse::failed(e),
        }
    }

    async fn read_file(&self, root: &str, relative_path: &str) -> ReadFileResponse {
        let full_path = Self::resolve(Path::new(root), relative_path);
        match tokio::fs::read(&full_path).await {
            Ok(bytes) => ReadFileResponse::ok(TransportContent::from_bytes(bytes)),
            Err(e) => ReadFileResponse::failed(Self::io_error(e, format!("read {}", relative_path))),
        }
    }

    async fn write_file(
        &self,
        root: &str,
        relative_path: &str,
        content: &str,
        encoding: Option<TransportEncoding>,
    ) -> WriteFileResponse {
        let data = match encoding {
            Some(TransportEncoding::Base64) => match decode_base64(content) {
                Ok(bytes) => bytes,
                Err(e) => {
                    return WriteFileResponse::failed(format!(
                        "invalid base64 for {}: {}",
                        relative_path, e
                    ))
                }
            },
            _ => content.as_bytes().to_vec(),
        };

        let full_path = Self::resolve(Path::new(root), relative_path);
        if let Some(parent) = full_path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                return WriteFileResponse::failed(Self::io_error(
                    e,
                    format!("create parent dirs for {}", relative_path),
                ));
            }
        }

        match tokio::fs::write(&full_path, data).await {
            Ok(()) => WriteFileResponse::ok(),
            Err(e) => WriteFileResponse::failed(Self::io_error(e, format!("write {}", relative_path))),
        }
    }
}

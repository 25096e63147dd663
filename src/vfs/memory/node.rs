/*!
 * Filesystem Node Types
 * Internal representation of sandbox files and directories
 */

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;

use super::super::types::FileType;

/// In-memory filesystem node
#[derive(Debug, Clone)]
pub(in crate::vfs) enum Node {
    File {
        data: Vec<u8>,
        modified: SystemTime,
        created: SystemTime,
    },
    Directory {
        children: HashMap<String, PathBuf>,
        created: SystemTime,
    },
}

impl Node {
    pub fn empty_dir() -> Self {
        Node::Directory {
            children: HashMap::default(),
            created: SystemTime::now(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory { .. })
    }

    pub fn file_type(&self) -> FileType {
        match self {
            Node::File { .. } => FileType::File,
            Node::Directory { .. } => FileType::Directory,
        }
    }

    pub fn created(&self) -> SystemTime {
        match self {
            Node::File { created, .. } => *created,
            Node::Directory { created, .. } => *created,
        }
    }

    pub fn modified(&self) -> SystemTime {
        match self {
            Node::File { modified, .. } => *modified,
            Node::Directory { created, .. } => *created,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Node::File { data, .. } => data.len(),
            Node::Directory { .. } => 0,
        }
    }
}

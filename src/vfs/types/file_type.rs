/*!
 * VFS File Type Enum
 * Defines the kind of filesystem objects shared by the sandbox and host listings
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// File type enumeration
///
/// Serialized as `"file"` / `"directory"`, which is also the host listing wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    #[default]
    File,
    Directory,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FileType::File => write!(f, "file"),
            FileType::Directory => write!(f, "directory"),
        }
    }
}

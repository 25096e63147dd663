/*!
 * Host Wire Types
 * Request/response shapes exchanged with the host file service
 */

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::bridge::encoding::{TransportContent, TransportEncoding};
use crate::core::limits::PATH_SEPARATOR;
use crate::core::serde::optional_system_time_micros;
use crate::vfs::FileType;

/// One entry of a host directory listing
///
/// `path` is relative to the listed root, posix-style, and unique within a mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FileType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "optional_system_time_micros"
    )]
    pub modified_at: Option<SystemTime>,
}

impl WorkspaceEntry {
    /// File entry; the name is the last path segment
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        Self {
            name: last_segment(&path),
            path,
            kind: FileType::File,
            size: Some(size),
            modified_at: None,
        }
    }

    /// Directory entry; the name is the last path segment
    pub fn directory(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: last_segment(&path),
            path,
            kind: FileType::Directory,
            size: None,
            modified_at: None,
        }
    }

    /// Attach a modification time
    pub fn modified(mut self, at: SystemTime) -> Self {
        self.modified_at = Some(at);
        self
    }

    #[inline]
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == FileType::Directory
    }

    #[inline]
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == FileType::File
    }
}

fn last_segment(path: &str) -> String {
    path.trim_end_matches(PATH_SEPARATOR)
        .rsplit(PATH_SEPARATOR)
        .next()
        .unwrap_or(path)
        .to_string()
}

/// Response to a recursive listing request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<WorkspaceEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ListFilesResponse {
    pub fn ok(files: Vec<WorkspaceEntry>) -> Self {
        Self {
            success: true,
            files: Some(files),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            files: None,
            error: Some(error.into()),
        }
    }

    /// Collapse into the listing, treating a success without files as malformed
    pub fn into_result(self) -> Result<Vec<WorkspaceEntry>, String> {
        match (self.success, self.files) {
            (true, Some(files)) => Ok(files),
            (true, None) => Err("malformed listing response: missing files".to_string()),
            (false, _) => Err(self
                .error
                .unwrap_or_else(|| "host listing failed".to_string())),
        }
    }
}

/// Response to a single file read
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadFileResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<TransportEncoding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReadFileResponse {
    pub fn ok(content: TransportContent) -> Self {
        Self {
            success: true,
            content: Some(content.content),
            encoding: content.encoding,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Collapse into transport content, treating a success without content as malformed
    pub fn into_result(self) -> Result<TransportContent, String> {
        match (self.success, self.content) {
            (true, Some(content)) => Ok(TransportContent {
                content,
                encoding: self.encoding,
            }),
            (true, None) => Err("malformed read response: missing content".to_string()),
            (false, _) => Err(self.error.unwrap_or_else(|| "host read failed".to_string())),
        }
    }
}

/// Response to a single file write
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteFileResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WriteFileResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }

    pub fn into_result(self) -> Result<(), String> {
        if self.success {
            Ok(())
        } else {
            Err(self.error.unwrap_or_else(|| "host write failed".to_string()))
        }
    }
}

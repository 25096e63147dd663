/*!
 * Error Types
 * Centralized bridge error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::vfs::VfsError;

/// Bridge operation result
///
/// # Must Use
/// Mount and sync operations can fail and must be handled to avoid silent data loss
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Mount bridge errors with serialization support
///
/// Per-file failures during a mount or a batch sync are carried inside
/// `MountSummary` / `SyncResult` values; only the calling operation's own
/// failure is returned as `Err`.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum BridgeError {
    #[error("Mount point not registered: {0}")]
    #[diagnostic(
        code(bridge::mount_not_registered),
        help("Register the mount point before mounting, reading, writing or syncing it.")
    )]
    MountNotRegistered(String),

    #[error("Mount point not mounted: {0}")]
    #[diagnostic(
        code(bridge::mount_not_mounted),
        help("Mount the point first; unmounted points have no sandbox tree or cache.")
    )]
    MountNotMounted(String),

    #[error("Invalid mount name: {0}")]
    #[diagnostic(
        code(bridge::invalid_mount_name),
        help("Mount names must be non-empty and cannot contain '/'.")
    )]
    InvalidMountName(String),

    #[error("Invalid sandbox path: {0}")]
    #[diagnostic(
        code(bridge::invalid_path),
        help("Sandbox paths look like /<mount>/<relative path>.")
    )]
    InvalidPath(String),

    #[error("Invalid filter pattern: {0}")]
    #[diagnostic(
        code(bridge::invalid_pattern),
        help("Include/exclude patterns are regular expressions matched against relative paths.")
    )]
    InvalidPattern(String),

    #[error("Host listing failed for {path}: {reason}")]
    #[diagnostic(
        code(bridge::host_listing_failure),
        help("The mount was aborted. Check that the host directory exists and is readable.")
    )]
    HostListingFailure { path: String, reason: String },

    #[error("Host read failed for {path}: {reason}")]
    #[diagnostic(code(bridge::host_read_failure))]
    HostReadFailure { path: String, reason: String },

    #[error("Host write failed for {path}: {reason}")]
    #[diagnostic(
        code(bridge::host_write_failure),
        help("The cache baseline was left untouched; the file will be retried on the next sync.")
    )]
    HostWriteFailure { path: String, reason: String },

    #[error("Sandbox file missing: {0}")]
    #[diagnostic(
        code(bridge::sandbox_file_missing),
        help("The file was removed from the sandbox after it was mounted.")
    )]
    SandboxFileMissing(String),

    #[error("Encoding mismatch: {0}")]
    #[diagnostic(
        code(bridge::encoding_mismatch),
        help("A text-tagged file no longer holds valid UTF-8. Write it back as base64 instead.")
    )]
    EncodingMismatch(String),

    #[error("Invalid transport content for {path}: {reason}")]
    #[diagnostic(code(bridge::invalid_transport))]
    InvalidTransport { path: String, reason: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(bridge::configuration_error),
        help("Review the bridge configuration file or environment variables.")
    )]
    Configuration(String),

    #[error("Sandbox error: {0}")]
    #[diagnostic(code(bridge::sandbox_error))]
    Sandbox(#[from] VfsError),
}

impl BridgeError {
    /// Caller errors reference a mount that doesn't exist or isn't active
    #[inline]
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(
            self,
            BridgeError::MountNotRegistered(_)
                | BridgeError::MountNotMounted(_)
                | BridgeError::InvalidMountName(_)
                | BridgeError::InvalidPath(_)
                | BridgeError::EncodingMismatch(_)
        )
    }
}

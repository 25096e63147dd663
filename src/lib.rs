/*!
 * Sandbox Mount Bridge Library
 * Host directories mounted into an in-memory sandbox filesystem with change-tracked sync
 */

pub mod advisory;
pub mod bridge;
pub mod config;
pub mod core;
pub mod host;
pub mod monitoring;
pub mod vfs;

// Re-exports
pub use advisory::{AdvisoryRule, CodeAdvisor, Finding, Severity};
pub use bridge::{
    FilterOptions, MountBridge, MountCacheStats, MountPointConfig, MountSummary, MountType,
    SkippedFile, SyncResult, TransportContent, TransportEncoding,
};
pub use config::{BridgeConfig, MountSpec};
pub use crate::core::{BridgeError, BridgeResult};
pub use host::{HostStorage, LocalHost, MemoryHost, WorkspaceEntry};
pub use monitoring::init_tracing;
pub use vfs::{FileSystem, MemFS, VfsError};

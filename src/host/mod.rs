/*!
 * Host File Service
 * Asynchronous request/response contract for the process with real disk access
 */

mod local;
mod memory;
mod types;

pub use local::LocalHost;
pub use memory::{MemoryHost, WriteCall};
pub use types::{ListFilesResponse, ReadFileResponse, WorkspaceEntry, WriteFileResponse};

use crate::bridge::encoding::TransportEncoding;

/// Host file service
///
/// One call per operation, no batching. Failures are reported in-band through
/// the response's `success`/`error` fields, the way the host IPC channel does.
#[allow(async_fn_in_trait)]
pub trait HostStorage {
    /// Recursive listing of `root`, paths relative to it
    async fn list_files(&self, root: &str) -> ListFilesResponse;

    /// Read one file in transport form
    async fn read_file(&self, root: &str, relative_path: &str) -> ReadFileResponse;

    /// Write one file; `encoding` is `None` for plain text
    async fn write_file(
        &self,
        root: &str,
        relative_path: &str,
        content: &str,
        encoding: Option<TransportEncoding>,
    ) -> WriteFileResponse;
}

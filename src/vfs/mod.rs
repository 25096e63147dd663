/*!
 * Virtual File System Module
 * In-memory sandbox filesystem shared with the interpreter
 */

pub mod memory;
pub mod traits;
pub mod types;

// Re-exports
pub use memory::MemFS;
pub use traits::FileSystem;
pub use types::{Entry, FileType, Metadata, VfsError, VfsResult};

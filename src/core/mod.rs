/*!
 * Core Module
 * Fundamental bridge types, limits and error handling
 */

pub mod errors;
pub mod limits;
pub mod serde;

// Re-export for convenience
pub use errors::*;

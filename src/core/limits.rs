/*!
 * Bridge Limits and Constants
 *
 * Centralized location for sandbox capacities, markers and environment keys.
 */

// =============================================================================
// SANDBOX
// =============================================================================

/// Default sandbox filesystem capacity (512MB)
/// Mirrors the interpreter heap budget; writes past this fail with OutOfSpace
pub const DEFAULT_SANDBOX_CAPACITY: usize = 512 * 1024 * 1024;

/// Separator used in sandbox paths and host-relative paths (posix style)
pub const PATH_SEPARATOR: char = '/';

// =============================================================================
// FILTERING
// =============================================================================

/// Leading character of hidden file and directory names
pub const HIDDEN_FILE_MARKER: char = '.';

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Path to a JSON bridge configuration file
pub const ENV_CONFIG_PATH: &str = "BRIDGE_CONFIG";

/// Fallback host directory mounted as "workspace" when no config file is given
pub const ENV_WORKSPACE_PATH: &str = "BRIDGE_WORKSPACE_PATH";

/// Override for the sandbox capacity in bytes
pub const ENV_SANDBOX_CAPACITY: &str = "BRIDGE_SANDBOX_CAPACITY";

/// Enable JSON trace output ("1" or "true")
pub const ENV_TRACE_JSON: &str = "BRIDGE_TRACE_JSON";

/*!
 * Path Translation
 * Mapping between (mount name, relative path) pairs and absolute sandbox paths
 */

use crate::core::limits::PATH_SEPARATOR;
use crate::core::{BridgeError, BridgeResult};

/// Sandbox mount path for a mount name ("/" + name)
#[inline]
pub fn mount_path_for(name: &str) -> String {
    format!("{}{}", PATH_SEPARATOR, name)
}

/// Absolute sandbox path of a file inside a mount
#[inline]
pub fn to_sandbox_path(mount_path: &str, relative_path: &str) -> String {
    format!("{}{}{}", mount_path, PATH_SEPARATOR, relative_path)
}

/// Split an absolute sandbox path into `(mount name, relative path)`
///
/// Segment 1 is the mount name and everything after it is re-joined, so
/// relative paths containing `/` round-trip unchanged.
pub fn from_sandbox_path(path: &str) -> BridgeResult<(String, String)> {
    let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();

    match segments.as_slice() {
        [_, mount, rest @ ..] if !mount.is_empty() && !rest.is_empty() => {
            let relative = rest.join("/");
            validate_file_path(&relative).map_err(|_| BridgeError::InvalidPath(path.to_string()))?;
            Ok((mount.to_string(), relative))
        }
        _ => Err(BridgeError::InvalidPath(path.to_string())),
    }
}

/// Reject relative paths that are empty, absolute, or step outside the mount
pub fn validate_relative(relative_path: &str) -> BridgeResult<()> {
    let escapes = relative_path
        .split(PATH_SEPARATOR)
        .any(|segment| segment == ".." || segment == ".");

    if relative_path.is_empty() || relative_path.starts_with(PATH_SEPARATOR) || escapes {
        return Err(BridgeError::InvalidPath(relative_path.to_string()));
    }
    Ok(())
}

/// Like `validate_relative`, but also rejects empty segments
///
/// Listing entries may name directories as "docs/"; a file path may not end
/// in a separator or contain "//", since those alias another file's node.
pub fn validate_file_path(relative_path: &str) -> BridgeResult<()> {
    validate_relative(relative_path)?;
    if relative_path.split(PATH_SEPARATOR).any(str::is_empty) {
        return Err(BridgeError::InvalidPath(relative_path.to_string()));
    }
    Ok(())
}

/// Display key for a file in sync results ("<mount>/<relative path>")
#[inline]
pub fn result_key(mount: &str, relative_path: &str) -> String {
    format!("{}{}{}", mount, PATH_SEPARATOR, relative_path)
}

/// Parent of a relative path, if it has one
pub fn relative_parent(relative_path: &str) -> Option<&str> {
    relative_path
        .rsplit_once(PATH_SEPARATOR)
        .map(|(parent, _)| parent)
        .filter(|parent| !parent.is_empty())
}

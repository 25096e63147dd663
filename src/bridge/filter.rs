/*!
 * Filter Engine
 * Predicate pipeline deciding which host entries participate in a mount
 */

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::core::limits::HIDDEN_FILE_MARKER;
use crate::core::serde::default_true;
use crate::core::{BridgeError, BridgeResult};
use crate::host::WorkspaceEntry;

/// Regular expression matched (unanchored) against an entry's relative path
///
/// Serialized as its source string; validated when built or deserialized.
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> BridgeResult<Self> {
        Regex::new(source)
            .map(Self)
            .map_err(|e| BridgeError::InvalidPattern(format!("{}: {}", source, e)))
    }

    #[inline]
    pub fn is_match(&self, path: &str) -> bool {
        self.0.is_match(path)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(serde::de::Error::custom)
    }
}

/// Per-mount filter options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Files larger than this many bytes are skipped; directories are exempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_pattern: Option<Pattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_pattern: Option<Pattern>,
    /// Skip files and directories whose name starts with '.'
    #[serde(default = "default_true")]
    pub skip_hidden: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            max_file_size: None,
            include_pattern: None,
            exclude_pattern: None,
            skip_hidden: true,
        }
    }
}

impl FilterOptions {
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    pub fn with_include(mut self, pattern: &str) -> BridgeResult<Self> {
        self.include_pattern = Some(Pattern::new(pattern)?);
        Ok(self)
    }

    pub fn with_exclude(mut self, pattern: &str) -> BridgeResult<Self> {
        self.exclude_pattern = Some(Pattern::new(pattern)?);
        Ok(self)
    }

    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.skip_hidden = !include_hidden;
        self
    }

    /// Run the pipeline over a host listing, preserving listing order
    ///
    /// Steps run in a fixed order: hidden names, file size, include, exclude.
    /// Hidden filtering applies to directories too; only the size step exempts them.
    pub fn apply(&self, mut entries: Vec<WorkspaceEntry>) -> Vec<WorkspaceEntry> {
        if self.skip_hidden {
            entries.retain(|e| !e.name.starts_with(HIDDEN_FILE_MARKER));
        }

        if let Some(max) = self.max_file_size {
            entries.retain(|e| e.is_dir() || e.size.unwrap_or(0) <= max);
        }

        if let Some(include) = &self.include_pattern {
            entries.retain(|e| include.is_match(&e.path));
        }

        if let Some(exclude) = &self.exclude_pattern {
            entries.retain(|e| !exclude.is_match(&e.path));
        }

        entries
    }
}

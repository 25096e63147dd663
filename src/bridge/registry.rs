/*!
 * Mount Registry
 * Named mount-point records with idempotent registration
 */

use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::filter::FilterOptions;
use super::paths::mount_path_for;
use crate::core::limits::PATH_SEPARATOR;
use crate::core::{BridgeError, BridgeResult};

/// What a mount point holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountType {
    #[default]
    Workspace,
    Config,
    Scripts,
    Custom,
}

impl fmt::Display for MountType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MountType::Workspace => write!(f, "workspace"),
            MountType::Config => write!(f, "config"),
            MountType::Scripts => write!(f, "scripts"),
            MountType::Custom => write!(f, "custom"),
        }
    }
}

/// Mount point configuration
///
/// `mount_path` is always "/" + `name`. The record outlives unmounting so the
/// point can be remounted without registering again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountPointConfig {
    pub name: String,
    pub mount_path: String,
    pub local_path: String,
    #[serde(rename = "type")]
    pub mount_type: MountType,
    pub options: FilterOptions,
    pub mounted: bool,
}

/// Registry of mount points, iterated in registration order
#[derive(Debug, Default)]
pub struct MountRegistry {
    points: HashMap<String, MountPointConfig, RandomState>,
    order: Vec<String>,
}

impl MountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or update a mount point
    ///
    /// Re-registering replaces `local_path`, `mount_type` and `options` but
    /// never touches `mounted`. Returns true when the name was new.
    pub fn register(
        &mut self,
        name: &str,
        local_path: &str,
        mount_type: MountType,
        options: FilterOptions,
    ) -> BridgeResult<bool> {
        validate_name(name)?;

        if let Some(existing) = self.points.get_mut(name) {
            existing.local_path = local_path.to_string();
            existing.mount_type = mount_type;
            existing.options = options;
            return Ok(false);
        }

        self.points.insert(
            name.to_string(),
            MountPointConfig {
                name: name.to_string(),
                mount_path: mount_path_for(name),
                local_path: local_path.to_string(),
                mount_type,
                options,
                mounted: false,
            },
        );
        self.order.push(name.to_string());
        Ok(true)
    }

    pub fn get(&self, name: &str) -> Option<&MountPointConfig> {
        self.points.get(name)
    }

    /// Lookup that reports unknown names as an error
    pub fn require(&self, name: &str) -> BridgeResult<&MountPointConfig> {
        self.points
            .get(name)
            .ok_or_else(|| BridgeError::MountNotRegistered(name.to_string()))
    }

    /// Lookup that also requires the point to be mounted
    pub fn require_mounted(&self, name: &str) -> BridgeResult<&MountPointConfig> {
        let config = self.require(name)?;
        if !config.mounted {
            return Err(BridgeError::MountNotMounted(name.to_string()));
        }
        Ok(config)
    }

    pub(crate) fn set_mounted(&mut self, name: &str, mounted: bool) {
        if let Some(config) = self.points.get_mut(name) {
            config.mounted = mounted;
        }
    }

    /// All mount points in registration order
    pub fn list(&self) -> Vec<&MountPointConfig> {
        self.order
            .iter()
            .filter_map(|name| self.points.get(name))
            .collect()
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn validate_name(name: &str) -> BridgeResult<()> {
    let aliases_root = name == "." || name == "..";
    if name.is_empty()
        || aliases_root
        || name.contains(PATH_SEPARATOR)
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(BridgeError::InvalidMountName(name.to_string()));
    }
    Ok(())
}

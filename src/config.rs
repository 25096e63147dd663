/*!
 * Bridge Configuration
 * Mount specs and sandbox sizing, loaded from a JSON file or the environment
 */

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::bridge::{FilterOptions, MountType};
use crate::core::limits::{
    DEFAULT_SANDBOX_CAPACITY, ENV_CONFIG_PATH, ENV_SANDBOX_CAPACITY, ENV_WORKSPACE_PATH,
};
use crate::core::{BridgeError, BridgeResult};

/// One mount point to register at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountSpec {
    pub name: String,
    pub local_path: String,
    #[serde(rename = "type", default)]
    pub mount_type: MountType,
    #[serde(default)]
    pub options: FilterOptions,
}

/// Bridge configuration
///
/// File form:
/// ```json
/// { "sandboxCapacity": 268435456,
///   "mounts": [{ "name": "workspace", "localPath": "/home/me/project" }] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    #[serde(default)]
    pub mounts: Vec<MountSpec>,
    #[serde(default = "default_sandbox_capacity")]
    pub sandbox_capacity: usize,
}

fn default_sandbox_capacity() -> usize {
    DEFAULT_SANDBOX_CAPACITY
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mounts: Vec::new(),
            sandbox_capacity: DEFAULT_SANDBOX_CAPACITY,
        }
    }
}

impl BridgeConfig {
    /// Parse configuration from JSON text
    pub fn from_json(json: &str) -> BridgeResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| BridgeError::Configuration(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Load configuration from the environment
    ///
    /// `BRIDGE_CONFIG` names a JSON file. Without it, `BRIDGE_WORKSPACE_PATH`
    /// becomes a single "workspace" mount. `BRIDGE_SANDBOX_CAPACITY` overrides
    /// the sandbox size in bytes either way.
    pub fn from_env() -> BridgeResult<Self> {
        let mut config = match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) => {
                info!(path = %path, "Loading bridge config file");
                Self::from_file(path)?
            }
            Err(_) => {
                let mut config = Self::default();
                if let Ok(workspace) = std::env::var(ENV_WORKSPACE_PATH) {
                    config.mounts.push(MountSpec {
                        name: "workspace".to_string(),
                        local_path: workspace,
                        mount_type: MountType::Workspace,
                        options: FilterOptions::default(),
                    });
                }
                config
            }
        };

        if let Ok(capacity) = std::env::var(ENV_SANDBOX_CAPACITY) {
            config.sandbox_capacity = capacity.parse().map_err(|_| {
                BridgeError::Configuration(format!(
                    "{} must be a byte count, got '{}'",
                    ENV_SANDBOX_CAPACITY, capacity
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> BridgeResult<()> {
        if self.sandbox_capacity == 0 {
            return Err(BridgeError::Configuration(
                "sandbox capacity must be greater than zero".to_string(),
            ));
        }
        for (i, mount) in self.mounts.iter().enumerate() {
            if self.mounts[..i].iter().any(|m| m.name == mount.name) {
                return Err(BridgeError::Configuration(format!(
                    "duplicate mount name '{}'",
                    mount.name
                )));
            }
        }
        Ok(())
    }
}

use crate::detect::helper::{DEFAULT_BINARY, Helper};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level primectl configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimectlConfig {
    pub journal: JournalConfig,
    pub helper: HelperConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Log configure/autoconfigure outcomes to the system journal.
    pub enabled: bool,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperConfig {
    /// GPU driver management helper to invoke.
    pub binary: String,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
        }
    }
}

impl HelperConfig {
    pub fn helper(&self) -> Helper {
        Helper::new(self.binary.clone())
    }
}

const SYSTEM_CONFIG: &str = "/etc/primectl/config.toml";

/// Load the system config file if it exists.
fn load_system() -> Option<toml::Value> {
    let content = std::fs::read_to_string(SYSTEM_CONFIG).ok()?;
    toml::from_str(&content).ok()
}

/// Load the user config file (~/.config/primectl/config.toml) if it exists.
fn load_user() -> Option<toml::Value> {
    let dir = dirs::config_dir()?;
    let path = dir.join("primectl").join("config.toml");
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively merge two TOML values. Tables are merged key-by-key;
/// all other types in `overlay` replace `base`.
fn merge_values(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_values(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load config from a specific path, ignoring system/user files.
fn load_from_path(path: &Path) -> PrimectlConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse config");
            PrimectlConfig::default()
        }),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read config");
            PrimectlConfig::default()
        }
    }
}

/// Load the merged config: system defaults, then user overrides.
/// If `override_path` is provided, use only that file instead.
pub fn load(override_path: Option<&PathBuf>) -> PrimectlConfig {
    if let Some(path) = override_path {
        return load_from_path(path);
    }

    let merged = match (load_system(), load_user()) {
        (Some(s), Some(u)) => Some(merge_values(s, u)),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    };

    match merged {
        Some(value) => value.try_into().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to deserialize config");
            PrimectlConfig::default()
        }),
        None => PrimectlConfig::default(),
    }
}

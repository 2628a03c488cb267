//! Rig configuration module.
//!
//! Handles loading, validating, and merging `rig.toml`. User values are
//! layered over stock defaults, so a config file only needs the keys it
//! wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [backend]
//! server = "http://localhost:3000"  # Graph server base URL
//! # key = "..."                     # Account key (signing needs key + secret)
//! # secret = "..."                  # Signing secret
//!
//! [defaults]
//! graph = "passthrough"             # Graph used when a job names none
//! breakpoints = [480, 768, 1024, 1440]
//! property = "width"                # "width" or "height"
//! selector = ".cover"
//!
//! [defaults.params]                 # Base params for every URL
//! # quality = 80
//!
//! [processing]
//! # max_processes = 4               # Max parallel job workers
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::imaging::GraphServer;
use crate::types::{Params, Property};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `rig.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RigConfig {
    /// Graph server connection, handed to the URL builder.
    pub backend: GraphServer,
    /// Values filled into jobs that leave them out.
    pub defaults: DefaultsConfig,
    /// Parallel batch settings.
    pub processing: ProcessingConfig,
}

impl RigConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.server.is_empty() {
            return Err(ConfigError::Validation(
                "backend.server must not be empty".into(),
            ));
        }
        self.backend
            .check()
            .map_err(|e| ConfigError::Validation(format!("backend.server: {e}")))?;
        if self.defaults.graph.is_empty() {
            return Err(ConfigError::Validation(
                "defaults.graph must not be empty".into(),
            ));
        }
        if self.defaults.property.parse::<Property>().is_err() {
            return Err(ConfigError::Validation(format!(
                "defaults.property must be \"width\" or \"height\", got \"{}\"",
                self.defaults.property
            )));
        }
        if self.defaults.selector.is_empty() {
            return Err(ConfigError::Validation(
                "defaults.selector must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Fallback values for jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Graph name used when a job has none.
    pub graph: String,
    /// Breakpoints used by `breakpoints` and `srcset` jobs without their own.
    pub breakpoints: Vec<f64>,
    /// Media query axis for `breakpoints` jobs.
    pub property: String,
    /// Selector for `breakpoints` jobs.
    pub selector: String,
    /// Params merged under every job's own params.
    pub params: Params,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            graph: "passthrough".to_string(),
            breakpoints: vec![480.0, 768.0, 1024.0, 1440.0],
            property: "width".to_string(),
            selector: ".cover".to_string(),
            params: Params::new(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel job workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(RigConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<RigConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: RigConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a `rig.toml` file.
///
/// A missing file yields the stock defaults. Unknown keys and invalid values
/// are errors.
pub fn load_config(path: &Path) -> Result<RigConfig, ConfigError> {
    if !path.exists() {
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Returns a fully-commented stock `rig.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# cover-rig Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Graph server
# ---------------------------------------------------------------------------
[backend]
# Base URL of the image graph server (http or https).
server = "http://localhost:3000"

# Account key and signing secret. URLs are signed only when both are set.
# key = "my-key"
# secret = "my-secret"

# ---------------------------------------------------------------------------
# Job defaults
# ---------------------------------------------------------------------------
# Filled into jobs that leave the field out. A job's own values always win.
[defaults]
# Graph (transformation pipeline) name.
graph = "passthrough"

# Pixel thresholds for media query ranges and srcset widths.
breakpoints = [480, 768, 1024, 1440]

# Media query axis: "width" or "height".
property = "width"

# Selector receiving the background image.
selector = ".cover"

# Extra params added to every URL (job params override these).
[defaults.params]
# quality = 80

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for batch job files.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

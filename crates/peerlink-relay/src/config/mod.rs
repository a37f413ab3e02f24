//! Relay config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use peerlink_core::error::{RelayError, Result};

pub use schema::{RelayConfig, RelaySection};

pub fn load_from_file(path: &str) -> Result<RelayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RelayError::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<RelayConfig> {
    let cfg: RelayConfig =
        serde_yaml::from_str(s).map_err(|e| RelayError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path` when it exists, defaults otherwise.
pub fn load_or_default(path: &str) -> Result<RelayConfig> {
    if Path::new(path).exists() {
        load_from_file(path)
    } else {
        tracing::debug!(path, "no config file, using defaults");
        Ok(RelayConfig::default())
    }
}

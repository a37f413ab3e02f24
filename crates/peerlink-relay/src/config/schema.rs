use serde::Deserialize;

use peerlink_core::error::{RelayError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    pub version: u32,

    #[serde(default)]
    pub relay: RelaySection,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            relay: RelaySection::default(),
        }
    }
}

impl RelayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RelayError::Config("version must be 1".into()));
        }
        self.relay.validate()
    }

    /// Listen address with the `PORT` environment override applied.
    pub fn listen_addr(&self) -> String {
        match std::env::var("PORT") {
            Ok(port) if !port.is_empty() => {
                let host = self
                    .relay
                    .listen
                    .rsplit_once(':')
                    .map(|(h, _)| h)
                    .unwrap_or("0.0.0.0");
                format!("{host}:{port}")
            }
            _ => self.relay.listen.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,
}

impl Default for RelaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            static_dir: default_static_dir(),
            max_frame_bytes: default_max_frame_bytes(),
        }
    }
}

impl RelaySection {
    pub fn validate(&self) -> Result<()> {
        if !(126..=64 * 1024 * 1024).contains(&self.max_frame_bytes) {
            return Err(RelayError::Config(
                "relay.max_frame_bytes must be between 126 and 67108864".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".into()
}
fn default_static_dir() -> String {
    "public".into()
}
fn default_max_frame_bytes() -> usize {
    1024 * 1024
}

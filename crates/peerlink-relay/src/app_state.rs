//! Shared application state for the relay.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::relay::Registry;

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<RelayConfig>,
    registry: Arc<Registry>,
}

impl AppState {
    pub fn new(cfg: RelayConfig) -> Self {
        Self {
            cfg: Arc::new(cfg),
            registry: Arc::new(Registry::new()),
        }
    }

    pub fn cfg(&self) -> &RelayConfig {
        &self.cfg
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

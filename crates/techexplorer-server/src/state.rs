//! Shared application state.

use techexplorer_core::{ExplorerConfig, Result};
use techexplorer_relay::AgentClient;

/// Read-only state shared by all route handlers. Requests never mutate it.
pub struct AppState {
    pub config: ExplorerConfig,
    pub agent: AgentClient,
}

impl AppState {
    pub fn new(config: ExplorerConfig) -> Result<Self> {
        let agent = AgentClient::new(&config)?;
        Ok(Self { config, agent })
    }
}

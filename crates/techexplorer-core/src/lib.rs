//! Tech Explorer Core: configuration and the shared error taxonomy.

pub mod config;
pub mod error;

pub use config::{AgentTimeouts, ExplorerConfig};
pub use error::{Error, Result};

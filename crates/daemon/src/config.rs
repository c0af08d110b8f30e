use std::net::SocketAddr;

use clearance_core::model::SystemState;
use thiserror::Error;

pub const DEFAULT_VERIFY_BASE_URL: &str = "https://gra.gov.gh/verify";
pub const DEFAULT_FEED_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub listen: SocketAddr,

    /// Flags the simulator starts with.
    pub initial_state: SystemState,

    /// Prefix of the verification URL printed on cleared receipts.
    pub verify_base_url: String,

    /// Events buffered per observer before a slow observer starts skipping.
    pub feed_capacity: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("feed capacity must be at least 1")]
    ZeroFeedCapacity,
    #[error("verify base url must not be empty")]
    EmptyVerifyUrl,
}

impl DaemonConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed_capacity == 0 {
            return Err(ConfigError::ZeroFeedCapacity);
        }
        if self.verify_base_url.trim().is_empty() {
            return Err(ConfigError::EmptyVerifyUrl);
        }
        Ok(())
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 3000)),
            initial_state: SystemState::default(),
            verify_base_url: DEFAULT_VERIFY_BASE_URL.to_string(),
            feed_capacity: DEFAULT_FEED_CAPACITY,
        }
    }
}

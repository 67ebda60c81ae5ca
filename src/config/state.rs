// Application state module
// Shared, read-only state handed to every connection

use std::sync::Arc;

use super::types::Config;
use crate::processor::ChatProcessor;

/// Application state
pub struct AppState {
    pub config: Config,
    pub processor: Arc<dyn ChatProcessor>,
}

impl AppState {
    pub fn new(config: Config, processor: Arc<dyn ChatProcessor>) -> Self {
        Self { config, processor }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}

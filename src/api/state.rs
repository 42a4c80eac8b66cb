//! Application State
//!
//! Shared state accessible by all API handlers.

use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::dictionary::DictionarySource;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Template index and cache used by `/api/dictionary`
    pub dictionary: DictionarySource,
    /// Built single-page application
    pub dist_dir: PathBuf,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(dictionary: DictionarySource, dist_dir: impl Into<PathBuf>) -> Self {
        Self {
            dictionary,
            dist_dir: dist_dir.into(),
            start_time: Instant::now(),
        }
    }

    /// Create state from a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            DictionarySource::new(
                config.dictionary.index_path.clone(),
                config.dictionary.output_path.clone(),
            ),
            config.web.dist_dir.clone(),
        )
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

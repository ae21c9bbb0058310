//! Chirp content limits.

use serde::{Deserialize, Serialize};

/// Chirp content configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChirpConfig {
    /// Maximum body length in characters.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for ChirpConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
        }
    }
}

fn default_max_length() -> usize {
    140
}

//! Configuration for the concatenator.
//!
//! All fields have defaults, so an empty TOML document is a valid config:
//!
//! ```toml
//! buffer_samples = 4096
//! block_samples = 1024
//! parallel_reconcile = true
//! expected_sample_rate = 16000
//! ```

use std::path::Path;

use fluent_voice_domain::VoiceError;
use serde::{Deserialize, Serialize};

/// Tuning knobs for [`OverlapUnitConcatenator`](crate::OverlapUnitConcatenator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcatConfig {
    /// Samples mixed per batch by the buffering stage.
    pub buffer_samples: usize,
    /// Samples per block handed to the caller.
    pub block_samples: usize,
    /// Spread duration reconciliation over the rayon pool.
    pub parallel_reconcile: bool,
    /// Refuse timelines recorded at any other rate.
    pub expected_sample_rate: Option<u32>,
}

impl Default for ConcatConfig {
    fn default() -> Self {
        Self {
            buffer_samples: Self::DEFAULT_BUFFER_SAMPLES,
            block_samples: Self::DEFAULT_BLOCK_SAMPLES,
            parallel_reconcile: true,
            expected_sample_rate: None,
        }
    }
}

impl ConcatConfig {
    const DEFAULT_BUFFER_SAMPLES: usize = 4096;
    const DEFAULT_BLOCK_SAMPLES: usize = 1024;

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, VoiceError> {
        let config: Self = toml::from_str(text)
            .map_err(|e| VoiceError::Configuration(format!("invalid concat config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VoiceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            VoiceError::Configuration(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), VoiceError> {
        if self.buffer_samples == 0 {
            return Err(VoiceError::Configuration(
                "buffer_samples must be positive".to_string(),
            ));
        }
        if self.block_samples == 0 {
            return Err(VoiceError::Configuration(
                "block_samples must be positive".to_string(),
            ));
        }
        if self.expected_sample_rate == Some(0) {
            return Err(VoiceError::Configuration(
                "expected_sample_rate must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String, VoiceError> {
        toml::to_string(self).map_err(|e| VoiceError::Configuration(e.to_string()))
    }
}

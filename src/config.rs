//! Thresholds steering the search and the clustering.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Largest accepted [`Config::max_edit_size`].
///
/// Each edit contributes up to four candidate conditions, so a script of this length already has
/// `4^16` candidate explanations, the most whose count fits in a 64-bit `usize`.
pub const MAX_EDIT_SIZE_LIMIT: usize = 16;

/// Numeric knobs for synthesis and similarity gating.
///
/// The value is small and `Copy`; it is handed to every component that needs a threshold when
/// that component is built. The JSON form uses camelCase keys, and missing keys take their
/// default:
///
/// ```
/// let config = pbemine::Config::from_json(r#"{ "maxEditSize": 6 }"#).unwrap();
/// assert_eq!(config.max_edit_size, 6);
/// assert_eq!(config.max_example_distance, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Longest edit script the synthesizer will search explanations for, at most
    /// [`MAX_EDIT_SIZE_LIMIT`].
    pub max_edit_size: usize,
    /// A removed and an added line only pair up below this normalized distance.
    pub max_sample_distance: f64,
    /// Two examples are similar below this normalized distance.
    pub max_example_distance: f64,
    /// An example only continues a problem below this distance from the problem's first example.
    pub max_program_distance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_edit_size: 10,
            max_sample_distance: 0.5,
            max_example_distance: 0.5,
            max_program_distance: 0.5,
        }
    }
}

impl Config {
    /// Parses and validates a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Checks that every distance threshold is a finite, non-negative number and that the edit
    /// size is within [`MAX_EDIT_SIZE_LIMIT`].
    pub fn validate(&self) -> Result<()> {
        if self.max_edit_size > MAX_EDIT_SIZE_LIMIT {
            return Err(Error::InvalidConfig(format!(
                "maxEditSize must be at most {}, got {}",
                MAX_EDIT_SIZE_LIMIT, self.max_edit_size
            )));
        }
        let thresholds = [
            ("maxSampleDistance", self.max_sample_distance),
            ("maxExampleDistance", self.max_example_distance),
            ("maxProgramDistance", self.max_program_distance),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

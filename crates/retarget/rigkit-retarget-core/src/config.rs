//! Session configuration supplied by the external driver.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which detection stream this session retargets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionTarget {
    Hand,
    Pose,
    Face,
}

pub const KEY_STEP_MIN: u8 = 1;
pub const KEY_STEP_MAX: u8 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("key_step {0} outside [{KEY_STEP_MIN}, {KEY_STEP_MAX}]")]
    KeyStepOutOfRange(u8),
}

/// Validated session configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Frame increment per detection cycle; scales frame numbers into
    /// keyframe numbers for the host.
    pub key_step: u8,
    pub target: DetectionTarget,
}

impl Config {
    pub fn new(target: DetectionTarget, key_step: u8) -> Result<Self, ConfigError> {
        if !(KEY_STEP_MIN..=KEY_STEP_MAX).contains(&key_step) {
            return Err(ConfigError::KeyStepOutOfRange(key_step));
        }
        Ok(Self { key_step, target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_step_bounds() {
        assert!(Config::new(DetectionTarget::Hand, 1).is_ok());
        assert!(Config::new(DetectionTarget::Hand, 12).is_ok());
        assert_eq!(
            Config::new(DetectionTarget::Hand, 0),
            Err(ConfigError::KeyStepOutOfRange(0))
        );
        assert_eq!(
            Config::new(DetectionTarget::Hand, 13),
            Err(ConfigError::KeyStepOutOfRange(13))
        );
    }
}

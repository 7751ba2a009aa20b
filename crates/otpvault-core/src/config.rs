//! Generator parameters.
//!
//! Period, digit count, and algorithm are plain fields passed at
//! construction. All fields have defaults, so a partial JSON object such
//! as `{"digits": 8}` deserializes to a complete config.

use serde::{Deserialize, Serialize};

use crate::error::OtpError;
use crate::totp::{OtpAlgorithm, OtpDigits, DEFAULT_PERIOD};

/// TOTP parameters for one generator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OtpConfig {
    /// Time step in seconds. Must be non-zero.
    #[serde(default = "default_period")]
    pub period: u32,

    /// Output digit count.
    #[serde(default)]
    pub digits: OtpDigits,

    /// HMAC algorithm.
    #[serde(default)]
    pub algorithm: OtpAlgorithm,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            period: default_period(),
            digits: OtpDigits::default(),
            algorithm: OtpAlgorithm::default(),
        }
    }
}

const fn default_period() -> u32 {
    DEFAULT_PERIOD
}

impl OtpConfig {
    /// Check that the config can drive a generator.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::InvalidConfig` if `period` is 0.
    pub fn validate(&self) -> Result<(), OtpError> {
        if self.period == 0 {
            return Err(OtpError::InvalidConfig("period must be > 0".to_owned()));
        }
        Ok(())
    }
}

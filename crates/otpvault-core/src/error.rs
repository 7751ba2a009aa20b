//! Error types for `otpvault-core`.
//!
//! Every variant describes bad user input. None of them carries secret
//! material: messages name the offending character or parameter, never the
//! secret text itself.

use thiserror::Error;

/// Errors produced by the OTP engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpError {
    /// Malformed Base32 text, or a secret that decodes to zero bytes.
    #[error("invalid Base32 encoding: {0}")]
    InvalidEncoding(String),

    /// Malformed provisioning URI, wrong scheme, or wrong OTP type.
    #[error("invalid provisioning URI: {0}")]
    InvalidUri(String),

    /// User input rejected by the validation gate.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unusable generator parameters (zero period, unsupported digit count).
    #[error("invalid OTP configuration: {0}")]
    InvalidConfig(String),
}

/// Rejection reported by [`crate::validation::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {reason}")]
pub struct ValidationError {
    /// Why the input was rejected.
    pub reason: ValidationReason,
}

impl ValidationError {
    /// Wrap a reason.
    #[must_use]
    pub const fn new(reason: ValidationReason) -> Self {
        Self { reason }
    }
}

impl From<ValidationReason> for ValidationError {
    fn from(reason: ValidationReason) -> Self {
        Self::new(reason)
    }
}

/// The specific cause of a [`ValidationError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationReason {
    /// The account name is empty or whitespace.
    #[error("account name must not be empty")]
    EmptyName,

    /// The secret text is empty or whitespace.
    #[error("secret must not be empty")]
    EmptySecret,

    /// The secret text could not be turned into a generator.
    #[error("key format error: {0}")]
    InvalidEncoding(String),
}

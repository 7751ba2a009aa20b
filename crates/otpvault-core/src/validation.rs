//! Pre-persist check for a new account entry.
//!
//! Check order is fixed: name, then secret presence, then a full generator
//! construction. A secret that decodes to zero bytes fails the construction
//! step, so it is reported as `InvalidEncoding`, not `EmptySecret`.

use crate::config::OtpConfig;
use crate::error::{ValidationError, ValidationReason};
use crate::totp::TotpGenerator;

/// Validate a `(name, secret_text)` pair with the default config.
///
/// # Errors
///
/// Returns a [`ValidationError`] whose reason is `EmptyName`, `EmptySecret`,
/// or `InvalidEncoding`.
pub fn validate(name: &str, secret_text: &str) -> Result<(), ValidationError> {
    validate_with_config(name, secret_text, &OtpConfig::default())
}

/// Validate a `(name, secret_text)` pair for a specific config.
///
/// # Errors
///
/// Same as [`validate`]; an unusable config is also reported as
/// `InvalidEncoding`.
pub fn validate_with_config(
    name: &str,
    secret_text: &str,
    config: &OtpConfig,
) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationReason::EmptyName.into());
    }
    if secret_text.trim().is_empty() {
        return Err(ValidationReason::EmptySecret.into());
    }

    TotpGenerator::with_config(secret_text, *config)
        .map(drop)
        .map_err(|e| ValidationReason::InvalidEncoding(e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(result: Result<(), ValidationError>) -> ValidationReason {
        result.expect_err("validation should fail").reason
    }

    #[test]
    fn accepts_valid_entry() {
        assert!(validate("Example", "JBSWY3DPEHPK3PXP").is_ok());
        assert!(validate("Example", "jbsw y3dp ehpk 3pxp").is_ok());
    }

    #[test]
    fn empty_name_rejected_first() {
        assert_eq!(reason(validate("", "")), ValidationReason::EmptyName);
        assert_eq!(reason(validate("   ", "JBSWY3DPEHPK3PXP")), ValidationReason::EmptyName);
    }

    #[test]
    fn empty_secret_rejected_before_decode() {
        assert_eq!(reason(validate("Example", "")), ValidationReason::EmptySecret);
        assert_eq!(reason(validate("Example", " \t ")), ValidationReason::EmptySecret);
    }

    #[test]
    fn malformed_secret_is_invalid_encoding() {
        let reason = reason(validate("Example", "1"));
        assert!(
            matches!(reason, ValidationReason::InvalidEncoding(_)),
            "got: {reason:?}"
        );
    }

    #[test]
    fn zero_byte_secret_is_invalid_encoding() {
        // Decodes cleanly but to nothing: same path as a malformed secret.
        for text in ["====", "A"] {
            let reason = reason(validate("Example", text));
            assert!(
                matches!(reason, ValidationReason::InvalidEncoding(_)),
                "{text:?} got: {reason:?}"
            );
        }
    }

    #[test]
    fn zero_period_config_rejected() {
        let config = OtpConfig {
            period: 0,
            ..OtpConfig::default()
        };
        let reason = reason(validate_with_config("Example", "JBSWY3DPEHPK3PXP", &config));
        assert!(matches!(reason, ValidationReason::InvalidEncoding(_)));
    }

    #[test]
    fn error_message_names_reason() {
        let err = validate("Example", "").unwrap_err();
        assert_eq!(err.to_string(), "validation failed: secret must not be empty");
    }
}

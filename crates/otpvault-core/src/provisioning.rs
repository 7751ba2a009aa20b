//! Routing of pasted account input before it reaches the validation gate.
//!
//! Text starting with `otpauth://` is parsed as a provisioning URI; any
//! other text is taken as a bare Base32 secret with default parameters.

use std::fmt;

use crate::config::OtpConfig;
use crate::error::{OtpError, ValidationError, ValidationReason};
use crate::uri::ProvisioningUri;
use crate::validation;

/// URI prefix that selects the provisioning URI path (matched case-insensitively).
const URI_PREFIX: &str = "otpauth://";

/// A secret candidate extracted from pasted text, ready for validation.
#[derive(Clone, PartialEq, Eq)]
pub struct ImportCandidate {
    /// Account name suggested by a URI label, if any.
    pub suggested_name: Option<String>,
    /// Issuer resolved from the URI, if any.
    pub issuer: Option<String>,
    /// Base32 secret text.
    pub secret_text: String,
    /// Generator parameters (defaults for bare secrets).
    pub config: OtpConfig,
}

// Safety: contains the secret text. Never print it.
impl fmt::Debug for ImportCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportCandidate")
            .field("suggested_name", &self.suggested_name)
            .field("issuer", &self.issuer)
            .field("secret_text", &"***")
            .field("config", &self.config)
            .finish()
    }
}

impl ImportCandidate {
    /// Run the validation gate on this candidate under `name`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`]; see [`validation::validate`].
    pub fn validate(&self, name: &str) -> Result<(), ValidationError> {
        validation::validate_with_config(name, &self.secret_text, &self.config)
    }
}

/// Resolve pasted text into an import candidate.
///
/// # Errors
///
/// - `OtpError::InvalidUri` if the text looks like a provisioning URI but
///   does not parse, or carries unsupported parameters.
/// - `OtpError::Validation` with reason `EmptySecret` if the URI has no
///   `secret` parameter, or the text is empty.
pub fn resolve_input(text: &str) -> Result<ImportCandidate, OtpError> {
    let trimmed = text.trim();

    let is_uri = trimmed
        .get(..URI_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(URI_PREFIX));
    if !is_uri {
        if trimmed.is_empty() {
            return Err(ValidationError::new(ValidationReason::EmptySecret).into());
        }
        return Ok(ImportCandidate {
            suggested_name: None,
            issuer: None,
            secret_text: trimmed.to_owned(),
            config: OtpConfig::default(),
        });
    }

    let uri = ProvisioningUri::parse(trimmed)?;
    let config = uri.config()?;
    let (account, issuer) = uri.account_and_issuer();
    let secret_text = uri
        .secret
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ValidationError::new(ValidationReason::EmptySecret))?;

    Ok(ImportCandidate {
        suggested_name: (!account.is_empty()).then_some(account),
        issuer,
        secret_text,
        config,
    })
}

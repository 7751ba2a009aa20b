//! Command implementations.
//!
//! Each command returns a DTO with `#[serde(rename_all = "camelCase")]`
//! for `--json` output, plus a plain-text rendering. No DTO ever carries
//! secret text.

use std::time::SystemTime;

use otpvault_core::{
    render_entries, resolve_input, OtpConfig, OtpError, ProvisioningUri, TotpGenerator,
};
use serde::Serialize;
use thiserror::Error;

use crate::accounts::Accounts;

/// Failure of a command that looks up a stored account.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No account with this name in the account file.
    #[error("no account named {0:?}")]
    UnknownAccount(String),

    /// The stored entry or the configured parameters are unusable.
    #[error(transparent)]
    Otp(#[from] OtpError),
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// One rendered account line.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CodeLineDto {
    /// Account name.
    pub name: String,
    /// Current code, absent on failure.
    pub code: Option<String>,
    /// Seconds until `code` expires, absent on failure.
    pub seconds_remaining: Option<u32>,
    /// Failure reason, absent on success.
    pub error: Option<String>,
}

impl CodeLineDto {
    /// Plain-text line: `name  code  (Ns)` or `name  key format error: ...`.
    #[must_use]
    pub fn to_line(&self) -> String {
        match (&self.code, self.seconds_remaining, &self.error) {
            (Some(code), Some(remaining), _) => format!("{}  {code}  ({remaining}s)", self.name),
            (_, _, Some(error)) => format!("{}  key format error: {error}", self.name),
            _ => format!("{}  unavailable", self.name),
        }
    }
}

/// Outcome of `check`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckResultDto {
    /// Whether the entry would be accepted.
    pub ok: bool,
    /// Account name checked.
    pub name: String,
    /// Issuer resolved from a provisioning URI, if any.
    pub issuer: Option<String>,
    /// Rejection reason, absent when `ok`.
    pub reason: Option<String>,
}

impl CheckResultDto {
    /// Plain-text rendering.
    #[must_use]
    pub fn to_line(&self) -> String {
        match &self.reason {
            None => "ok".to_owned(),
            Some(reason) => format!("rejected: {reason}"),
        }
    }
}

/// Outcome of `verify`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResultDto {
    /// Account name checked.
    pub name: String,
    /// Whether the code matches the current step or a neighbour.
    pub valid: bool,
}

impl VerifyResultDto {
    /// Plain-text rendering.
    #[must_use]
    pub const fn to_line(&self) -> &'static str {
        if self.valid {
            "valid"
        } else {
            "invalid"
        }
    }
}

/// Display-safe summary of a provisioning URI.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UriSummaryDto {
    /// Full decoded label.
    pub label: String,
    /// Account name after issuer resolution.
    pub account: String,
    /// Resolved issuer.
    pub issuer: Option<String>,
    /// Whether a `secret` parameter is present.
    pub has_secret: bool,
    /// Effective parameters.
    pub config: OtpConfig,
}

impl UriSummaryDto {
    /// Plain-text rendering, one field per line.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        vec![
            format!("label:   {}", self.label),
            format!("account: {}", self.account),
            format!("issuer:  {}", self.issuer.as_deref().unwrap_or("-")),
            format!("secret:  {}", if self.has_secret { "present" } else { "missing" }),
            format!(
                "params:  {} / {} digits / {}s",
                self.config.algorithm.name(),
                self.config.digits.value(),
                self.config.period
            ),
        ]
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Render the current code for every stored account.
#[must_use]
pub fn codes(accounts: &Accounts, config: &OtpConfig, now: SystemTime) -> Vec<CodeLineDto> {
    render_entries(accounts.iter(), config, now)
        .into_iter()
        .map(|rendered| match rendered.result {
            Ok(entry) => CodeLineDto {
                name: rendered.name,
                code: Some(entry.code),
                seconds_remaining: Some(entry.seconds_remaining),
                error: None,
            },
            Err(e) => CodeLineDto {
                name: rendered.name,
                code: None,
                seconds_remaining: None,
                error: Some(e.to_string()),
            },
        })
        .collect()
}

/// Resolve pasted input and run the validation gate under `name`.
#[must_use]
pub fn check(name: &str, input: &str) -> CheckResultDto {
    let outcome = resolve_input(input).and_then(|candidate| {
        candidate.validate(name)?;
        Ok(candidate.issuer)
    });
    match outcome {
        Ok(issuer) => CheckResultDto {
            ok: true,
            name: name.to_owned(),
            issuer,
            reason: None,
        },
        Err(e) => {
            tracing::info!(name, error = %e, "entry rejected");
            CheckResultDto {
                ok: false,
                name: name.to_owned(),
                issuer: None,
                reason: Some(e.to_string()),
            }
        }
    }
}

/// Check `code` for the stored account `name` at `now`.
///
/// # Errors
///
/// Returns `CommandError::UnknownAccount` if `name` is not stored, or
/// `CommandError::Otp` if its secret or `config` is unusable.
pub fn verify(
    accounts: &Accounts,
    name: &str,
    code: &str,
    config: &OtpConfig,
    now: SystemTime,
) -> Result<VerifyResultDto, CommandError> {
    let secret_text = accounts
        .get(name)
        .ok_or_else(|| CommandError::UnknownAccount(name.to_owned()))?;
    let generator = TotpGenerator::with_config(secret_text, *config)?;
    let valid = generator.verify(code.trim(), now);
    tracing::debug!(name, valid, "code checked");
    Ok(VerifyResultDto {
        name: name.to_owned(),
        valid,
    })
}

/// Parse a provisioning URI into a display-safe summary.
///
/// # Errors
///
/// Returns `OtpError::InvalidUri` if the URI or its parameters are invalid.
pub fn parse_uri(uri: &str) -> Result<UriSummaryDto, OtpError> {
    let parsed = ProvisioningUri::parse(uri)?;
    let config = parsed.config()?;
    let (account, issuer) = parsed.account_and_issuer();
    Ok(UriSummaryDto {
        label: parsed.label.clone(),
        account,
        issuer,
        has_secret: parsed.secret.is_some(),
        config,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

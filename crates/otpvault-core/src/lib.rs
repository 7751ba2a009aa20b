//! `otpvault-core`: one-time password engine for otpvault.
//!
//! Base32 secret decoding, RFC 6238 TOTP generation, `otpauth://` URI
//! parsing, and the validation gate used before an account is stored.
//! Zero I/O, zero async: every operation is a pure in-memory computation,
//! and the current time is always passed in by the caller.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod base32;
pub mod config;
pub mod error;
pub mod provisioning;
pub mod render;
pub mod secret;
pub mod totp;
pub mod uri;
pub mod validation;

pub use config::OtpConfig;
pub use error::{OtpError, ValidationError, ValidationReason};
pub use provisioning::{resolve_input, ImportCandidate};
pub use render::{render_entries, render_entry, EntryCode, RenderedEntry};
pub use secret::OtpSecret;
pub use totp::{
    generate_totp, OtpAlgorithm, OtpDigits, TotpGenerator, DEFAULT_PERIOD, TOTP_WINDOW,
};
pub use uri::ProvisioningUri;
pub use validation::{validate, validate_with_config};

//! RFC 6238 TOTP generation engine.
//!
//! The counter is derived from wall-clock time, run through RFC 4226 HMAC
//! dynamic truncation using `ring::hmac`, and formatted as a fixed-width
//! decimal code. [`TotpGenerator`] owns one decoded secret plus its
//! [`OtpConfig`]; once constructed it cannot fail.

use std::time::{SystemTime, UNIX_EPOCH};

use ring::hmac;
use serde::{Deserialize, Serialize};

use crate::config::OtpConfig;
use crate::error::OtpError;
use crate::secret::OtpSecret;

/// Constant-time byte comparison for OTP codes.
///
/// Returns `true` iff both slices have equal length and identical contents.
/// Uses bitwise OR accumulation to avoid short-circuit timing leaks.
///
/// The early return on length mismatch is acceptable: the expected digit
/// count is public. The constant-time property protects the code value.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

// ── Constants ───────────────────────────────────────────────────────

/// Default TOTP period in seconds (RFC 6238 §4).
pub const DEFAULT_PERIOD: u32 = 30;

/// Time-step window for TOTP verification (±1 step per RFC 6238 §5.2).
pub const TOTP_WINDOW: u32 = 1;

// ── Types ───────────────────────────────────────────────────────────

/// HMAC algorithm used for OTP generation.
///
/// Only HMAC-SHA1 is supported: it is what deployed authenticator apps
/// default to and what `otpauth://` URIs imply when `algorithm` is absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtpAlgorithm {
    /// HMAC-SHA1.
    #[default]
    #[serde(rename = "SHA1")]
    Sha1,
}

impl OtpAlgorithm {
    /// Canonical name as used in `otpauth://` URIs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
        }
    }

    /// Parse an algorithm name (case-insensitive, `SHA-1` accepted).
    ///
    /// # Errors
    /// Returns `OtpError::InvalidConfig` for any other algorithm.
    pub fn from_name(name: &str) -> Result<Self, OtpError> {
        match name.to_ascii_uppercase().as_str() {
            "SHA1" | "SHA-1" => Ok(Self::Sha1),
            other => Err(OtpError::InvalidConfig(format!(
                "unsupported algorithm: {other} (expected SHA1)"
            ))),
        }
    }

    /// Map to the corresponding `ring::hmac::Algorithm`.
    const fn to_ring_algorithm(self) -> hmac::Algorithm {
        match self {
            Self::Sha1 => hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
        }
    }
}

/// Number of digits in an OTP code (6 or 8 only).
///
/// Serialized as the plain integer `6` or `8`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OtpDigits {
    /// 6-digit code (standard).
    #[default]
    Six,
    /// 8-digit code.
    Eight,
}

impl OtpDigits {
    /// Return the numeric digit count.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Six => 6,
            Self::Eight => 8,
        }
    }

    /// Return the modulus value (10^digits) for truncation.
    #[must_use]
    const fn modulus(self) -> u32 {
        match self {
            Self::Six => 1_000_000,
            Self::Eight => 100_000_000,
        }
    }
}

impl TryFrom<u8> for OtpDigits {
    type Error = OtpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            6 => Ok(Self::Six),
            8 => Ok(Self::Eight),
            other => Err(OtpError::InvalidConfig(format!(
                "unsupported digit count: {other} (expected 6 or 8)"
            ))),
        }
    }
}

impl From<OtpDigits> for u8 {
    fn from(digits: OtpDigits) -> Self {
        digits.value()
    }
}

// ── Generator ───────────────────────────────────────────────────────

/// TOTP code generator for a single account.
///
/// Construction decodes and validates the secret; every later call is a
/// pure function of the secret, the config, and the time passed in.
#[derive(Debug)]
pub struct TotpGenerator {
    secret: OtpSecret,
    config: OtpConfig,
}

impl TotpGenerator {
    /// Build a generator with the default config (30 s, 6 digits, SHA1).
    ///
    /// # Errors
    /// Returns `OtpError::InvalidEncoding` if `secret_text` is not valid
    /// Base32 or decodes to zero bytes.
    pub fn new(secret_text: &str) -> Result<Self, OtpError> {
        Self::with_config(secret_text, OtpConfig::default())
    }

    /// Build a generator with an explicit config.
    ///
    /// # Errors
    /// Returns `OtpError::InvalidConfig` if the config is unusable, or
    /// `OtpError::InvalidEncoding` if the secret text cannot be decoded.
    pub fn with_config(secret_text: &str, config: OtpConfig) -> Result<Self, OtpError> {
        config.validate()?;
        let secret = OtpSecret::from_base32(secret_text)?;
        tracing::debug!(
            key_len = secret.len(),
            period = config.period,
            digits = config.digits.value(),
            "TOTP generator constructed"
        );
        Ok(Self { secret, config })
    }

    /// Build a generator from already-decoded key material.
    ///
    /// # Errors
    /// Returns `OtpError::InvalidConfig` if the config is unusable.
    pub fn from_secret(secret: OtpSecret, config: OtpConfig) -> Result<Self, OtpError> {
        config.validate()?;
        Ok(Self { secret, config })
    }

    /// The parameters this generator was built with.
    #[must_use]
    pub const fn config(&self) -> &OtpConfig {
        &self.config
    }

    /// Time step counter for `now`: `floor(unix_seconds / period)`.
    #[must_use]
    pub fn counter_at(&self, now: SystemTime) -> u64 {
        time_step(unix_seconds(now), self.config.period)
    }

    /// Current code for `now`.
    #[must_use = "OTP code should be used or displayed"]
    pub fn generate(&self, now: SystemTime) -> String {
        self.generate_at(unix_seconds(now))
    }

    /// Code for a Unix timestamp in seconds.
    #[must_use = "OTP code should be used or displayed"]
    pub fn generate_at(&self, unix_seconds: u64) -> String {
        self.code_for_counter(time_step(unix_seconds, self.config.period))
    }

    /// Code for an explicit time step counter.
    #[must_use = "OTP code should be used or displayed"]
    pub fn code_for_counter(&self, counter: u64) -> String {
        hotp_code(
            self.secret.expose(),
            counter,
            self.config.digits,
            self.config.algorithm,
        )
    }

    /// Seconds until the current code expires, in `1..=period`.
    #[must_use]
    pub fn seconds_remaining(&self, now: SystemTime) -> u32 {
        let period = self.config.period;
        // period is validated non-zero at construction.
        #[allow(clippy::arithmetic_side_effects)]
        let elapsed = unix_seconds(now) % u64::from(period);
        u32::try_from(elapsed).map_or(period, |elapsed| period.saturating_sub(elapsed))
    }

    /// Check `code` against the steps T-1, T and T+1 around `now`.
    #[must_use = "verification result should be checked"]
    pub fn verify(&self, code: &str, now: SystemTime) -> bool {
        window_matches(
            self.secret.expose(),
            self.counter_at(now),
            code,
            self.config.digits,
            self.config.algorithm,
        )
    }
}

// ── Free functions on raw key bytes ────────────────────────────────

/// Generate a TOTP code per RFC 6238 from raw key bytes.
///
/// # Arguments
/// - `secret`: Shared secret key bytes
/// - `time`: Unix timestamp in seconds
/// - `digits`: Number of output digits (6 or 8)
/// - `period`: Time step in seconds (typically 30)
/// - `algorithm`: HMAC algorithm to use
///
/// # Errors
/// Returns `OtpError::InvalidConfig` if `period` is 0, or
/// `OtpError::InvalidEncoding` if `secret` is empty.
#[must_use = "OTP code should be used or stored"]
pub fn generate_totp(
    secret: &[u8],
    time: u64,
    digits: OtpDigits,
    period: u32,
    algorithm: OtpAlgorithm,
) -> Result<String, OtpError> {
    check_inputs(secret, period)?;
    Ok(hotp_code(secret, time_step(time, period), digits, algorithm))
}

// ── Internals ───────────────────────────────────────────────────────

fn check_inputs(secret: &[u8], period: u32) -> Result<(), OtpError> {
    if secret.is_empty() {
        return Err(OtpError::InvalidEncoding(
            "secret must not be empty".to_owned(),
        ));
    }
    if period == 0 {
        return Err(OtpError::InvalidConfig("period must be > 0".to_owned()));
    }
    Ok(())
}

/// Seconds since the Unix epoch; instants before the epoch clamp to 0.
fn unix_seconds(now: SystemTime) -> u64 {
    now.duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

/// T = floor(time / period) per RFC 6238 §4. Callers guarantee `period > 0`.
fn time_step(time: u64, period: u32) -> u64 {
    #[allow(clippy::arithmetic_side_effects)]
    let step = time / u64::from(period.max(1));
    step
}

/// RFC 4226 HOTP value for one counter.
fn hotp_code(secret: &[u8], counter: u64, digits: OtpDigits, algorithm: OtpAlgorithm) -> String {
    // HMAC(K, C) where C is counter as 8-byte big-endian (RFC 4226 §5.2).
    let key = hmac::Key::new(algorithm.to_ring_algorithm(), secret);
    let counter_bytes = counter.to_be_bytes();
    let tag = hmac::sign(&key, &counter_bytes);
    let hmac_result = tag.as_ref();

    // Dynamic Truncation (RFC 4226 §5.3).
    // offset = low-order 4 bits of last byte.
    let offset = usize::from(hmac_result[hmac_result.len().wrapping_sub(1)] & 0x0F);

    // Extract 4 bytes starting at offset, mask high bit (0x7FFFFFFF).
    let binary_code = u32::from_be_bytes([
        hmac_result[offset] & 0x7F,
        hmac_result[offset.wrapping_add(1)],
        hmac_result[offset.wrapping_add(2)],
        hmac_result[offset.wrapping_add(3)],
    ]);

    // modulus is always 1_000_000 or 100_000_000 (never zero).
    #[allow(clippy::arithmetic_side_effects)]
    let code = binary_code % digits.modulus();
    let width = usize::from(digits.value());

    format!("{code:0>width$}")
}

fn window_matches(
    secret: &[u8],
    time_step: u64,
    code: &str,
    digits: OtpDigits,
    algorithm: OtpAlgorithm,
) -> bool {
    // Saturating bounds: at time_step=0 the window starts at 0, not u64::MAX.
    let start = time_step.saturating_sub(u64::from(TOTP_WINDOW));
    let end = time_step.saturating_add(u64::from(TOTP_WINDOW));

    // Every step in the window is checked, even after a match.
    let mut valid = false;
    let mut step = start;
    loop {
        let expected = hotp_code(secret, step, digits, algorithm);
        if constant_time_eq(expected.as_bytes(), code.as_bytes()) {
            valid = true;
        }
        if step == end {
            break;
        }
        step = step.wrapping_add(1);
    }
    valid
}

// ── Tests ───────────────────────────────────────────────────────────

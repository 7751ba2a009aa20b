//! Shared-secret key material for one generator.
//!
//! [`OtpSecret`] wraps [`SecretSlice<u8>`] from the `secrecy` crate:
//! - zeroized on drop
//! - masked `Debug` output (`OtpSecret(***)`)
//! - never empty
//!
//! It is deliberately not `Clone`: each generator owns its key exclusively.

use std::fmt;

use secrecy::{ExposeSecret, SecretSlice};
use zeroize::Zeroize;

use crate::base32;
use crate::error::OtpError;

/// Raw HMAC key bytes decoded from an account's Base32 secret.
pub struct OtpSecret {
    inner: SecretSlice<u8>,
}

impl OtpSecret {
    /// Copy `bytes` into a new secret.
    ///
    /// The caller should zeroize the source after calling this.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::InvalidEncoding` if `bytes` is empty.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, OtpError> {
        if bytes.is_empty() {
            return Err(OtpError::InvalidEncoding(
                "secret decodes to zero bytes".to_owned(),
            ));
        }
        Ok(Self {
            inner: bytes.to_vec().into(),
        })
    }

    /// Decode a Base32 secret text.
    ///
    /// The intermediate decode buffer is zeroized before returning.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::InvalidEncoding` if the text is not valid Base32
    /// or decodes to zero bytes.
    pub fn from_base32(text: &str) -> Result<Self, OtpError> {
        let mut bytes = base32::decode(text)?;
        let result = Self::from_bytes(&bytes);
        bytes.zeroize();
        result
    }

    /// Expose the key bytes for HMAC computation.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    /// Number of key bytes (always ≥ 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.expose_secret().is_empty()
    }
}

impl fmt::Debug for OtpSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpSecret(***)")
    }
}

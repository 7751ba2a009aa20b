//! Read-only account file: a JSON object mapping account name to Base32
//! secret text, e.g. `{"GitHub": "JBSWY3DPEHPK3PXP"}`.
//!
//! JSON object keys are unique per name after parsing, and entries are
//! iterated in name order. Secret strings are zeroized on drop.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use zeroize::Zeroize;

/// Failure to load an account file.
#[derive(Debug, Error)]
pub enum AccountsError {
    /// The file could not be read.
    #[error("cannot read accounts {path}: {source}")]
    Read {
        /// Account file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The file is not a JSON object of strings.
    #[error("invalid accounts file {path}: {source}")]
    Parse {
        /// Account file path.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}

/// Stored `name → secret_text` pairs.
pub struct Accounts {
    entries: BTreeMap<String, String>,
}

impl Accounts {
    /// Load accounts from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`AccountsError`] if the file is unreadable or malformed.
    pub fn load(path: &Path) -> Result<Self, AccountsError> {
        let mut contents = fs::read_to_string(path).map_err(|source| AccountsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = Self::from_json(&contents).map_err(|source| AccountsError::Parse {
            path: path.to_path_buf(),
            source,
        });
        contents.zeroize();
        let accounts = parsed?;
        tracing::debug!(count = accounts.len(), "loaded account file");
        Ok(accounts)
    }

    /// Parse accounts from JSON text.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the text is not a JSON object of
    /// strings.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: BTreeMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// `(name, secret_text)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, secret)| (name.as_str(), secret.as_str()))
    }

    /// Secret text stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Number of stored accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the file held no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for Accounts {
    fn drop(&mut self) {
        for secret in self.entries.values_mut() {
            secret.zeroize();
        }
    }
}

// Safety: Accounts contains secret text. Never log or print it.
impl fmt::Debug for Accounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accounts")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

//! Non-sensitive CLI settings, stored as plain JSON.
//!
//! A missing file means defaults. A corrupt file is reported to the caller,
//! which falls back to defaults after logging is up.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use otpvault_core::OtpConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to read an existing settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file exists but could not be read.
    #[error("cannot read settings {path}: {source}")]
    Read {
        /// Settings file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The file is not valid settings JSON.
    #[error("corrupt settings {path}: {source}")]
    Corrupt {
        /// Settings file path.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}

/// CLI settings. All fields have defaults via [`Default`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Generator parameters applied to every stored account.
    #[serde(default)]
    pub otp: OtpConfig,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            otp: OtpConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "warn".into()
}

impl Settings {
    /// Load settings from `path`.
    ///
    /// Returns [`Default::default()`] when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&contents).map_err(|source| SettingsError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }
}

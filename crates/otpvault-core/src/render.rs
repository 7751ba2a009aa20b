//! Per-render code computation for stored account entries.
//!
//! Each call rebuilds the generator from the stored secret text; nothing is
//! cached between renders. A failing entry is returned with its error so
//! the display layer can show the reason instead of dropping the entry.

use std::time::SystemTime;

use crate::config::OtpConfig;
use crate::error::OtpError;
use crate::totp::TotpGenerator;

/// Current code for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCode {
    /// Account name as stored.
    pub name: String,
    /// Zero-padded decimal code.
    pub code: String,
    /// Seconds until `code` expires, in `1..=period`.
    pub seconds_remaining: u32,
    /// Step period the code was computed with.
    pub period: u32,
}

/// Outcome of rendering one stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEntry {
    /// Account name as stored.
    pub name: String,
    /// The code, or why it could not be produced.
    pub result: Result<EntryCode, OtpError>,
}

/// Compute the current code for one stored entry.
///
/// # Errors
///
/// Returns `OtpError::InvalidEncoding` if the stored secret text is not
/// usable, or `OtpError::InvalidConfig` if `config` is unusable.
pub fn render_entry(
    name: &str,
    secret_text: &str,
    config: &OtpConfig,
    now: SystemTime,
) -> Result<EntryCode, OtpError> {
    let generator = TotpGenerator::with_config(secret_text, *config)?;
    Ok(EntryCode {
        name: name.to_owned(),
        code: generator.generate(now),
        seconds_remaining: generator.seconds_remaining(now),
        period: config.period,
    })
}

/// Render every entry, keeping input order and failed entries.
pub fn render_entries<'a, I>(entries: I, config: &OtpConfig, now: SystemTime) -> Vec<RenderedEntry>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    entries
        .into_iter()
        .map(|(name, secret_text)| {
            let result = render_entry(name, secret_text, config, now);
            if let Err(ref e) = result {
                tracing::warn!(entry = %name, error = %e, "failed to render OTP entry");
            }
            RenderedEntry {
                name: name.to_owned(),
                result,
            }
        })
        .collect()
}

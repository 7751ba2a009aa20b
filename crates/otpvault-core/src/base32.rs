//! RFC 4648 Base32 decoding for authenticator secrets.
//!
//! Decoding is lenient about presentation and strict about content:
//! - whitespace anywhere is removed
//! - lowercase letters are accepted (ASCII-uppercased first)
//! - trailing `=` padding is stripped
//! - leftover bits (< 8) after the last full byte are discarded
//!
//! Any other symbol fails the whole decode.

use crate::error::OtpError;

/// Decode Base32 secret text into raw key bytes.
///
/// An input that is empty after normalization decodes to zero bytes;
/// rejecting an empty key is the generator's job.
///
/// # Errors
///
/// Returns `OtpError::InvalidEncoding` on the first symbol outside the
/// alphabet, including `=` anywhere but the trailing padding run.
pub fn decode(text: &str) -> Result<Vec<u8>, OtpError> {
    let normalized = normalize(text);

    let mut buffer: u32 = 0;
    let mut bits_in_buffer: u32 = 0;
    // 5 bits per symbol, 8 bits per byte.
    let mut result = Vec::with_capacity(normalized.len().saturating_mul(5) / 8);

    for (position, ch) in normalized.chars().enumerate() {
        let value = symbol_value(ch).ok_or_else(|| {
            OtpError::InvalidEncoding(format!(
                "invalid character {ch:?} at position {position}"
            ))
        })?;
        // Keep at most 7 pending bits before shifting in the next 5.
        buffer = ((buffer << 5) | u32::from(value)) & 0xFFF;
        bits_in_buffer = bits_in_buffer.saturating_add(5);

        if bits_in_buffer >= 8 {
            bits_in_buffer = bits_in_buffer.saturating_sub(8);
            let byte = ((buffer >> bits_in_buffer) & 0xFF) as u8;
            result.push(byte);
        }
    }

    Ok(result)
}

/// Remove whitespace, uppercase ASCII letters, strip trailing `=`.
fn normalize(text: &str) -> String {
    let mut normalized: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let unpadded_len = normalized.trim_end_matches('=').len();
    normalized.truncate(unpadded_len);
    normalized
}

/// Numeric value (0..32) of an uppercase alphabet symbol.
fn symbol_value(ch: char) -> Option<u8> {
    match ch {
        'A'..='Z' => u8::try_from(ch).ok().map(|b| b.wrapping_sub(b'A')),
        '2'..='7' => u8::try_from(ch).ok().map(|b| b.wrapping_sub(b'2').wrapping_add(26)),
        _ => None,
    }
}

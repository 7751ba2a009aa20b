//! `otpauth://totp/...` provisioning URI parsing.
//!
//! URI format (Key Uri Format used by authenticator apps):
//! `otpauth://totp/<label>?secret=<base32>&issuer=<issuer>&algorithm=SHA1&digits=6&period=30`
//!
//! Parsing is structural: a URI without a `secret` parameter still parses.
//! Callers must reject a missing secret before building a generator.

use std::fmt;

use url::Url;

use crate::config::OtpConfig;
use crate::error::OtpError;
use crate::totp::{OtpAlgorithm, OtpDigits};

/// Required URI scheme.
const SCHEME: &str = "otpauth";

/// The only supported OTP type (the URI host component).
const OTP_TYPE: &str = "totp";

/// Components extracted from a provisioning URI.
///
/// Optional parameters are kept as the raw decoded text; [`Self::config`]
/// interprets them.
#[derive(Clone, PartialEq, Eq)]
pub struct ProvisioningUri {
    /// Percent-decoded path, e.g. `"Example:alice@site.com"`.
    pub label: String,
    /// The `issuer` query parameter, if present and non-empty.
    pub issuer: Option<String>,
    /// The `secret` query parameter (Base32 text), if present.
    pub secret: Option<String>,
    /// The `algorithm` query parameter, if present.
    pub algorithm: Option<String>,
    /// The `digits` query parameter, if present.
    pub digits: Option<String>,
    /// The `period` query parameter, if present.
    pub period: Option<String>,
}

// Safety: contains the secret text. Never print it.
impl fmt::Debug for ProvisioningUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisioningUri")
            .field("label", &self.label)
            .field("issuer", &self.issuer)
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .field("algorithm", &self.algorithm)
            .field("digits", &self.digits)
            .field("period", &self.period)
            .finish()
    }
}

impl ProvisioningUri {
    /// Parse a provisioning URI.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::InvalidUri` if the text is not a URI, the scheme
    /// is not `otpauth`, the type is not `totp`, or the label is not valid
    /// UTF-8 after percent-decoding.
    pub fn parse(uri: &str) -> Result<Self, OtpError> {
        let url = Url::parse(uri.trim())
            .map_err(|e| OtpError::InvalidUri(format!("unparseable URI: {e}")))?;

        if !url.scheme().eq_ignore_ascii_case(SCHEME) {
            return Err(OtpError::InvalidUri(format!(
                "expected scheme '{SCHEME}', got '{}'",
                url.scheme()
            )));
        }

        let otp_type = url
            .host_str()
            .ok_or_else(|| OtpError::InvalidUri("missing OTP type".to_owned()))?;
        if !otp_type.eq_ignore_ascii_case(OTP_TYPE) {
            return Err(OtpError::InvalidUri(format!(
                "unsupported OTP type '{otp_type}' (expected '{OTP_TYPE}')"
            )));
        }

        // `Url::path` has dot segments resolved; the label is taken verbatim.
        let label = urlencoding::decode(raw_label(uri.trim()))
            .map_err(|e| OtpError::InvalidUri(format!("label is not valid UTF-8: {e}")))?
            .into_owned();

        let mut parsed = Self {
            label,
            issuer: None,
            secret: None,
            algorithm: None,
            digits: None,
            period: None,
        };

        // First occurrence of each parameter wins.
        for (key, value) in url.query_pairs() {
            let slot = match key.to_ascii_lowercase().as_str() {
                "secret" => &mut parsed.secret,
                "issuer" => &mut parsed.issuer,
                "algorithm" => &mut parsed.algorithm,
                "digits" => &mut parsed.digits,
                "period" => &mut parsed.period,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        if parsed.issuer.as_deref().is_some_and(|i| i.trim().is_empty()) {
            parsed.issuer = None;
        }

        tracing::debug!(
            has_secret = parsed.secret.is_some(),
            has_issuer = parsed.issuer.is_some(),
            "parsed provisioning URI"
        );
        Ok(parsed)
    }

    /// Split the label into `(account, issuer)`.
    ///
    /// - An explicit `issuer` parameter wins; a matching `"<issuer>:"`
    ///   label prefix is stripped from the account.
    /// - Otherwise a label `"prefix:account"` yields issuer `prefix`.
    /// - Otherwise the whole label is the account and there is no issuer.
    #[must_use]
    pub fn account_and_issuer(&self) -> (String, Option<String>) {
        if let Some(issuer) = &self.issuer {
            let prefix = format!("{issuer}:");
            let account = self
                .label
                .strip_prefix(&prefix)
                .map_or_else(|| self.label.clone(), |rest| rest.trim().to_owned());
            return (account, Some(issuer.clone()));
        }

        if let Some((prefix, account)) = self.label.split_once(':') {
            let (prefix, account) = (prefix.trim(), account.trim());
            if !prefix.is_empty() && !account.is_empty() {
                return (account.to_owned(), Some(prefix.to_owned()));
            }
        }

        (self.label.clone(), None)
    }

    /// Interpret the optional `algorithm`, `digits`, and `period` parameters.
    ///
    /// Absent parameters take the standard defaults.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::InvalidUri` for an unsupported algorithm, a digit
    /// count other than 6 or 8, or a period that is not a positive integer.
    pub fn config(&self) -> Result<OtpConfig, OtpError> {
        let mut config = OtpConfig::default();

        if let Some(algorithm) = &self.algorithm {
            config.algorithm = OtpAlgorithm::from_name(algorithm.trim()).map_err(into_uri_error)?;
        }
        if let Some(digits) = &self.digits {
            let value: u8 = digits
                .trim()
                .parse()
                .map_err(|_| OtpError::InvalidUri(format!("digits is not a number: {digits}")))?;
            config.digits = OtpDigits::try_from(value).map_err(into_uri_error)?;
        }
        if let Some(period) = &self.period {
            config.period = period
                .trim()
                .parse()
                .map_err(|_| OtpError::InvalidUri(format!("period is not a number: {period}")))?;
        }

        config.validate().map_err(into_uri_error)?;
        Ok(config)
    }
}

/// Canonical URI text. Includes the secret: only use it for export.
impl fmt::Display for ProvisioningUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}://{OTP_TYPE}/{}", urlencoding::encode(&self.label))?;
        let params = [
            ("secret", &self.secret),
            ("issuer", &self.issuer),
            ("algorithm", &self.algorithm),
            ("digits", &self.digits),
            ("period", &self.period),
        ];
        let mut separator = '?';
        for (key, value) in params {
            if let Some(value) = value {
                write!(f, "{separator}{key}={}", urlencoding::encode(value))?;
                separator = '&';
            }
        }
        Ok(())
    }
}

/// Undecoded label text: everything after the OTP type segment, up to the
/// query or fragment.
fn raw_label(uri: &str) -> &str {
    let after_scheme = uri.split_once("://").map_or(uri, |(_, rest)| rest);
    let before_query = after_scheme.split(['?', '#']).next().unwrap_or_default();
    before_query.split_once('/').map_or("", |(_, label)| label)
}

fn into_uri_error(err: OtpError) -> OtpError {
    match err {
        OtpError::InvalidConfig(msg) => OtpError::InvalidUri(msg),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str =
        "otpauth://totp/Example:alice@site.com?secret=JBSWY3DPEHPK3PXP&issuer=Example";

    #[test]
    fn parses_standard_uri() {
        let uri = ProvisioningUri::parse(EXAMPLE).unwrap();
        assert_eq!(uri.label, "Example:alice@site.com");
        assert_eq!(uri.issuer.as_deref(), Some("Example"));
        assert_eq!(uri.secret.as_deref(), Some("JBSWY3DPEHPK3PXP"));
        assert!(uri.algorithm.is_none());
        assert!(uri.digits.is_none());
        assert!(uri.period.is_none());
    }

    #[test]
    fn rejects_wrong_scheme_or_type() {
        for input in [
            "hotp://totp/x?secret=ABC",
            "otpauth://hotp/x?secret=ABC",
            "https://totp/x?secret=ABC",
            "otpauth-migration://offline?data=abc",
        ] {
            let result = ProvisioningUri::parse(input);
            assert!(
                matches!(result, Err(OtpError::InvalidUri(_))),
                "{input:?} should be InvalidUri, got: {result:?}"
            );
        }
    }

    #[test]
    fn rejects_unparseable_text() {
        for input in ["", "not a uri", "JBSWY3DPEHPK3PXP", "otpauth:totp"] {
            let result = ProvisioningUri::parse(input);
            assert!(
                matches!(result, Err(OtpError::InvalidUri(_))),
                "{input:?} should be InvalidUri, got: {result:?}"
            );
        }
    }

    #[test]
    fn scheme_and_type_are_case_insensitive() {
        let uri = ProvisioningUri::parse("OTPAUTH://TOTP/acct?secret=JBSWY3DPEHPK3PXP").unwrap();
        assert_eq!(uri.label, "acct");
    }

    #[test]
    fn missing_secret_still_parses() {
        let uri = ProvisioningUri::parse("otpauth://totp/acct?issuer=Acme").unwrap();
        assert!(uri.secret.is_none());
        assert_eq!(uri.issuer.as_deref(), Some("Acme"));
    }

    #[test]
    fn label_is_percent_decoded() {
        let uri =
            ProvisioningUri::parse("otpauth://totp/ACME%20Co%3Ajohn%40example.com?secret=ABC")
                .unwrap();
        assert_eq!(uri.label, "ACME Co:john@example.com");
    }

    #[test]
    fn dot_segments_in_label_are_kept() {
        let escaped =
            ProvisioningUri::parse("otpauth://totp/%2E%2E?secret=JBSWY3DPEHPK3PXP").unwrap();
        assert_eq!(escaped.label, "..");

        let nested = ProvisioningUri::parse("otpauth://totp/Acme:a/../b?secret=X").unwrap();
        assert_eq!(nested.label, "Acme:a/../b");
        assert_eq!(
            nested.account_and_issuer(),
            ("a/../b".to_owned(), Some("Acme".to_owned()))
        );
    }

    #[test]
    fn label_stops_at_query_or_fragment() {
        let uri = ProvisioningUri::parse("otpauth://totp/acct#frag").unwrap();
        assert_eq!(uri.label, "acct");
        let bare = ProvisioningUri::parse("otpauth://totp?secret=ABC").unwrap();
        assert_eq!(bare.label, "");
    }

    #[test]
    fn invalid_utf8_label_rejected() {
        let result = ProvisioningUri::parse("otpauth://totp/%FF?secret=ABC");
        assert!(matches!(result, Err(OtpError::InvalidUri(_))));
    }

    #[test]
    fn empty_issuer_treated_as_absent() {
        let uri = ProvisioningUri::parse("otpauth://totp/acct?secret=ABC&issuer=").unwrap();
        assert!(uri.issuer.is_none());
    }

    #[test]
    fn debug_masks_secret() {
        let uri = ProvisioningUri::parse(EXAMPLE).unwrap();
        let debug = format!("{uri:?}");
        assert!(!debug.contains("JBSWY3DPEHPK3PXP"));
        assert!(debug.contains("***"));
    }

    // ── Label / issuer precedence ───────────────────────────────────

    #[test]
    fn explicit_issuer_strips_matching_prefix() {
        let uri = ProvisioningUri::parse(EXAMPLE).unwrap();
        let (account, issuer) = uri.account_and_issuer();
        assert_eq!(account, "alice@site.com");
        assert_eq!(issuer.as_deref(), Some("Example"));
    }

    #[test]
    fn explicit_issuer_wins_over_different_prefix() {
        let uri = ProvisioningUri::parse("otpauth://totp/Old:bob?secret=ABC&issuer=New").unwrap();
        let (account, issuer) = uri.account_and_issuer();
        assert_eq!(account, "Old:bob");
        assert_eq!(issuer.as_deref(), Some("New"));
    }

    #[test]
    fn label_prefix_used_without_issuer_param() {
        let uri = ProvisioningUri::parse("otpauth://totp/Slack:alice%40corp.com?secret=ABC").unwrap();
        let (account, issuer) = uri.account_and_issuer();
        assert_eq!(account, "alice@corp.com");
        assert_eq!(issuer.as_deref(), Some("Slack"));
    }

    #[test]
    fn plain_label_has_no_issuer() {
        let uri = ProvisioningUri::parse("otpauth://totp/myaccount?secret=ABC").unwrap();
        let (account, issuer) = uri.account_and_issuer();
        assert_eq!(account, "myaccount");
        assert!(issuer.is_none());
    }

    // ── Optional parameters ─────────────────────────────────────────

    #[test]
    fn config_defaults_when_absent() {
        let uri = ProvisioningUri::parse(EXAMPLE).unwrap();
        assert_eq!(uri.config().unwrap(), OtpConfig::default());
    }

    #[test]
    fn config_reads_parameters() {
        let uri = ProvisioningUri::parse(
            "otpauth://totp/a?secret=ABC&algorithm=sha1&digits=8&period=60",
        )
        .unwrap();
        let config = uri.config().unwrap();
        assert_eq!(config.digits, OtpDigits::Eight);
        assert_eq!(config.period, 60);
        assert_eq!(config.algorithm, OtpAlgorithm::Sha1);
    }

    #[test]
    fn config_rejects_unsupported_parameters() {
        for query in ["algorithm=SHA256", "digits=7", "digits=six", "period=0", "period=-30"] {
            let uri = ProvisioningUri::parse(&format!("otpauth://totp/a?secret=ABC&{query}"))
                .unwrap();
            let result = uri.config();
            assert!(
                matches!(result, Err(OtpError::InvalidUri(_))),
                "{query} should be InvalidUri, got: {result:?}"
            );
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        let uri = ProvisioningUri::parse(
            "otpauth://totp/ACME%20Co:john@example.com?secret=JBSWY3DPEHPK3PXP&issuer=ACME%20Co&digits=8",
        )
        .unwrap();
        let reparsed = ProvisioningUri::parse(&uri.to_string()).unwrap();
        assert_eq!(reparsed, uri);
    }

    #[test]
    fn display_round_trips_dot_labels() {
        for label in ["..", ".", "a/../b"] {
            let uri = ProvisioningUri {
                label: label.to_owned(),
                issuer: None,
                secret: Some("JBSWY3DPEHPK3PXP".to_owned()),
                algorithm: None,
                digits: None,
                period: None,
            };
            let reparsed = ProvisioningUri::parse(&uri.to_string()).unwrap();
            assert_eq!(reparsed.label, label);
        }
    }
}

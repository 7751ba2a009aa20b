#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Integration tests for the add-account flow: pasted input → URI parsing →
//! validation gate → code generation on render.

use std::time::{Duration, UNIX_EPOCH};

use otpvault_core::{
    render_entries, resolve_input, validate, OtpConfig, OtpDigits, OtpError, ProvisioningUri,
    TotpGenerator, ValidationReason,
};

const EXAMPLE_URI: &str =
    "otpauth://totp/Example:alice@site.com?secret=JBSWY3DPEHPK3PXP&issuer=Example";

#[test]
fn provisioning_uri_components() {
    let uri = ProvisioningUri::parse(EXAMPLE_URI).unwrap();
    assert_eq!(uri.label, "Example:alice@site.com");
    assert_eq!(uri.issuer.as_deref(), Some("Example"));
    assert_eq!(uri.secret.as_deref(), Some("JBSWY3DPEHPK3PXP"));
}

#[test]
fn scheme_and_type_rejection() {
    for input in ["hotp://totp/x?secret=ABC", "otpauth://hotp/x?secret=ABC"] {
        assert!(
            matches!(ProvisioningUri::parse(input), Err(OtpError::InvalidUri(_))),
            "{input} should be rejected"
        );
    }
}

#[test]
fn pasted_uri_to_first_code() {
    let candidate = resolve_input(EXAMPLE_URI).unwrap();
    let name = candidate.suggested_name.clone().unwrap();
    candidate.validate(&name).unwrap();

    let generator = TotpGenerator::with_config(&candidate.secret_text, candidate.config).unwrap();
    let code = generator.generate(UNIX_EPOCH + Duration::from_secs(1_700_000_000));
    assert_eq!(code, "324550");
}

#[test]
fn pasted_uri_and_bare_secret_agree() {
    let from_uri = resolve_input(EXAMPLE_URI).unwrap();
    let bare = resolve_input("jbsw y3dp ehpk 3pxp").unwrap();
    let now = UNIX_EPOCH + Duration::from_secs(1_234_567_890);
    let a = TotpGenerator::with_config(&from_uri.secret_text, from_uri.config).unwrap();
    let b = TotpGenerator::with_config(&bare.secret_text, bare.config).unwrap();
    assert_eq!(a.generate(now), b.generate(now));
}

#[test]
fn eight_digit_uri_produces_eight_digit_codes() {
    let candidate = resolve_input(
        "otpauth://totp/RFC?secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ&digits=8&period=30",
    )
    .unwrap();
    assert_eq!(candidate.config.digits, OtpDigits::Eight);
    let generator = TotpGenerator::with_config(&candidate.secret_text, candidate.config).unwrap();
    assert_eq!(generator.generate_at(59), "94287082");
}

#[test]
fn empty_secret_pinned_behavior() {
    let err = validate("Example", "").unwrap_err();
    assert_eq!(err.reason, ValidationReason::EmptySecret);
}

#[test]
fn invalid_alphabet_rejected_by_gate() {
    let err = validate("Example", "1").unwrap_err();
    assert!(matches!(err.reason, ValidationReason::InvalidEncoding(_)));
}

#[test]
fn render_pass_over_stored_entries() {
    let stored = [
        ("Example", "JBSWY3DPEHPK3PXP"),
        ("Broken", "0000"),
        ("RFC", "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"),
    ];
    let now = UNIX_EPOCH + Duration::from_secs(1_234_567_890);
    let rendered = render_entries(stored, &OtpConfig::default(), now);

    assert_eq!(rendered.len(), 3);
    assert_eq!(rendered[0].result.as_ref().unwrap().code, "742275");
    let err = rendered[1].result.as_ref().unwrap_err();
    assert!(err.to_string().starts_with("invalid Base32 encoding"));
    let rfc = rendered[2].result.as_ref().unwrap();
    assert_eq!(rfc.code, "005924");
    assert_eq!(rfc.seconds_remaining, 30);
}

//! Slack request signing: `v0=` + hex(HMAC-SHA256(secret, "v0:{ts}:{body}")).

use std::borrow::Cow;

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{error, warn};

use super::parsing::get_header_value;

pub const SIGNATURE_HEADER: &str = "x-slack-signature";
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Max allowed skew, in seconds, between the request timestamp and our clock.
pub const REPLAY_WINDOW_SECS: u64 = 300;

const SIGNATURE_VERSION: &str = "v0";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing x-slack-signature header")]
    MissingSignature,
    #[error("missing x-slack-request-timestamp header")]
    MissingTimestamp,
    #[error("request timestamp is not an integer")]
    InvalidTimestamp,
    #[error("request timestamp is outside the replay window")]
    StaleTimestamp,
    #[error("request has no body to verify")]
    MissingBody,
    #[error("signature length does not match")]
    LengthMismatch,
    #[error("signature does not match")]
    InvalidSignature,
    #[error("failed to compute HMAC: {0}")]
    Hmac(String),
}

/// Verifies an inbound request against the current clock.
///
/// `raw_body` is the authoritative signing input. `fallback_body` is only
/// re-serialized when no raw body is available, which may not reproduce the
/// bytes Slack signed.
#[must_use]
pub fn verify_slack_request(
    headers: &HeaderMap,
    raw_body: Option<&[u8]>,
    fallback_body: Option<&Value>,
    signing_secret: &str,
) -> bool {
    let now = chrono::Utc::now().timestamp();
    verify_at(headers, raw_body, fallback_body, signing_secret, now).is_ok()
}

/// Same as [`verify_slack_request`] with an explicit clock, in Unix seconds.
///
/// # Errors
///
/// Returns the reason verification failed. Every error means the request
/// must be rejected.
pub fn verify_at(
    headers: &HeaderMap,
    raw_body: Option<&[u8]>,
    fallback_body: Option<&Value>,
    signing_secret: &str,
    now: i64,
) -> Result<(), SignatureError> {
    let result = check(headers, raw_body, fallback_body, signing_secret, now);

    match &result {
        Ok(()) => {}
        Err(SignatureError::StaleTimestamp) => {
            error!("Timestamp out of range, potential replay attack");
        }
        Err(SignatureError::InvalidSignature | SignatureError::LengthMismatch) => {
            error!("Slack signature verification failed");
        }
        Err(e) => warn!("Rejecting Slack request: {}", e),
    }

    result
}

fn check(
    headers: &HeaderMap,
    raw_body: Option<&[u8]>,
    fallback_body: Option<&Value>,
    signing_secret: &str,
    now: i64,
) -> Result<(), SignatureError> {
    let signature =
        get_header_value(headers, SIGNATURE_HEADER).ok_or(SignatureError::MissingSignature)?;
    let timestamp =
        get_header_value(headers, TIMESTAMP_HEADER).ok_or(SignatureError::MissingTimestamp)?;

    let ts = timestamp
        .trim()
        .parse::<i64>()
        .map_err(|_| SignatureError::InvalidTimestamp)?;
    if now.abs_diff(ts) > REPLAY_WINDOW_SECS {
        return Err(SignatureError::StaleTimestamp);
    }

    let body = signed_body(raw_body, fallback_body)?;
    let computed = try_compute(timestamp, &body, signing_secret)?;

    signatures_match(computed.as_bytes(), signature.as_bytes())
}

/// Constant-time comparison. Unequal lengths are rejected before the
/// comparator runs.
fn signatures_match(computed: &[u8], provided: &[u8]) -> Result<(), SignatureError> {
    if computed.len() != provided.len() {
        return Err(SignatureError::LengthMismatch);
    }
    if bool::from(computed.ct_eq(provided)) {
        Ok(())
    } else {
        Err(SignatureError::InvalidSignature)
    }
}

fn signed_body<'a>(
    raw_body: Option<&'a [u8]>,
    fallback_body: Option<&Value>,
) -> Result<Cow<'a, [u8]>, SignatureError> {
    if let Some(raw) = raw_body {
        return Ok(Cow::Borrowed(raw));
    }
    let parsed = fallback_body.ok_or(SignatureError::MissingBody)?;
    warn!("No raw body available; verifying against re-serialized body");
    serde_json::to_vec(parsed)
        .map(Cow::Owned)
        .map_err(|_| SignatureError::MissingBody)
}

fn try_compute(
    timestamp: &str,
    request_body: &[u8],
    signing_secret: &str,
) -> Result<String, SignatureError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(signing_secret.as_bytes())
        .map_err(|e| SignatureError::Hmac(e.to_string()))?;
    mac.update(SIGNATURE_VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(request_body);
    Ok(format!(
        "{SIGNATURE_VERSION}={}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Computes the `v0=` signature Slack would send for this timestamp and body.
#[must_use]
pub fn compute_signature(timestamp: &str, request_body: &[u8], signing_secret: &str) -> String {
    match try_compute(timestamp, request_body, signing_secret) {
        Ok(sig) => sig,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
    const NOW: i64 = 1_531_420_618;
    const BODY: &[u8] = b"token=xyzz0WbapA4vBCDEFasx0q6G&team_id=T1DC2JH3J&text=hello";

    fn signed_headers(timestamp: i64, signature: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            TIMESTAMP_HEADER,
            HeaderValue::from_str(&timestamp.to_string()).unwrap(),
        );
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_str(signature).unwrap());
        headers
    }

    fn valid_headers(timestamp: i64) -> HeaderMap {
        let sig = compute_signature(&timestamp.to_string(), BODY, SECRET);
        signed_headers(timestamp, &sig)
    }

    #[test]
    fn accepts_valid_signature() {
        let headers = valid_headers(NOW);
        assert_eq!(verify_at(&headers, Some(BODY), None, SECRET, NOW), Ok(()));
    }

    #[test]
    fn signature_has_expected_shape() {
        let sig = compute_signature("1531420618", BODY, SECRET);
        assert!(sig.starts_with("v0="));
        assert_eq!(sig.len(), 3 + 64);
    }

    #[test]
    fn signature_is_deterministic() {
        let a = compute_signature("1531420618", BODY, SECRET);
        let b = compute_signature("1531420618", BODY, SECRET);
        assert_eq!(a, b);
    }

    #[test]
    fn flipping_one_body_character_changes_signature() {
        let original = compute_signature("1531420618", BODY, SECRET);
        for i in 0..BODY.len() {
            let mut mutated = BODY.to_vec();
            mutated[i] ^= 0x01;
            assert_ne!(
                original,
                compute_signature("1531420618", &mutated, SECRET),
                "byte {i}"
            );
        }
    }

    #[test]
    fn rejects_stale_timestamp_even_with_correct_signature() {
        let old = NOW - 301;
        let headers = valid_headers(old);
        assert_eq!(
            verify_at(&headers, Some(BODY), None, SECRET, NOW),
            Err(SignatureError::StaleTimestamp)
        );

        let future = NOW + 301;
        let headers = valid_headers(future);
        assert_eq!(
            verify_at(&headers, Some(BODY), None, SECRET, NOW),
            Err(SignatureError::StaleTimestamp)
        );
    }

    #[test]
    fn accepts_timestamp_at_window_edge() {
        let headers = valid_headers(NOW - 300);
        assert!(verify_at(&headers, Some(BODY), None, SECRET, NOW).is_ok());
    }

    #[test]
    fn rejects_signature_of_different_length() {
        let headers = signed_headers(NOW, "v0=abc");
        assert_eq!(
            verify_at(&headers, Some(BODY), None, SECRET, NOW),
            Err(SignatureError::LengthMismatch)
        );
    }

    #[test]
    fn rejects_tampered_signature() {
        let mut sig = compute_signature(&NOW.to_string(), BODY, SECRET);
        let last = if sig.ends_with('0') { "1" } else { "0" };
        sig.replace_range(sig.len() - 1.., last);
        let headers = signed_headers(NOW, &sig);
        assert_eq!(
            verify_at(&headers, Some(BODY), None, SECRET, NOW),
            Err(SignatureError::InvalidSignature)
        );
    }

    #[test]
    fn rejects_wrong_secret() {
        let headers = valid_headers(NOW);
        assert!(verify_at(&headers, Some(BODY), None, "other-secret", NOW).is_err());
    }

    #[test]
    fn rejects_missing_headers() {
        let mut headers = valid_headers(NOW);
        headers.remove(SIGNATURE_HEADER);
        assert_eq!(
            verify_at(&headers, Some(BODY), None, SECRET, NOW),
            Err(SignatureError::MissingSignature)
        );

        let mut headers = valid_headers(NOW);
        headers.remove(TIMESTAMP_HEADER);
        assert_eq!(
            verify_at(&headers, Some(BODY), None, SECRET, NOW),
            Err(SignatureError::MissingTimestamp)
        );
    }

    #[test]
    fn rejects_non_numeric_timestamp() {
        let mut headers = valid_headers(NOW);
        headers.insert(TIMESTAMP_HEADER, HeaderValue::from_static("yesterday"));
        assert_eq!(
            verify_at(&headers, Some(BODY), None, SECRET, NOW),
            Err(SignatureError::InvalidTimestamp)
        );
    }

    #[test]
    fn falls_back_to_serialized_body_without_raw_form() {
        let parsed = serde_json::json!({"challenge": "abc123"});
        let serialized = serde_json::to_vec(&parsed).unwrap();
        let sig = compute_signature(&NOW.to_string(), &serialized, SECRET);
        let headers = signed_headers(NOW, &sig);

        assert!(verify_at(&headers, None, Some(&parsed), SECRET, NOW).is_ok());
        assert_eq!(
            verify_at(&headers, None, None, SECRET, NOW),
            Err(SignatureError::MissingBody)
        );
    }

    #[test]
    fn raw_body_wins_over_fallback() {
        let headers = valid_headers(NOW);
        let unrelated = serde_json::json!({"text": "something else"});
        assert!(verify_at(&headers, Some(BODY), Some(&unrelated), SECRET, NOW).is_ok());
    }

    #[test]
    fn wall_clock_verification_accepts_fresh_request() {
        let now = chrono::Utc::now().timestamp();
        let headers = valid_headers(now);
        assert!(verify_slack_request(&headers, Some(BODY), None, SECRET));
    }
}

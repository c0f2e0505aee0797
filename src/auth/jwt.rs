//! Unverified JWT payload inspection.
//!
//! The backend is the only party that verifies signatures; the client only
//! reads the `exp` claim to decide when a token is stale.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;
use thiserror::Error;

/// Refresh when fewer than this many seconds remain.
pub const REFRESH_THRESHOLD_SECS: i64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not a three-part JWT")]
    Malformed,
    #[error("token payload is not valid base64url")]
    Encoding,
    #[error("token payload is not valid JSON: {0}")]
    Payload(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
    #[serde(default)]
    pub token_type: Option<String>,
}

pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let mut parts = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| TokenError::Encoding)?;
    serde_json::from_slice(&bytes).map_err(|e| TokenError::Payload(e.to_string()))
}

pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Seconds left before `exp`; `None` when the token can't be read.
pub fn seconds_until_expiry(token: &str, now: i64) -> Option<i64> {
    decode_claims(token).ok().map(|claims| claims.exp - now)
}

pub fn is_token_expired_at(token: &str, now: i64) -> bool {
    match seconds_until_expiry(token, now) {
        Some(remaining) => remaining <= 0,
        None => true,
    }
}

pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, now_unix())
}

pub fn should_refresh_token_at(token: &str, now: i64, threshold_secs: i64) -> bool {
    match seconds_until_expiry(token, now) {
        Some(remaining) => remaining < threshold_secs,
        None => true,
    }
}

pub fn should_refresh_token(token: &str) -> bool {
    should_refresh_token_at(token, now_unix(), REFRESH_THRESHOLD_SECS)
}

/// Test helper: an unsigned token carrying the given `exp`.
#[cfg(test)]
pub(crate) fn token_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{},"user_id":1}}"#, exp));
    format!("{}.{}.signature", header, payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn decodes_exp_claim() {
        let claims = decode_claims(&token_with_exp(NOW + 60)).unwrap();
        assert_eq!(claims.exp, NOW + 60);
    }

    #[test]
    fn unparsable_tokens_are_expired_and_need_refresh() {
        for token in ["", "abc", "a.b", "a.!!!.c", "a.e30.c", "a.b.c.d"] {
            assert!(is_token_expired_at(token, NOW), "{token:?}");
            assert!(
                should_refresh_token_at(token, NOW, REFRESH_THRESHOLD_SECS),
                "{token:?}"
            );
        }
    }

    #[test]
    fn past_exp_is_expired() {
        assert!(is_token_expired_at(&token_with_exp(NOW - 1), NOW));
        assert!(is_token_expired_at(&token_with_exp(NOW), NOW));
        assert!(!is_token_expired_at(&token_with_exp(NOW + 1), NOW));
    }

    #[test]
    fn refresh_threshold_is_strictly_less_than_300() {
        let token = token_with_exp(NOW + 299);
        assert!(should_refresh_token_at(&token, NOW, REFRESH_THRESHOLD_SECS));

        let token = token_with_exp(NOW + 300);
        assert!(!should_refresh_token_at(&token, NOW, REFRESH_THRESHOLD_SECS));

        let token = token_with_exp(NOW + 3600);
        assert!(!should_refresh_token_at(&token, NOW, REFRESH_THRESHOLD_SECS));

        let token = token_with_exp(NOW - 10);
        assert!(should_refresh_token_at(&token, NOW, REFRESH_THRESHOLD_SECS));
    }

    #[test]
    fn padded_payload_is_accepted() {
        let header = URL_SAFE_NO_PAD.encode(b"{}");
        let payload = base64::engine::general_purpose::URL_SAFE
            .encode(format!(r#"{{"exp": {}}}"#, NOW));
        assert!(payload.ends_with('='));
        let token = format!("{header}.{payload}.sig");
        assert_eq!(decode_claims(&token).unwrap().exp, NOW);
    }
}

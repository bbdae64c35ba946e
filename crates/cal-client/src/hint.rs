//! Unverified access-token expiry
//!
//! The client cannot check the token's signature. It only reads `exp` from the
//! payload segment to decide when to refresh; the server stays the authority on
//! whether the token is valid.

use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::Value;

/// Expiry read from an access token's payload, for scheduling only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryHint {
    expires_at_ms: i64,
}

impl ExpiryHint {
    /// `None` for anything that is not a three-part token with a numeric `exp`
    pub fn decode(token: &str) -> Option<Self> {
        decode_expiry(token).map(|expires_at_ms| Self { expires_at_ms })
    }

    pub fn expires_at_ms(self) -> i64 {
        self.expires_at_ms
    }

    pub fn millis_until(self, now_ms: i64) -> i64 {
        self.expires_at_ms - now_ms
    }

    pub fn is_expired_at(self, now_ms: i64) -> bool {
        self.expires_at_ms <= now_ms
    }
}

/// Expiry of an access token in epoch milliseconds
///
/// The payload may be padded or unpadded base64url.
pub fn decode_expiry(token: &str) -> Option<i64> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return None;
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?.as_f64()?;

    (exp.is_finite() && exp > 0.0).then(|| (exp * 1000.0) as i64)
}

/// Delay before the proactive refresh
///
/// Normally `leeway` before expiry. When that moment has already passed, one
/// second before expiry instead. Never shorter than `floor`.
pub fn refresh_delay(millis_until_expiry: i64, leeway: Duration, floor: Duration) -> Duration {
    let leeway_ms = leeway.as_millis() as i64;
    let mut delay_ms = millis_until_expiry - leeway_ms;
    if delay_ms <= 0 {
        delay_ms = millis_until_expiry - 1000;
    }

    Duration::from_millis(delay_ms.max(0) as u64).max(floor)
}

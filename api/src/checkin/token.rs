//! Stateless, signed check-in tokens.
//!
//! A token binds {student, job, round, session} with an issuance timestamp
//! and a random nonce, signed with HMAC-SHA256 under a server-held secret.
//! Validity is computed entirely from the signed contents and the clock; the
//! server stores nothing at issuance, so a scanned QR code can carry
//! verifiable intent without a database round-trip.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use util::config;

type HmacSha256 = Hmac<Sha256>;

/// The signed contents of a check-in token.
///
/// The nonce is carried for uniqueness and audit trails; single-use
/// enforcement comes from the attendance table's (student, round) primary
/// key, not from the token itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckinClaims {
    pub student_id: i64,
    pub job_id: i64,
    pub round_id: i64,
    pub session_id: i64,
    pub issued_at: i64,
    pub nonce: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Undecodable, structurally malformed, or signature mismatch. One
    /// variant on purpose: callers must not be able to tell tampering apart
    /// from garbage, so a forger gets no oracle.
    #[error("Invalid check-in token")]
    Invalid,
    /// Well-signed but older than the expiry window. Reported distinctly so
    /// legitimate users can be told to refresh.
    #[error("Check-in token expired")]
    Expired,
}

/// Wire envelope: claims plus hex HMAC over their serialized form, the whole
/// thing base64url-encoded into an opaque string.
#[derive(Serialize, Deserialize)]
struct Envelope {
    c: CheckinClaims,
    s: String,
}

/// Issues and verifies check-in tokens. Holds the signing secret and the
/// expiry window; construct one per process from config, or with an explicit
/// secret in tests.
pub struct TokenCodec {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// Codec configured from `CHECKIN_SECRET` / `CHECKIN_TOKEN_TTL_MINUTES`.
    pub fn from_config() -> Self {
        Self::new(
            config::checkin_secret().into_bytes(),
            Duration::minutes(config::checkin_token_ttl_minutes() as i64),
        )
    }

    /// Mints a token for the given claim ids at `now`.
    pub fn issue(
        &self,
        student_id: i64,
        job_id: i64,
        round_id: i64,
        session_id: i64,
        now: DateTime<Utc>,
    ) -> String {
        let claims = CheckinClaims {
            student_id,
            job_id,
            round_id,
            session_id,
            issued_at: now.timestamp(),
            nonce: fresh_nonce(),
        };

        let payload = serde_json::to_vec(&claims).expect("claims serialize");
        let envelope = Envelope {
            s: hex::encode(self.sign(&payload)),
            c: claims,
        };
        let raw = serde_json::to_vec(&envelope).expect("envelope serialize");
        URL_SAFE_NO_PAD.encode(raw)
    }

    /// Decodes and verifies a token, failing closed on anything unexpected.
    ///
    /// Signature comparison goes through the hmac crate's constant-time
    /// `verify_slice`. Expiry is checked only after the signature holds, so
    /// `Expired` is never reported for a forged token.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<CheckinClaims, TokenError> {
        let raw = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|_| TokenError::Invalid)?;
        let envelope: Envelope = serde_json::from_slice(&raw).map_err(|_| TokenError::Invalid)?;
        let sig = hex::decode(&envelope.s).map_err(|_| TokenError::Invalid)?;

        let payload = serde_json::to_vec(&envelope.c).expect("claims serialize");
        let mut mac = HmacSha256::new_from_slice(&self.secret).expect("HMAC key");
        mac.update(&payload);
        mac.verify_slice(&sig).map_err(|_| TokenError::Invalid)?;

        if now.timestamp() - envelope.c.issued_at > self.ttl.num_seconds() {
            return Err(TokenError::Expired);
        }

        Ok(envelope.c)
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.secret).expect("HMAC key");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

/// 16 bytes of OS entropy, hex-encoded.
fn fresh_nonce() -> String {
    use rand::RngCore;
    let mut buf = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn codec() -> TokenCodec {
        TokenCodec::new(b"unit-test-secret".to_vec(), Duration::minutes(10))
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 25, 9, 0, 0).unwrap()
    }

    #[test]
    fn round_trip_preserves_claims() {
        let c = codec();
        let token = c.issue(7, 3, 11, 42, t0());
        let claims = c.verify(&token, t0()).unwrap();

        assert_eq!(claims.student_id, 7);
        assert_eq!(claims.job_id, 3);
        assert_eq!(claims.round_id, 11);
        assert_eq!(claims.session_id, 42);
        assert_eq!(claims.issued_at, t0().timestamp());
        assert_eq!(claims.nonce.len(), 32); // 16 bytes hex
    }

    #[test]
    fn nonces_differ_between_issuances() {
        let c = codec();
        let a = c.issue(7, 3, 11, 42, t0());
        let b = c.issue(7, 3, 11, 42, t0());
        assert_ne!(a, b);
    }

    #[test]
    fn expires_after_ttl() {
        let c = codec();
        let token = c.issue(7, 3, 11, 42, t0());

        // Inside the window, including the boundary.
        assert!(c.verify(&token, t0() + Duration::minutes(10)).is_ok());
        // One second past it.
        assert_eq!(
            c.verify(&token, t0() + Duration::minutes(10) + Duration::seconds(1)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn any_single_character_flip_invalidates() {
        let c = codec();
        let token = c.issue(7, 3, 11, 42, t0());

        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            if tampered == token {
                continue;
            }
            assert!(
                c.verify(&tampered, t0()).is_err(),
                "flip at index {i} was accepted"
            );
        }
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let other = TokenCodec::new(b"some-other-secret".to_vec(), Duration::minutes(10));
        let token = other.issue(7, 3, 11, 42, t0());
        assert_eq!(codec().verify(&token, t0()), Err(TokenError::Invalid));
    }

    #[test]
    fn rejects_garbage() {
        let c = codec();
        assert_eq!(c.verify("", t0()), Err(TokenError::Invalid));
        assert_eq!(c.verify("not a token", t0()), Err(TokenError::Invalid));
        assert_eq!(
            c.verify(&URL_SAFE_NO_PAD.encode(b"{\"c\":null}"), t0()),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn expired_and_tampered_reports_invalid_not_expired() {
        let c = codec();
        let token = c.issue(7, 3, 11, 42, t0());
        let mut bytes = token.into_bytes();
        let last = bytes.len() / 2;
        bytes[last] = if bytes[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        let res = c.verify(&tampered, t0() + Duration::hours(2));
        assert_ne!(res, Err(TokenError::Expired));
        assert!(res.is_err());
    }
}

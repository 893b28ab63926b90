//! Signed session-token codec.
//!
//! Sessions are not persisted server-side; the browser keeps a self-contained
//! signed token so a sign-in survives app restarts. The wire format is
//! `base64url(payload | base64url(HMAC-SHA256(secret, payload)))` with a JSON
//! claims payload. Verification recomputes the MAC with a constant-time
//! comparison and rejects tampering, malformed structure, unknown roles, and
//! expired claims.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::auth::models::Role;
use crate::errors::{ServiceError, ServiceResult};

type HmacSha256 = Hmac<Sha256>;

/// Claims carried inside a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Username, with the casing stored in the Users table.
    pub sub: String,
    /// Display name at sign-in time.
    pub name: String,
    pub role: Role,
    /// Expiry as unix seconds. Must be in the future at verification time.
    pub exp: i64,
}

/// Encoder/verifier bound to one signing secret.
pub struct TokenCodec {
    secret: Vec<u8>,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    /// Signs `claims` into an opaque token string.
    pub fn encode(&self, claims: &SessionClaims) -> ServiceResult<String> {
        let payload = serde_json::to_vec(claims)
            .map_err(|e| ServiceError::validation(format!("Failed to serialize claims: {e}")))?;

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| ServiceError::validation(format!("Invalid signing key: {e}")))?;
        mac.update(&payload);
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        let mut buf = payload;
        buf.push(b'|');
        buf.extend_from_slice(signature.as_bytes());
        Ok(URL_SAFE_NO_PAD.encode(buf))
    }

    /// Verifies a token and returns its claims.
    ///
    /// Every failure mode collapses to `InvalidToken`: a forged token must
    /// not be distinguishable from a stale one.
    pub fn decode(&self, token: &str) -> ServiceResult<SessionClaims> {
        let raw = URL_SAFE_NO_PAD
            .decode(token.as_bytes())
            .map_err(|_| ServiceError::InvalidToken)?;

        // The signature is base64url, which never contains '|'; the last one
        // in the buffer is the separator even if the JSON payload has its own.
        let split = raw
            .iter()
            .rposition(|&b| b == b'|')
            .ok_or(ServiceError::InvalidToken)?;
        let (payload, sig_b64) = (&raw[..split], &raw[split + 1..]);

        let signature = URL_SAFE_NO_PAD
            .decode(sig_b64)
            .map_err(|_| ServiceError::InvalidToken)?;

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| ServiceError::InvalidToken)?;
        mac.update(payload);
        // verify_slice compares in constant time.
        mac.verify_slice(&signature)
            .map_err(|_| ServiceError::InvalidToken)?;

        let claims: SessionClaims =
            serde_json::from_slice(payload).map_err(|_| ServiceError::InvalidToken)?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(ServiceError::InvalidToken);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims_expiring_in(minutes: i64) -> SessionClaims {
        SessionClaims {
            sub: "alice".to_string(),
            name: "Alice L".to_string(),
            role: Role::Business,
            exp: (Utc::now() + Duration::minutes(minutes)).timestamp(),
        }
    }

    #[test]
    fn roundtrip_recovers_claims_before_expiry() {
        let codec = TokenCodec::new("test-secret");
        let claims = claims_expiring_in(60);
        let token = codec.encode(&claims).unwrap();
        assert_eq!(codec.decode(&token).unwrap(), claims);
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = TokenCodec::new("test-secret");
        let token = codec.encode(&claims_expiring_in(-1)).unwrap();
        assert!(matches!(
            codec.decode(&token),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[test]
    fn any_single_character_mutation_is_rejected() {
        let codec = TokenCodec::new("test-secret");
        let token = codec.encode(&claims_expiring_in(60)).unwrap();

        for i in 0..token.len() {
            let mut mutated: Vec<char> = token.chars().collect();
            mutated[i] = if mutated[i] == 'A' { 'B' } else { 'A' };
            if mutated.iter().collect::<String>() == token {
                continue;
            }
            let mutated: String = mutated.iter().collect();
            assert!(
                codec.decode(&mutated).is_err(),
                "mutation at index {i} was accepted"
            );
        }
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = TokenCodec::new("secret-a")
            .encode(&claims_expiring_in(60))
            .unwrap();
        assert!(TokenCodec::new("secret-b").decode(&token).is_err());
    }

    #[test]
    fn unknown_role_in_signed_payload_is_rejected() {
        // Correctly signed, but the role is not a known variant.
        let codec = TokenCodec::new("test-secret");
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let payload =
            format!(r#"{{"sub":"alice","name":"Alice","role":"superuser","exp":{exp}}}"#);

        let mut mac = HmacSha256::new_from_slice(b"test-secret").unwrap();
        mac.update(payload.as_bytes());
        let sig = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        let token = URL_SAFE_NO_PAD.encode(format!("{payload}|{sig}"));

        assert!(matches!(
            codec.decode(&token),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        let codec = TokenCodec::new("test-secret");
        assert!(codec.decode("").is_err());
        assert!(codec.decode("not a token").is_err());
        assert!(codec.decode(&URL_SAFE_NO_PAD.encode("no separator")).is_err());
    }
}

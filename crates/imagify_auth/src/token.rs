// --- File: crates/imagify_auth/src/token.rs ---
//! Session tokens: HS256 JWTs carrying the account id.

use chrono::Utc;
use imagify_common::{auth_error, internal_error, ImagifyError};
use imagify_config::AuthConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub id: String,
    /// Issued at (Unix seconds).
    pub iat: i64,
    /// Expiration (Unix seconds).
    pub exp: i64,
}

/// Issues and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl_secs)
    }

    /// Signs a token bound to `account_id`.
    pub fn issue(&self, account_id: &str) -> Result<String, ImagifyError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: account_id.to_string(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| internal_error(format!("failed to sign session token: {}", e)))
    }

    /// Checks signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, ImagifyError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Session token rejected: {}", e);
                auth_error(crate::NOT_AUTHORIZED)
            })
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_to_account_id() {
        let signer = TokenSigner::new("test-secret", 3600);
        let token = signer.issue("account-1").unwrap();
        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.id, "account-1");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = TokenSigner::new("secret-a", 3600).issue("account-1").unwrap();
        let err = TokenSigner::new("secret-b", 3600).verify(&token).unwrap_err();
        assert!(matches!(err, ImagifyError::AuthError(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let signer = TokenSigner::new("test-secret", 3600);
        let now = Utc::now().timestamp();
        let stale = Claims {
            id: "account-1".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &stale,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(signer.verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let signer = TokenSigner::new("test-secret", 3600);
        assert!(signer.verify("invalid.token.here").is_err());
        assert!(signer.verify("").is_err());
    }
}

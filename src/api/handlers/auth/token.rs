//! Signed token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the subject email, a purpose scope, and
//! issue/expiry timestamps. Expiry is evaluated against the wall clock at
//! decode time with zero leeway.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use super::error::AuthError;

/// Purpose tag restricting which operation may consume a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenScope {
    #[serde(rename = "access_token")]
    Access,
    #[serde(rename = "refresh_token")]
    Refresh,
    #[serde(rename = "email_token")]
    EmailVerification,
}

/// Claims carried by every issued token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the identity's email.
    pub sub: String,
    pub scope: TokenScope,
    /// Unique per issuance so tokens minted within the same second differ.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Symmetric codec over the configured signing key.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a signed token for `subject` with the given scope and TTL.
    ///
    /// # Errors
    /// Returns `Unavailable` if serialization or signing fails.
    pub fn issue(
        &self,
        subject: &str,
        scope: TokenScope,
        ttl_seconds: i64,
    ) -> Result<String, AuthError> {
        let now = now_unix_seconds();
        let claims = Claims {
            sub: subject.to_string(),
            scope,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ttl_seconds,
        };
        self.encode(&claims)
    }

    pub(crate) fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        jsonwebtoken::encode(&Header::default(), claims, &self.encoding)
            .map_err(|err| AuthError::Unavailable(anyhow::anyhow!("Failed to sign token: {err}")))
    }

    /// Decode and verify signature, payload shape, and expiry.
    ///
    /// # Errors
    /// Any failure collapses to `InvalidToken`; callers never learn why.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Decode requiring a specific scope; a mismatched scope is an invalid token.
    ///
    /// # Errors
    /// `InvalidToken` on any signature, expiry, or scope failure.
    pub fn decode_scoped(&self, token: &str, scope: TokenScope) -> Result<Claims, AuthError> {
        let claims = self.decode(token)?;
        if claims.scope == scope {
            Ok(claims)
        } else {
            Err(AuthError::InvalidToken)
        }
    }

    /// Decode with expiry checks disabled. Used on logout to learn a
    /// token's natural expiry; the signature is still verified.
    ///
    /// # Errors
    /// `InvalidToken` if the signature or payload is bad.
    pub fn decode_ignoring_expiry(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.validate_exp = false;
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// SHA-256 of the raw token; the only form tokens take at rest.
#[must_use]
pub fn token_hash(token: &str) -> Vec<u8> {
    Sha256::digest(token.as_bytes()).to_vec()
}

pub(crate) fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(&SecretString::from("test-secret"))
    }

    #[test]
    fn issue_then_decode() -> Result<(), AuthError> {
        let codec = codec();
        let token = codec.issue("alice@example.com", TokenScope::Access, 60)?;
        let claims = codec.decode(&token)?;
        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.scope, TokenScope::Access);
        assert_eq!(claims.exp, claims.iat + 60);
        Ok(())
    }

    #[test]
    fn expired_token_rejected() -> Result<(), AuthError> {
        let codec = codec();
        let now = now_unix_seconds();
        let token = codec.encode(&Claims {
            sub: "alice@example.com".to_string(),
            scope: TokenScope::Access,
            jti: Uuid::new_v4().to_string(),
            iat: now - 120,
            exp: now - 60,
        })?;
        assert!(matches!(codec.decode(&token), Err(AuthError::InvalidToken)));
        Ok(())
    }

    #[test]
    fn expired_token_still_decodes_without_expiry_check() -> Result<(), AuthError> {
        let codec = codec();
        let now = now_unix_seconds();
        let token = codec.encode(&Claims {
            sub: "alice@example.com".to_string(),
            scope: TokenScope::Access,
            jti: Uuid::new_v4().to_string(),
            iat: now - 120,
            exp: now - 60,
        })?;
        let claims = codec.decode_ignoring_expiry(&token)?;
        assert_eq!(claims.exp, now - 60);
        Ok(())
    }

    #[test]
    fn wrong_key_rejected() -> Result<(), AuthError> {
        let token = codec().issue("alice@example.com", TokenScope::Access, 60)?;
        let other = TokenCodec::new(&SecretString::from("other-secret"));
        assert!(matches!(other.decode(&token), Err(AuthError::InvalidToken)));
        Ok(())
    }

    #[test]
    fn tampered_token_rejected() -> Result<(), AuthError> {
        let codec = codec();
        let token = codec.issue("alice@example.com", TokenScope::Access, 60)?;
        let mut tampered = token;
        tampered.pop();
        tampered.push('A');
        assert!(codec.decode(&tampered).is_err());
        Ok(())
    }

    #[test]
    fn scope_mismatch_rejected() -> Result<(), AuthError> {
        let codec = codec();
        let token = codec.issue("alice@example.com", TokenScope::Refresh, 60)?;
        assert!(codec.decode_scoped(&token, TokenScope::Refresh).is_ok());
        assert!(matches!(
            codec.decode_scoped(&token, TokenScope::Access),
            Err(AuthError::InvalidToken)
        ));
        Ok(())
    }

    #[test]
    fn same_second_issuance_yields_distinct_tokens() -> Result<(), AuthError> {
        let codec = codec();
        let first = codec.issue("alice@example.com", TokenScope::Refresh, 60)?;
        let second = codec.issue("alice@example.com", TokenScope::Refresh, 60)?;
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn scope_wire_strings() {
        let scopes = serde_json::to_value([
            TokenScope::Access,
            TokenScope::Refresh,
            TokenScope::EmailVerification,
        ]);
        assert_eq!(
            scopes.ok(),
            Some(serde_json::json!([
                "access_token",
                "refresh_token",
                "email_token"
            ]))
        );
    }

    #[test]
    fn token_hash_is_stable_and_token_specific() {
        let first = token_hash("token-a");
        assert_eq!(first, token_hash("token-a"));
        assert_ne!(first, token_hash("token-b"));
        assert_eq!(first.len(), 32);
    }
}

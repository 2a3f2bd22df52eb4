//! Signed token issuance.
//!
//! Tokens are HS256 JWTs whose payload carries only the user id plus the
//! standard `iat`/`exp` timestamps.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::TokenConfig;
use crate::errors::{AppError, AppResult};

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies tokens with the configured secret and lifetime.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    config: TokenConfig,
}

impl TokenIssuer {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    /// Sign a token for `user_id`, valid from now for the configured lifetime.
    pub fn issue(&self, user_id: Uuid) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.config.expires_in.as_duration())
            .ok_or_else(|| {
                AppError::internal(format!(
                    "Token expiry {} overflows the current time",
                    self.config.expires_in
                ))
            })?;

        let claims = Claims {
            id: user_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.secret_bytes()),
        )?;

        Ok(token)
    }

    /// Check signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.secret_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TokenExpiry, MAX_JWT_EXPIRES_IN_SECONDS};

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    fn issuer(seconds: i64) -> TokenIssuer {
        TokenIssuer::new(TokenConfig::new(
            SECRET,
            TokenExpiry::from_seconds(seconds).unwrap(),
        ))
    }

    #[test]
    fn test_issued_token_carries_user_id_and_expiry() {
        let issuer = issuer(3600);
        let user_id = Uuid::new_v4();

        let claims = issuer.verify(&issuer.issue(user_id).unwrap()).unwrap();

        assert_eq!(claims.id, user_id);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_longest_lifetime_issues_without_overflow() {
        let issuer = issuer(MAX_JWT_EXPIRES_IN_SECONDS);

        let claims = issuer.verify(&issuer.issue(Uuid::new_v4()).unwrap()).unwrap();

        assert_eq!(claims.exp - claims.iat, MAX_JWT_EXPIRES_IN_SECONDS);
    }

    #[test]
    fn test_payload_has_no_extra_claims() {
        let token = issuer(60).issue(Uuid::new_v4()).unwrap();

        let mut data = jsonwebtoken::decode::<serde_json::Map<String, serde_json::Value>>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap()
        .claims;

        data.remove("id").unwrap();
        data.remove("iat").unwrap();
        data.remove("exp").unwrap();
        assert!(data.is_empty(), "unexpected claims: {:?}", data);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issuer(60).issue(Uuid::new_v4()).unwrap();
        let other = TokenIssuer::new(TokenConfig::new(
            "another-secret-key-for-testing-32chars!",
            TokenExpiry::from_seconds(60).unwrap(),
        ));

        assert!(matches!(other.verify(&token), Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let issuer = issuer(60);
        let mut token = issuer.issue(Uuid::new_v4()).unwrap();
        token.push('x');

        assert!(issuer.verify(&token).is_err());
    }
}

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;

/// Session-token service. Tokens are HS256 JWTs bound to the account id and
/// email; they carry no authorization data beyond identity.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_token_expiry_minutes: i64,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (account id)
    pub sub: String,
    /// Email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID
    pub jti: String,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            session_token_expiry_minutes: config.session_token_expiry_minutes,
        }
    }

    /// Mint a session token for an authenticated account.
    pub fn generate_session_token(
        &self,
        account_id: &str,
        email: &str,
    ) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.session_token_expiry_minutes);

        let claims = SessionClaims {
            sub: account_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode session token: {}", e))
    }

    /// Validate a session token and return its claims.
    pub fn validate_session_token(&self, token: &str) -> Result<SessionClaims, anyhow::Error> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow::anyhow!("Invalid session token: {}", e))?;
        Ok(data.claims)
    }

    pub fn session_token_expiry_seconds(&self) -> i64 {
        self.session_token_expiry_minutes * 60
    }
}

pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::models::user::User;
use crate::error::ApiError;

/// Claims carried by short-lived access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: i64,
    pub name: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Claims carried by long-lived refresh tokens. `jti` is persisted on the
/// user row so the token can be invalidated server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: i64,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Mints and verifies access/refresh token pairs.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, access_ttl_minutes: i64, refresh_ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::minutes(access_ttl_minutes),
            refresh_ttl: Duration::days(refresh_ttl_days),
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            &security.jwt_secret,
            security.access_token_ttl_minutes,
            security.refresh_token_ttl_days,
        )
    }

    pub fn mint_access(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    pub fn mint_refresh(&self, user_id: i64, jti: Uuid) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user_id,
            jti,
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, ApiError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, ApiError> {
        let data = decode::<RefreshClaims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }

    /// Seconds until a freshly minted access token expires.
    pub fn access_expires_in(&self) -> i64 {
        self.access_ttl.num_seconds()
    }
}

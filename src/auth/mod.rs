//! Access-token issuance and validation.
//!
//! Demo-grade authentication in the original's spirit: `/api/auth/login`
//! accepts a username and optional role and returns a signed HS256 JWT; no
//! user database or password check exists. Refresh tokens are handled by
//! [`tokens`], stale records are swept by [`cleanup`].

pub mod cleanup;
pub mod tokens;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to.
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("Admin")
    }
}

/// Signs and validates access tokens with a symmetric key.
#[derive(Clone)]
pub struct JwtSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl JwtSigner {
    pub fn new(secret: &str, issuer: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.to_string(),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue an access token for `username`, optionally carrying a role.
    pub fn issue(&self, username: &str, role: Option<&str>) -> anyhow::Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            role: role.map(str::to_string),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Validate a token's signature, issuer, and expiry.
    pub fn validate(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        Ok(decode::<Claims>(token, &self.decoding, &validation)?.claims)
    }
}

//! Signed identity tokens.
//!
//! Tokens are HS512 JWTs carrying the user id and username. There is no
//! refresh and no server-side revocation; validity is signature + expiry.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Claims carried by an identity token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id, as a string)
    pub sub: String,
    /// Username
    pub name: String,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
}

/// Issues and validates identity tokens with a process-wide symmetric key.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_hours: u64,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &[u8], ttl_hours: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_hours,
        }
    }

    /// Create a signed token for the given user.
    pub fn issue(&self, user_id: i32, username: &str) -> Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            name: username.to_string(),
            iat: now,
            exp: now + self.ttl_hours as usize * 60 * 60,
        };

        Ok(encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Validate signature and expiry, returning the embedded claims.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS512))?;
        Ok(data.claims)
    }
}

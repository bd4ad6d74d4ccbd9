use chrono::{Duration, Utc};
use dashmap::DashSet;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::config::TokenConfig;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTokenClaims {
    /// Subject (account identifier)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID (for revocation)
    pub jti: String,
}

/// Why a token failed verification. Callers of the HTTP surface only ever
/// see a single unauthenticated error; the distinction exists for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed or its signature does not verify")]
    Invalid,
    #[error("token has expired")]
    Expired,
    #[error("token has been revoked")]
    Revoked,
}

/// Issues and verifies signed session tokens, and tracks revocations.
///
/// The HS256 signing secret is drawn from the OS RNG once per process and
/// held only in memory, as is the revocation set: after a restart previously
/// issued tokens no longer verify and revocations are forgotten. Accepted
/// limitation of the in-memory design.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
    revoked: Arc<DashSet<String>>,
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> Self {
        let mut secret = [0u8; 64];
        OsRng.fill_bytes(&mut secret);

        Self {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
            ttl_seconds: config.ttl_seconds,
            revoked: Arc::new(DashSet::new()),
        }
    }

    /// Mint a token bound to `identifier`, valid for the configured TTL.
    pub fn issue(&self, identifier: &str) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.ttl_seconds);

        let claims = SessionTokenClaims {
            sub: identifier.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode session token: {}", e))
    }

    /// Validate a token and return its claims.
    ///
    /// Expiry and signature problems are reported as distinct kinds from
    /// revocation; an expired token fails as expired whether or not it was
    /// also revoked.
    pub fn verify(&self, token: &str) -> Result<SessionTokenClaims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.validate_exp = true;

        let token_data = decode::<SessionTokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?;

        if self.revoked.contains(&token_data.claims.jti) {
            return Err(TokenError::Revoked);
        }

        Ok(token_data.claims)
    }

    /// Add a token id to the revocation set. Idempotent; permanent for the
    /// process lifetime.
    pub fn revoke(&self, jti: &str) {
        self.revoked.insert(jti.to_string());
    }
}

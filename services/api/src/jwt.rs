//! JWT service for token issuance and verification
//!
//! Tokens are HS256-signed with the shared `ACCESS_TOKEN_SECRET` and carry the
//! caller's identity claims verbatim plus `iat`/`exp`. Nothing is persisted
//! server side: a token stays valid until it expires, even after logout.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Token lifetime in seconds
pub const TOKEN_LIFETIME_SECS: u64 = 3600;

/// Claim names the service sets itself
const RESERVED_CLAIMS: [&str; 2] = ["iat", "exp"];

/// Token errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No token was presented
    #[error("Token missing")]
    Missing,

    /// Bad signature or malformed token
    #[error("Token invalid")]
    Invalid,

    /// Signature fine, but past `exp`
    #[error("Token expired")]
    Expired,

    /// The token could not be produced
    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Identity a token is issued for
///
/// `email` is required; every other member of the login payload is carried
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IdentityClaims {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            extra: Map::new(),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: IdentityClaims,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Initialize a new JWT service from the shared secret
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token valid for [`TOKEN_LIFETIME_SECS`] from now
    pub fn issue(&self, identity: &IdentityClaims) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AuthError::Signing(format!("Failed to get current time: {}", e)))?
            .as_secs();

        self.issue_at(identity, now)
    }

    /// Issue a token as if the current time were `issued_at`
    pub fn issue_at(&self, identity: &IdentityClaims, issued_at: u64) -> Result<String, AuthError> {
        let mut identity = identity.clone();
        for claim in RESERVED_CLAIMS {
            identity.extra.remove(claim);
        }

        let claims = Claims {
            identity,
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify signature and expiry, returning the identity the token was issued for
    pub fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                debug!("Token rejected: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::Expired,
                    _ => AuthError::Invalid,
                }
            })?;

        Ok(token_data.claims.identity)
    }
}

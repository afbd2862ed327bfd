//! JWT verifier
//!
//! Validates signature and expiry against either an identity provider's
//! public key (RS256/ES256, PEM) or a locally shared HS256 secret. Which one
//! is decided by configuration; a deployment never consults both.

use std::fs;

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthError, IdentityVerifier, Principal};
use crate::config::{IdentityConfig, VerificationKey};

/// Minimum length for HS256 secrets
pub const MIN_SECRET_LEN: usize = 32;

/// Claims read from identity tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (provider user id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// Claims for `email` expiring `ttl_seconds` from now
    pub fn for_email(email: impl Into<String>, ttl_seconds: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: None,
            email: Some(email.into()),
            email_verified: Some(true),
            exp: now + ttl_seconds,
            iat: Some(now),
        }
    }
}

/// `IdentityVerifier` backed by `jsonwebtoken`
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// HS256 verifier over a shared secret
    pub fn with_secret(secret: &str) -> Result<Self, AuthError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::InvalidKey(format!(
                "secret must be at least {} characters",
                MIN_SECRET_LEN
            )));
        }
        Ok(Self::new(
            DecodingKey::from_secret(secret.as_bytes()),
            Algorithm::HS256,
        ))
    }

    /// Verifier over a PEM-encoded public key
    pub fn with_public_key_pem(pem: &[u8], algorithm: Algorithm) -> Result<Self, AuthError> {
        let key = match algorithm {
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => DecodingKey::from_rsa_pem(pem),
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem),
            other => {
                return Err(AuthError::InvalidKey(format!(
                    "unsupported public key algorithm {:?}",
                    other
                )))
            }
        }
        .map_err(|e| AuthError::InvalidKey(e.to_string()))?;

        Ok(Self::new(key, algorithm))
    }

    /// Build the verifier selected by configuration
    pub fn from_config(config: &IdentityConfig) -> Result<Self, AuthError> {
        let mut verifier = match &config.key {
            VerificationKey::SharedSecret(secret) => Self::with_secret(secret)?,
            VerificationKey::PublicKeyPem { path, algorithm } => {
                let pem = fs::read(path).map_err(|e| {
                    AuthError::InvalidKey(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::with_public_key_pem(&pem, *algorithm)?
            }
        };

        if let Some(ref issuer) = config.issuer {
            verifier = verifier.with_issuer(issuer);
        }
        if let Some(ref audience) = config.audience {
            verifier = verifier.with_audience(audience);
        }
        Ok(verifier)
    }

    fn new(decoding_key: DecodingKey, algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        // Only checked when an audience is configured
        validation.validate_aud = false;
        Self {
            decoding_key,
            validation,
        }
    }

    /// Require the `iss` claim to equal `issuer`
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self.validation.required_spec_claims.insert("iss".to_string());
        self
    }

    /// Require the `aud` claim to contain `audience`
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.validation.set_audience(&[audience]);
        self.validation.validate_aud = true;
        self.validation.required_spec_claims.insert("aud".to_string());
        self
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenError(e.to_string()),
            })
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.validate_token(token)?;

        if claims.email_verified == Some(false) {
            return Err(AuthError::UnverifiedEmail);
        }
        let email = claims
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .ok_or(AuthError::MissingEmail)?;

        let principal = Principal::new(email);
        Ok(match claims.sub {
            Some(sub) => principal.with_subject(sub),
            None => principal,
        })
    }
}

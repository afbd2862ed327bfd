//! Server configuration
//!
//! Read once at startup from environment variables:
//! - `EVENTS_HOST` / `PORT`: bind address (default `0.0.0.0:3000`)
//! - `EVENTS_STORE_PATH`: JSONL file backing the store (in-memory when unset)
//! - `EVENTS_JWT_PUBLIC_KEY_PATH` + `EVENTS_JWT_ALGORITHM` (`RS256` default, or `ES256`):
//!   identity provider public key
//! - `EVENTS_JWT_SECRET`: HS256 shared secret, min 32 chars
//! - `EVENTS_JWT_ISSUER`, `EVENTS_JWT_AUDIENCE`: optional claim checks
//!
//! Exactly one of the public key and the secret must be configured.

use std::net::SocketAddr;
use std::path::PathBuf;

use jsonwebtoken::Algorithm;
use thiserror::Error;

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("no identity verifier configured: set EVENTS_JWT_PUBLIC_KEY_PATH or EVENTS_JWT_SECRET")]
    MissingIdentity,

    #[error("both EVENTS_JWT_PUBLIC_KEY_PATH and EVENTS_JWT_SECRET are set; configure exactly one")]
    ConflictingIdentity,
}

/// Key material the identity verifier trusts
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationKey {
    /// Third-party identity provider public key
    PublicKeyPem { path: PathBuf, algorithm: Algorithm },
    /// Local issuer secret (HS256)
    SharedSecret(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentityConfig {
    pub key: VerificationKey,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub store_path: Option<PathBuf>,
    pub identity: IdentityConfig,
}

impl ServerConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var("EVENTS_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("PORT") {
            Some(value) => value.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                name: "PORT",
                reason: format!("'{}': {}", value, e),
            })?,
            None => 3000,
        };

        let key = match (var("EVENTS_JWT_PUBLIC_KEY_PATH"), var("EVENTS_JWT_SECRET")) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingIdentity),
            (None, None) => return Err(ConfigError::MissingIdentity),
            (Some(path), None) => VerificationKey::PublicKeyPem {
                path: PathBuf::from(path),
                algorithm: parse_algorithm(var("EVENTS_JWT_ALGORITHM"))?,
            },
            (None, Some(secret)) => VerificationKey::SharedSecret(secret),
        };

        Ok(Self {
            host,
            port,
            store_path: var("EVENTS_STORE_PATH").map(PathBuf::from),
            identity: IdentityConfig {
                key,
                issuer: var("EVENTS_JWT_ISSUER"),
                audience: var("EVENTS_JWT_AUDIENCE"),
            },
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                name: "EVENTS_HOST",
                reason: format!("'{}': {}", addr, e),
            })
    }
}

fn parse_algorithm(value: Option<String>) -> Result<Algorithm, ConfigError> {
    match value.as_deref() {
        None | Some("RS256") => Ok(Algorithm::RS256),
        Some("ES256") => Ok(Algorithm::ES256),
        Some(other) => Err(ConfigError::InvalidValue {
            name: "EVENTS_JWT_ALGORITHM",
            reason: format!("'{}': expected RS256 or ES256", other),
        }),
    }
}

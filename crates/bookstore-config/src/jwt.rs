//! JWT signing configuration.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: HMAC signing key (required)
//! - `JWT_ALGORITHM`: `HS256` (default), `HS384` or `HS512`
//! - `JWT_EXPIRY`: Token lifetime in seconds (default: 86400, 24 hours)
//!
//! Changing `JWT_SECRET` invalidates every token issued under the old key.

use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, anyhow, bail};
use jsonwebtoken::Algorithm;

pub const DEFAULT_TOKEN_EXPIRY: i64 = 86400;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub token_expiry: i64,
}

impl JwtConfig {
    pub fn new(
        secret: impl Into<String>,
        algorithm: Algorithm,
        token_expiry: i64,
    ) -> anyhow::Result<Self> {
        let secret = secret.into();

        if secret.trim().is_empty() {
            bail!("JWT secret must not be empty");
        }
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            bail!("unsupported JWT algorithm {:?}, expected HS256, HS384 or HS512", algorithm);
        }
        if token_expiry <= 0 {
            bail!("JWT expiry must be positive, got {}", token_expiry);
        }

        Ok(Self {
            secret,
            algorithm,
            token_expiry,
        })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let algorithm = match env::var("JWT_ALGORITHM") {
            Ok(value) => Algorithm::from_str(value.trim())
                .map_err(|_| anyhow!("invalid JWT_ALGORITHM: {}", value))?,
            Err(_) => Algorithm::HS256,
        };

        let token_expiry = match env::var("JWT_EXPIRY") {
            Ok(value) => value
                .trim()
                .parse()
                .with_context(|| format!("invalid JWT_EXPIRY: {}", value))?,
            Err(_) => DEFAULT_TOKEN_EXPIRY,
        };

        Self::new(secret, algorithm, token_expiry)
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("token_expiry", &self.token_expiry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_hmac_algorithms() {
        for algorithm in [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512] {
            let config = JwtConfig::new("secret", algorithm, 3600).unwrap();
            assert_eq!(config.algorithm, algorithm);
        }
    }

    #[test]
    fn test_new_rejects_empty_secret() {
        assert!(JwtConfig::new("", Algorithm::HS256, 3600).is_err());
        assert!(JwtConfig::new("   ", Algorithm::HS256, 3600).is_err());
    }

    #[test]
    fn test_new_rejects_asymmetric_algorithm() {
        assert!(JwtConfig::new("secret", Algorithm::RS256, 3600).is_err());
        assert!(JwtConfig::new("secret", Algorithm::EdDSA, 3600).is_err());
    }

    #[test]
    fn test_new_rejects_non_positive_expiry() {
        assert!(JwtConfig::new("secret", Algorithm::HS256, 0).is_err());
        assert!(JwtConfig::new("secret", Algorithm::HS256, -60).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = JwtConfig::new("super-secret-value", Algorithm::HS256, 3600).unwrap();
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("<redacted>"));
    }
}

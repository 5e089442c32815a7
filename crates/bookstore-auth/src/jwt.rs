//! JWT issuance and verification.
//!
//! [`TokenIssuer`] is built once from [`JwtConfig`] at startup and shared by
//! the auth service (which issues) and the authorization guard (which
//! verifies). Tokens are HMAC-signed with the configured algorithm and
//! carry the user's ID, username and role.
//!
//! # Example
//!
//! ```ignore
//! use bookstore_auth::TokenIssuer;
//! use bookstore_models::UserRole;
//!
//! let issuer = TokenIssuer::new(&jwt_config);
//! let token = issuer.issue(user.id, &user.username, user.role)?;
//! let identity = issuer.verify(&token)?;
//! assert_eq!(identity.user_id, user.id);
//! ```

use std::fmt;

use bookstore_config::JwtConfig;
use bookstore_models::UserRole;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::claims::{Claims, Identity};
use crate::error::TokenError;

#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    token_expiry: i64,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(config.algorithm);
        // Expiry is exact: a token is rejected the second it lapses.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            algorithm: config.algorithm,
            validation,
            token_expiry: config.token_expiry,
        }
    }

    /// Token lifetime in seconds.
    pub fn token_expiry(&self) -> i64 {
        self.token_expiry
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Issues a token valid from now for the configured lifetime.
    pub fn issue(
        &self,
        user_id: i64,
        username: &str,
        role: UserRole,
    ) -> Result<String, TokenError> {
        self.issue_at(user_id, username, role, Utc::now())
    }

    /// Issues a token as if signed at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: i64,
        username: &str,
        role: UserRole,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let iat = issued_at.timestamp();
        let exp = iat.saturating_add(self.token_expiry);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role,
            exp: exp.max(0) as usize,
            iat: iat.max(0) as usize,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Checks signature, algorithm and expiry, returning the raw claims.
    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }

    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let claims = self.decode_claims(token)?;
        let user_id = claims.sub.parse::<i64>().map_err(|_| TokenError::Invalid)?;

        Ok(Identity {
            user_id,
            username: claims.username,
            role: claims.role,
        })
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &self.algorithm)
            .field("token_expiry", &self.token_expiry)
            .finish_non_exhaustive()
    }
}

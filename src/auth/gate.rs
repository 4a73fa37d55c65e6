use crate::config::Settings;
use crate::error::{AppError, AuthError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity claim carried inside a signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id the token was issued for.
    pub sub: String,
    /// Expiration time (unix seconds).
    pub exp: i64,
    /// Issued at (unix seconds).
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        // A claim we signed always carries a UUID; anything else means the
        // payload was forged under our own secret somehow.
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidSignature)
    }
}

/// Stateless issue/verify pair around a process-wide HS256 secret.
///
/// The secret is injected at construction, read-only afterwards, so any
/// number of issue/verify calls can run concurrently.
pub struct AuthGate {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

impl AuthGate {
    /// Fails when the secret is empty: an unusable gate is a startup error,
    /// not something to discover one request at a time.
    pub fn new(secret: &str, token_expiry_hours: i64) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::ConfigError("auth.jwt_secret must not be empty".into()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Default leeway is 60s; expiry should be exact.
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            token_ttl: Duration::hours(token_expiry_hours),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        Self::new(&settings.auth.jwt_secret, settings.auth.token_expiry_hours)
    }

    /// Mints a signed token for an already-authenticated user. The caller
    /// must have verified credentials before calling this.
    pub fn issue(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.token_ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verifies signature and expiry, returning the embedded claim.
    ///
    /// An empty token is reported as missing, distinct from a present but
    /// invalid one; the distinction only ever reaches the logs.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidSignature,
            })
    }
}

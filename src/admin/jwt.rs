// ABOUTME: Session token codec issuing and verifying signed, time-limited admin tokens
// ABOUTME: HS256 tokens carry the admin id and issue time; validity is re-derived per request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

//! Session Token Codec
//!
//! Tokens are bearer credentials: the server keeps no session record and
//! re-derives validity on every request from the signature, the embedded
//! expiry, and the subject account's current state. The signing secret is
//! validated at construction; a missing or weak secret aborts initialization
//! and never surfaces as a per-request error.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TOKEN_ISSUER: &str = "fleetgate";
const TOKEN_AUDIENCE: &str = "fleetgate-admin";
const TOKEN_TYPE: &str = "admin_session";

/// Minimum accepted signing-secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Default session lifetime in hours
pub const DEFAULT_TOKEN_EXPIRY_HOURS: i64 = 8;

/// Claims extracted from a verified session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject admin account
    pub admin_id: Uuid,
    /// When the token was issued; compared against the account's
    /// password-change timestamp for stale-password invalidation
    pub issued_at: DateTime<Utc>,
}

/// JWT claims as serialized on the wire
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    iss: String,
    sub: String,
    aud: String,
    exp: i64,
    iat: i64,
    jti: String,
    token_type: String,
}

/// Issues and verifies admin session tokens
#[derive(Clone)]
pub struct AdminJwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl AdminJwtManager {
    /// Create a codec from a signing secret and a session lifetime in hours
    ///
    /// # Errors
    /// Returns a `ConfigError` if the secret is shorter than
    /// [`MIN_SECRET_LEN`] bytes. Callers must treat this as fatal to
    /// initialization.
    pub fn new(secret: &str, expiry_hours: i64) -> AppResult<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::config(format!(
                "JWT signing secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if expiry_hours <= 0 {
            return Err(AppError::config("Token expiry must be positive"));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry: Duration::hours(expiry_hours),
        })
    }

    /// Session lifetime configured for issued tokens
    #[must_use]
    pub const fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Issue a signed session token for an admin account
    ///
    /// # Errors
    /// Fails only if JWT encoding fails, which indicates signing-key
    /// misconfiguration rather than a user-facing condition.
    pub fn issue(&self, admin_id: Uuid) -> AppResult<String> {
        let now = Utc::now();
        let claims = TokenClaims {
            iss: TOKEN_ISSUER.into(),
            sub: admin_id.to_string(),
            aud: TOKEN_AUDIENCE.into(),
            exp: (now + self.expiry).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: TOKEN_TYPE.into(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign session token: {e}")))
    }

    /// Verify a session token and extract its claims
    ///
    /// # Errors
    /// - `ExpiredToken` when the embedded expiry has passed
    /// - `InvalidToken` for a bad signature, malformed structure, wrong
    ///   issuer/audience, or a non-session token
    pub fn verify(&self, token: &str) -> AppResult<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_audience(&[TOKEN_AUDIENCE]);

        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| Self::map_decode_error(&e))?;

        if data.claims.token_type != TOKEN_TYPE {
            return Err(AppError::invalid_token(format!(
                "Unexpected token type: {}",
                data.claims.token_type
            )));
        }

        let admin_id = data
            .claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| AppError::invalid_token("Token subject is not a valid admin id"))?;

        let issued_at = DateTime::from_timestamp(data.claims.iat, 0)
            .ok_or_else(|| AppError::invalid_token("Token issue time is out of range"))?;

        Ok(SessionClaims {
            admin_id,
            issued_at,
        })
    }

    fn map_decode_error(e: &jsonwebtoken::errors::Error) -> AppError {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => {
                tracing::debug!("Session token past its expiry");
                AppError::expired_token()
            }
            ErrorKind::InvalidSignature => {
                tracing::warn!("Session token signature verification failed");
                AppError::invalid_token("Token signature verification failed")
            }
            _ => {
                tracing::debug!("Session token rejected: {e}");
                AppError::invalid_token(format!("Token is malformed or invalid: {e}"))
            }
        }
    }

    /// Generate a random signing secret suitable for `FLEETGATE_JWT_SECRET`
    #[must_use]
    pub fn generate_secret() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect()
    }
}

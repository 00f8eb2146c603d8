// ABOUTME: Environment-driven configuration for tokens, lockout, and rate limiting
// ABOUTME: A missing or weak signing secret fails here, at initialization, never per request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

//! # Configuration
//!
//! All knobs come from `FLEETGATE_*` environment variables with defaults.
//! The only required variable is `FLEETGATE_JWT_SECRET`; everything else has
//! a production-reasonable default.

use crate::admin::jwt::{DEFAULT_TOKEN_EXPIRY_HOURS, MIN_SECRET_LEN};
use crate::admin::lockout::{DEFAULT_FAILURE_THRESHOLD, DEFAULT_LOCK_DURATION_SECS};
use crate::errors::{AppError, AppResult};
use crate::rate_limiting::{
    DEFAULT_MAX_REQUESTS, DEFAULT_MAX_TRACKED_CLIENTS, DEFAULT_WINDOW_SECS,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Top-level configuration for the auth core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret for session tokens
    pub jwt_secret: String,
    /// Session lifetime in hours
    pub token_expiry_hours: i64,
    /// Account lockout policy
    pub lockout: LockoutConfig,
    /// Per-address rate limiting
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockoutConfig {
    /// Consecutive failures before an account locks
    pub failure_threshold: u32,
    /// Lock duration in seconds
    pub lock_duration_secs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    pub enabled: bool,
    /// Requests per window
    pub max_requests: u32,
    /// Window duration in seconds
    pub window_secs: i64,
    /// Bound on tracked client addresses
    pub max_tracked_clients: usize,
}

impl AuthConfig {
    /// Load configuration from the environment
    ///
    /// # Errors
    /// Returns a `ConfigError` if `FLEETGATE_JWT_SECRET` is absent or shorter
    /// than [`MIN_SECRET_LEN`] bytes, or if any variable fails to parse.
    /// Initialization must abort on this error.
    pub fn from_env() -> AppResult<Self> {
        let jwt_secret = env::var("FLEETGATE_JWT_SECRET")
            .map_err(|_| AppError::config("FLEETGATE_JWT_SECRET is not set"))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(AppError::config(format!(
                "FLEETGATE_JWT_SECRET must be at least {MIN_SECRET_LEN} bytes"
            )));
        }

        Ok(Self {
            jwt_secret,
            token_expiry_hours: env_or(
                "FLEETGATE_TOKEN_EXPIRY_HOURS",
                DEFAULT_TOKEN_EXPIRY_HOURS,
            )?,
            lockout: LockoutConfig {
                failure_threshold: env_or(
                    "FLEETGATE_LOCKOUT_THRESHOLD",
                    DEFAULT_FAILURE_THRESHOLD,
                )?,
                lock_duration_secs: env_or(
                    "FLEETGATE_LOCKOUT_DURATION_SECS",
                    DEFAULT_LOCK_DURATION_SECS,
                )?,
            },
            rate_limit: RateLimitConfig {
                enabled: env_or("FLEETGATE_RATE_LIMIT_ENABLED", true)?,
                max_requests: env_or("FLEETGATE_RATE_LIMIT_MAX_REQUESTS", DEFAULT_MAX_REQUESTS)?,
                window_secs: env_or("FLEETGATE_RATE_LIMIT_WINDOW_SECS", DEFAULT_WINDOW_SECS)?,
                max_tracked_clients: env_or(
                    "FLEETGATE_RATE_LIMIT_MAX_CLIENTS",
                    DEFAULT_MAX_TRACKED_CLIENTS,
                )?,
            },
        })
    }
}

/// Read an environment variable, falling back to a default when unset
fn env_or<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| AppError::config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

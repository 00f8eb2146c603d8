// ABOUTME: Unified error handling for the admin auth core with stable machine-readable kinds
// ABOUTME: Maps every rejection to an HTTP status and a serializable error response body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

//! # Unified Error Handling
//!
//! Every check in the auth core rejects with an [`AppError`] carrying a stable,
//! machine-readable [`ErrorKind`] so clients can branch without parsing prose.
//! No kind is fatal to the process; the only fatal condition (a missing or
//! malformed signing key) is reported from initialization, never per-request.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable error kinds for authentication and access-control rejections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Authorization header missing or not a bearer credential
    #[serde(rename = "NO_TOKEN")]
    NoToken,
    /// Token signature or structure is invalid
    #[serde(rename = "INVALID_TOKEN")]
    InvalidToken,
    /// Token was valid once but is past its expiry
    #[serde(rename = "EXPIRED_TOKEN")]
    ExpiredToken,
    /// Token subject does not resolve to an admin account
    #[serde(rename = "ACCOUNT_NOT_FOUND")]
    AccountNotFound,
    /// Admin account has been deactivated
    #[serde(rename = "ACCOUNT_DEACTIVATED")]
    AccountDeactivated,
    /// Admin account is temporarily locked after repeated failures
    #[serde(rename = "ACCOUNT_LOCKED")]
    AccountLocked,
    /// Token predates the account's last password change
    #[serde(rename = "STALE_PASSWORD")]
    StalePassword,
    /// Username/password pair did not authenticate
    #[serde(rename = "INVALID_CREDENTIALS")]
    InvalidCredentials,
    /// Account lacks the (module, action) grant
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied,
    /// Account role is not in the allowed set for the route
    #[serde(rename = "ROLE_REQUIRED")]
    RoleRequired,
    /// Client address exceeded the request window
    #[serde(rename = "RATE_LIMITED")]
    RateLimited,

    // Ambient kinds
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    #[serde(rename = "STORE_ERROR")]
    StoreError,
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorKind {
    /// HTTP status code this kind maps to
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            // 401 Unauthorized
            Self::NoToken
            | Self::InvalidToken
            | Self::ExpiredToken
            | Self::AccountNotFound
            | Self::AccountDeactivated
            | Self::StalePassword
            | Self::InvalidCredentials => 401,

            // 423 Locked
            Self::AccountLocked => 423,

            // 403 Forbidden
            Self::PermissionDenied | Self::RoleRequired => 403,

            // 429 Too Many Requests
            Self::RateLimited => 429,

            // 400 Bad Request
            Self::InvalidInput => 400,

            // 500 Internal Server Error
            Self::ConfigError | Self::StoreError | Self::InternalError => 500,
        }
    }

    /// User-facing description of this kind
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::NoToken => "Authentication required",
            Self::InvalidToken => "The session token is invalid",
            Self::ExpiredToken => "The session token has expired",
            Self::AccountNotFound => "Admin account not found",
            Self::AccountDeactivated => "Admin account is deactivated",
            Self::AccountLocked => "Account is temporarily locked",
            Self::StalePassword => "Password changed since the token was issued",
            Self::InvalidCredentials => "Invalid username or password",
            Self::PermissionDenied => "Permission denied for this action",
            Self::RoleRequired => "Role not permitted for this route",
            Self::RateLimited => "Too many requests",
            Self::InvalidInput => "The provided input is invalid",
            Self::ConfigError => "Configuration error",
            Self::StoreError => "Credential store operation failed",
            Self::InternalError => "An internal error occurred",
        }
    }
}

/// Unified error type for the auth core
#[derive(Debug, Error)]
pub struct AppError {
    /// Machine-readable kind
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
    /// Structured context (retry-after, limits, offending identifiers)
    pub details: serde_json::Value,
    /// Source error for chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: serde_json::Value::Null,
            source: None,
        }
    }

    /// Attach structured details
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Attach a source error for chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.kind.http_status()
    }

    pub fn no_token() -> Self {
        Self::new(
            ErrorKind::NoToken,
            "Missing or malformed Authorization header - expected 'Bearer <token>'",
        )
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidToken, message)
    }

    pub fn expired_token() -> Self {
        Self::new(ErrorKind::ExpiredToken, "Session token has expired")
    }

    pub fn account_not_found() -> Self {
        Self::new(
            ErrorKind::AccountNotFound,
            "No admin account matches the token subject",
        )
    }

    pub fn account_deactivated() -> Self {
        Self::new(
            ErrorKind::AccountDeactivated,
            "This admin account has been deactivated",
        )
    }

    /// Lockout rejection carrying the remaining cooldown in seconds
    pub fn account_locked(retry_after_secs: i64) -> Self {
        Self::new(
            ErrorKind::AccountLocked,
            format!("Account locked - retry in {retry_after_secs} seconds"),
        )
        .with_details(serde_json::json!({ "retry_after_secs": retry_after_secs }))
    }

    pub fn stale_password() -> Self {
        Self::new(
            ErrorKind::StalePassword,
            "Password was changed after this token was issued - log in again",
        )
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid username or password")
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDenied, message)
    }

    pub fn role_required(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RoleRequired, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigError, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.description(), self.message)
    }
}

/// Result type alias for the auth core
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorResponseDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                kind: error.kind,
                message: error.message,
                details: error.details,
            },
        }
    }
}
